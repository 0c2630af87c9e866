//! Pure update function for the Elm-style browser TUI.
//!
//! `update()` folds one message into the model and hands back the command
//! the runtime should execute for it.
//!
//! **Design invariant:** this module performs zero I/O beyond appending to
//! the in-memory interaction log. All timing effects are described as
//! [`BrowserCmd`] values.

use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use super::input::{self, InputAction, InputContext};
use super::model::{
    home_rows, home_viewport_height, BrowserCmd, BrowserModel, BrowserMsg, Screen,
};
use crate::forms::ContactFieldId;

/// Fold one message into the model and name the side-effect it earns.
///
/// Every state transition in the browser passes through here, which is what
/// lets the integration tests drive a whole session without a terminal.
pub fn update(model: &mut BrowserModel, msg: BrowserMsg) -> BrowserCmd {
    match msg {
        BrowserMsg::Tick => {
            model.tick = model.tick.wrapping_add(1);
            if model.screen == Screen::Home {
                model.home.scroll.glide_tick();
                model.home.sweep();
                let cadence =
                    (model.config.motion.counter_tick_ms / model.config.tui.tick_ms).max(1);
                if model.tick % cadence == 0 {
                    model.home.tick_counters();
                }
            }
            BrowserCmd::None
        }

        BrowserMsg::Key(key) => {
            if key.kind == KeyEventKind::Release {
                return BrowserCmd::None;
            }
            // Modal keys → global keys → screen-specific keys.
            let context = InputContext {
                screen: model.screen,
                help_visible: model.help_visible,
                menu_open: model.nav.is_open(),
                search_editing: model.search_focused,
            };
            let resolution = input::resolve_key_event(&key, context);
            if let Some(action) = resolution.action {
                apply_input_action(model, action)
            } else if resolution.consumed {
                // A modal surface swallowed the key without producing an action.
                BrowserCmd::None
            } else {
                // No modal or global meaning; the active screen decides.
                handle_screen_key(model, &key)
            }
        }

        BrowserMsg::SearchDebounceFired { generation } => {
            // A stale generation means typing continued after this timer was
            // armed; the newest timer carries the final term.
            if let Some(term) = model.debouncer.take_if_current(generation) {
                commit_search(model, &term);
            }
            BrowserCmd::None
        }

        BrowserMsg::BannerExpired { generation } => {
            if generation == model.banner_generation {
                model.banner = None;
            }
            BrowserCmd::None
        }

        BrowserMsg::NotificationExpired(id) => {
            model.notifications.retain(|n| n.id != id);
            BrowserCmd::None
        }

        BrowserMsg::Resize(cols, rows) => {
            model.terminal_size = (cols, rows);
            model
                .home
                .scroll
                .set_extent(home_rows::CONTENT_HEIGHT, home_viewport_height(rows));
            if model.screen == Screen::Home {
                model.home.sweep();
            }
            BrowserCmd::None
        }
    }
}

// ──────────────────── resolved actions ────────────────────

/// Carry out a resolved [`InputAction`] against the model.
///
/// This is the single authority for modal and global key semantics.
/// Screen-specific browse keys (scrolling, chips, list cursors) are handled
/// separately in [`handle_screen_key`].
fn apply_input_action(model: &mut BrowserModel, action: InputAction) -> BrowserCmd {
    match action {
        InputAction::Quit => {
            model.quit = true;
            BrowserCmd::Quit
        }
        InputAction::Navigate(screen) => {
            navigate_to(model, screen);
            BrowserCmd::None
        }
        InputAction::NavigatePrev => {
            let prev = model.screen.prev();
            navigate_to(model, prev);
            BrowserCmd::None
        }
        InputAction::NavigateNext => {
            let next = model.screen.next();
            navigate_to(model, next);
            BrowserCmd::None
        }
        InputAction::ToggleMenu => {
            model.nav.set_active_target(model.screen);
            model.nav.toggle();
            BrowserCmd::None
        }
        InputAction::CloseMenu => {
            model.nav.dismiss();
            BrowserCmd::None
        }
        InputAction::MenuCursorNext => {
            model.nav.cursor_next();
            BrowserCmd::None
        }
        InputAction::MenuCursorPrev => {
            model.nav.cursor_prev();
            BrowserCmd::None
        }
        InputAction::MenuSelect => {
            if let Some(screen) = model.nav.select_cursor() {
                navigate_to(model, screen);
            }
            BrowserCmd::None
        }
        InputAction::ToggleHelp => {
            model.help_visible = !model.help_visible;
            BrowserCmd::None
        }
        InputAction::CloseHelp => {
            model.help_visible = false;
            BrowserCmd::None
        }

        InputAction::SearchChar(c) => {
            model.search_input.push(c);
            schedule_search(model)
        }
        InputAction::SearchBackspace => {
            // Backspace on an empty box changes nothing, so no timer.
            if model.search_input.pop().is_some() {
                schedule_search(model)
            } else {
                BrowserCmd::None
            }
        }
        InputAction::CommitSearch => {
            model.debouncer.cancel();
            model.search_focused = false;
            let term = model.search_input.clone();
            commit_search(model, &term);
            BrowserCmd::None
        }
        InputAction::LeaveSearch => {
            // Leaving the box does not cancel a pending trailing commit.
            model.search_focused = false;
            BrowserCmd::None
        }

        InputAction::FormChar(c) => {
            model.contact.push_char(c);
            BrowserCmd::None
        }
        InputAction::FormBackspace => {
            model.contact.pop_char();
            BrowserCmd::None
        }
        InputAction::FormNextField => {
            model.contact.focus_next();
            BrowserCmd::None
        }
        InputAction::FormPrevField => {
            model.contact.focus_prev();
            BrowserCmd::None
        }
        InputAction::FormEnter => {
            if model.contact.focus() == ContactFieldId::Message {
                submit_form(model)
            } else {
                model.contact.focus_next();
                BrowserCmd::None
            }
        }
    }
}

fn navigate_to(model: &mut BrowserModel, screen: Screen) {
    if model.screen == screen {
        return;
    }
    model.screen = screen;
    model.nav.set_active_target(screen);
    model.log.page_change(screen.slug());
    if screen == Screen::Home {
        model.home.sweep();
    }
}

/// Re-arm the trailing-edge timer with the current box contents.
fn schedule_search(model: &mut BrowserModel) -> BrowserCmd {
    let after = model.debouncer.delay();
    let generation = model
        .debouncer
        .submit(model.search_input.clone(), Instant::now());
    BrowserCmd::ScheduleSearchCommit { generation, after }
}

fn commit_search(model: &mut BrowserModel, term: &str) {
    model.controller.set_search_term(term);
    model.clamp_selection();
    let visible = model.visible_count();
    let total = model.controller.len();
    model.log.search_commit(term, visible, total);
}

fn submit_form(model: &mut BrowserModel) -> BrowserCmd {
    if let Some(record) = model.contact.submit(Utc::now()) {
        model.banner = Some(model.config.contact.success_message.clone());
        model.banner_generation += 1;
        model
            .log
            .form_submit(&format!("message from {}", record.name));
        BrowserCmd::ScheduleBannerExpiry {
            generation: model.banner_generation,
            after: Duration::from_millis(model.config.contact.success_display_ms),
        }
    } else {
        for field in ContactFieldId::ALL {
            if let Some(message) = model.contact.error(field) {
                model.log.form_reject(field.label(), message);
            }
        }
        BrowserCmd::None
    }
}

// ──────────────────── screen keys ────────────────────

/// Dispatch browse keys that are not global navigation. The contact screen
/// has no browse keys; everything it accepts resolves to an action.
fn handle_screen_key(model: &mut BrowserModel, key: &KeyEvent) -> BrowserCmd {
    match model.screen {
        Screen::Home => handle_home_key(model, key),
        Screen::Inventory => handle_inventory_key(model, key),
        Screen::Contact => BrowserCmd::None,
    }
}

/// Handle keys specific to the home screen: scrolling and section glides.
fn handle_home_key(model: &mut BrowserModel, key: &KeyEvent) -> BrowserCmd {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            model.home.scroll.scroll_by(1);
            model.home.sweep();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            model.home.scroll.scroll_by(-1);
            model.home.sweep();
        }
        KeyCode::PageDown => {
            model.home.scroll.scroll_by(page_rows(model));
            model.home.sweep();
        }
        KeyCode::PageUp => {
            model.home.scroll.scroll_by(-page_rows(model));
            model.home.sweep();
        }
        KeyCode::Home => {
            model.home.scroll.scroll_to(0);
            model.home.sweep();
        }
        KeyCode::End => {
            let bottom = model.home.scroll.max_offset();
            model.home.scroll.scroll_to(bottom);
            model.home.sweep();
        }
        KeyCode::Tab => glide_to_next_section(model),
        KeyCode::Enter => navigate_to(model, Screen::Inventory),
        _ => {}
    }
    BrowserCmd::None
}

fn page_rows(model: &BrowserModel) -> i32 {
    i32::try_from(model.home.scroll.viewport_height())
        .unwrap_or(i32::MAX)
        .max(1)
}

/// Glide to the section after the one currently on screen, wrapping back
/// to the top of the page.
fn glide_to_next_section(model: &mut BrowserModel) {
    let names: Vec<String> = model
        .home
        .scroll
        .anchors()
        .iter()
        .map(|anchor| anchor.name.clone())
        .collect();
    if names.is_empty() {
        return;
    }
    let position = model
        .home
        .scroll
        .active_anchor()
        .and_then(|active| names.iter().position(|name| name == active));
    let next = match position {
        Some(index) if index + 1 < names.len() => &names[index + 1],
        _ => &names[0],
    };
    model.home.scroll.glide_to_anchor(next);
}

/// Handle keys specific to the inventory screen: chips, sort, list cursor.
fn handle_inventory_key(model: &mut BrowserModel, key: &KeyEvent) -> BrowserCmd {
    match key.code {
        KeyCode::Char('/') => model.search_focused = true,
        KeyCode::Left | KeyCode::Char('h') => {
            model.chip_cursor = model.chip_cursor.saturating_sub(1);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if model.chip_cursor + 1 < model.categories.len() {
                model.chip_cursor += 1;
            }
        }
        KeyCode::Enter => apply_chip(model),
        KeyCode::Char('s') => cycle_sort(model),
        KeyCode::Down | KeyCode::Char('j') => {
            model.selected = model.selected.saturating_add(1);
            model.clamp_selection();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            model.selected = model.selected.saturating_sub(1);
        }
        KeyCode::Char('r') => reset_view(model),
        _ => {}
    }
    BrowserCmd::None
}

fn apply_chip(model: &mut BrowserModel) {
    let Some(chip) = model.categories.get(model.chip_cursor).cloned() else {
        return;
    };
    model.controller.set_filter(&chip);
    model.clamp_selection();
    let visible = model.visible_count();
    let total = model.controller.len();
    model.log.filter_change(&chip, visible, total);
}

fn cycle_sort(model: &mut BrowserModel) {
    let next = model.controller.state().sort_key.cycle();
    model.controller.set_sort_key(next);
    model.log.sort_change(next.token());
}

fn reset_view(model: &mut BrowserModel) {
    model.debouncer.cancel();
    model.search_input.clear();
    model.search_focused = false;
    model.chip_cursor = 0;
    model.selected = 0;
    model.controller.reset();
    model
        .log
        .view_reset(model.visible_count(), model.controller.len());
}

// ──────────────────── tests ────────────────────
