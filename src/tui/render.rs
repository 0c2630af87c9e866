//! Rendering for the showroom browser.
//!
//! Two entrypoints share the per-screen line builders: [`render`] flattens
//! a frame to plain text for tests and scripted checks, and
//! [`render_frame`] draws the same content through ratatui widgets in the
//! live terminal. The text path carries no styling, so assertions run on
//! content alone.

#![allow(missing_docs)]
#![allow(clippy::too_many_lines)]

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use super::input::{self, InputContext};
use super::model::{
    BrowserModel, HOME_FEATURES, NotificationLevel, Screen, home_rows, home_targets,
};
use super::theme::{ColorMode, Theme};
use super::widgets::{chip_text, ellipsize, scroll_gauge};
use crate::forms::ContactFieldId;

/// Dealership name shown in the header on every screen.
pub const SITE_TITLE: &str = "Carolina Quality Sales";

const HERO_TAGLINE: &str = "Straight prices on inspected cars and trucks";
const HERO_SUB: &str = "Family owned. Every vehicle road-checked before it reaches the lot.";
const FEATURES_HEADING: &str = "Why Buy From Us";
const STATS_HEADING: &str = "The Numbers";
const CTA_HEADING: &str = "Visit Our Showroom";
const CTA_ADDRESS: &str = "4215 Capital Blvd, Raleigh, NC";
const CTA_HOURS: &str = "Open Mon-Sat, 9am to 7pm";

/// Below this size nothing useful fits and both paths short-circuit.
const MIN_COLS: u16 = 40;
const MIN_ROWS: u16 = 10;

// ──────────────────── string path ────────────────────

/// Shorthand for [`render_to_string`], the form the tests call. The live
/// terminal goes through `render_frame()`.
#[must_use]
pub fn render(model: &BrowserModel) -> String {
    render_to_string(model)
}

/// Render the model as plain text, one line per row. The layout mirrors
/// the widget path closely enough that content assertions hold for both.
#[must_use]
pub fn render_to_string(model: &BrowserModel) -> String {
    use std::fmt::Write as _;

    let (cols, rows) = model.terminal_size;
    let theme = Theme::for_terminal(cols, &model.config.tui.theme, ColorMode::Disabled);
    let mut out = String::new();

    let _ = writeln!(out, "{SITE_TITLE}  [{}]  {cols}x{rows}", model.screen.title());
    let _ = writeln!(out, "{}", text_of(&tab_line(model, theme)));

    if cols < MIN_COLS || rows < MIN_ROWS {
        let _ = writeln!(out, "{}", too_small_message(cols, rows));
        return out;
    }

    for line in screen_lines(model, theme) {
        let _ = writeln!(out, "{}", text_of(&line));
    }
    if model.screen == Screen::Home {
        let _ = writeln!(out, "{}", home_status(model));
    }

    if model.nav.is_open() {
        let _ = writeln!(out, "[menu]");
        for line in menu_lines(model, theme) {
            let _ = writeln!(out, "{}", text_of(&line));
        }
    }
    if model.help_visible {
        let _ = writeln!(out, "[help]");
        for line in help_lines(model, theme) {
            let _ = writeln!(out, "{}", text_of(&line));
        }
    }

    let _ = writeln!(out, "{}", text_of(&footer_line(model, theme)));
    for toast in &model.notifications {
        let _ = writeln!(out, "[toast#{}] {}", toast.id, toast.message);
    }
    out
}

/// Concatenate a line's span contents, dropping styling.
fn text_of(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

fn too_small_message(cols: u16, rows: u16) -> String {
    format!("Terminal too small ({cols}x{rows}); need at least {MIN_COLS}x{MIN_ROWS}.")
}

// ──────────────────── widget path ────────────────────

/// Draw one frame: header strip, bordered screen body, footer hints, then
/// whichever overlays and toasts are active.
pub fn render_frame(model: &BrowserModel, frame: &mut Frame) {
    let area = frame.area();
    let theme = Theme::for_terminal(area.width, &model.config.tui.theme, ColorMode::from_environment());

    if area.width < MIN_COLS || area.height < MIN_ROWS {
        let message = Paragraph::new(too_small_message(area.width, area.height))
            .wrap(Wrap { trim: false });
        frame.render_widget(message, area);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(area);

    frame.render_widget(Paragraph::new(header_line(model, theme)), chunks[0]);
    render_body(model, theme, chunks[1], frame);
    frame.render_widget(Paragraph::new(footer_line(model, theme)), chunks[2]);

    if model.nav.is_open() {
        render_overlay(menu_lines(model, theme), 30, theme, area, frame);
    }
    if model.help_visible {
        render_overlay(help_lines(model, theme), 56, theme, area, frame);
    }
    render_notifications(model, theme, area, frame);
}

/// Site title and tab strip on a single row.
fn header_line(model: &BrowserModel, theme: Theme) -> Line<'static> {
    let mut spans = vec![
        Span::styled(SITE_TITLE, theme.emphasis(theme.palette.accent)),
        Span::raw("  "),
    ];
    spans.extend(tab_line(model, theme).spans);
    Line::from(spans)
}

fn tab_line(model: &BrowserModel, theme: Theme) -> Line<'static> {
    let mut spans = Vec::with_capacity(Screen::ALL.len());
    for screen in Screen::ALL {
        let style = if screen == model.screen {
            theme.selection()
        } else {
            theme.fg(theme.palette.muted)
        };
        spans.push(Span::styled(format!(" {}:{} ", screen.number(), screen.title()), style));
    }
    Line::from(spans)
}

fn render_body(model: &BrowserModel, theme: Theme, area: Rect, frame: &mut Frame) {
    let title = if model.screen == Screen::Home {
        home_status(model)
    } else {
        model.screen.title().to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.fg(theme.palette.muted))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let body = Paragraph::new(Text::from(screen_lines(model, theme)));
    frame.render_widget(body, inner);
}

/// Clear a centered window and draw overlay lines inside a rounded border.
fn render_overlay(lines: Vec<Line<'static>>, width: u16, theme: Theme, area: Rect, frame: &mut Frame) {
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let window = centered_rect(area, width, height);
    frame.render_widget(Clear, window);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.fg(theme.palette.accent));
    let inner = block.inner(window);
    frame.render_widget(block, window);
    frame.render_widget(Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false }), inner);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Toasts stack below the header, right-aligned, newest last.
fn render_notifications(model: &BrowserModel, theme: Theme, area: Rect, frame: &mut Frame) {
    let mut y = area.y.saturating_add(1);
    for toast in &model.notifications {
        if y >= area.y + area.height {
            break;
        }
        let text = format!(" {} ", toast.message);
        let width = u16::try_from(text.chars().count())
            .unwrap_or(u16::MAX)
            .min(area.width);
        let rect = Rect {
            x: area.x + (area.width - width),
            y,
            width,
            height: 1,
        };
        let style = match toast.level {
            NotificationLevel::Info => theme.fg(theme.palette.accent),
            NotificationLevel::Warning => theme.emphasis(theme.palette.warning),
        };
        frame.render_widget(Clear, rect);
        frame.render_widget(Paragraph::new(Span::styled(text, style)), rect);
        y += 1;
    }
}

// ──────────────────── screen bodies ────────────────────

fn screen_lines(model: &BrowserModel, theme: Theme) -> Vec<Line<'static>> {
    match model.screen {
        Screen::Home => home_window_lines(model, theme),
        Screen::Inventory => inventory_lines(model, theme),
        Screen::Contact => contact_lines(model, theme),
    }
}

/// The slice of the landing page the viewport currently shows.
fn home_window_lines(model: &BrowserModel, theme: Theme) -> Vec<Line<'static>> {
    let content = home_content_lines(model, theme);
    let top = model.home.scroll.offset() as usize;
    let height = model.home.scroll.viewport_height() as usize;
    let bottom = top.saturating_add(height).min(content.len());
    content[top.min(content.len())..bottom].to_vec()
}

/// Scroll position summary: gauge glyph, active section, row counter.
fn home_status(model: &BrowserModel) -> String {
    let scroll = &model.home.scroll;
    let anchor = scroll.active_anchor().unwrap_or("top");
    format!(
        "{} {}  row {}/{}",
        scroll_gauge(scroll.offset(), scroll.max_offset()),
        anchor,
        scroll.offset(),
        scroll.max_offset(),
    )
}

/// Build the full landing page at its fixed row layout. Sections below the
/// fold stay as placeholders until a sweep has revealed them.
fn home_content_lines(model: &BrowserModel, theme: Theme) -> Vec<Line<'static>> {
    let mut lines = vec![Line::default(); home_rows::CONTENT_HEIGHT as usize];
    let reveal = &model.home.reveal;

    set_row(&mut lines, 1, Line::from(Span::styled(SITE_TITLE, theme.emphasis(theme.palette.accent))));
    set_row(&mut lines, 3, Line::from(HERO_TAGLINE));
    set_row(&mut lines, 5, Line::from(HERO_SUB));
    set_row(
        &mut lines,
        7,
        Line::from(Span::styled(
            "Enter opens the inventory. Tab tours the page.",
            theme.fg(theme.palette.muted),
        )),
    );

    set_row(
        &mut lines,
        home_rows::FEATURES_TOP,
        Line::from(Span::styled(FEATURES_HEADING, theme.emphasis(theme.palette.accent))),
    );
    let mut card_top = home_rows::FEATURES_TOP + 1;
    for (index, &(title, blurb)) in HOME_FEATURES.iter().enumerate() {
        if reveal.is_revealed(home_targets::FEATURE_BASE + index as u64) {
            set_row(
                &mut lines,
                card_top + 1,
                Line::from(Span::styled(title, theme.emphasis(theme.palette.text))),
            );
            set_row(&mut lines, card_top + 2, Line::from(Span::styled(blurb, theme.fg(theme.palette.muted))));
        } else {
            set_row(&mut lines, card_top + 1, placeholder_line(theme));
        }
        card_top += home_rows::FEATURE_CARD_HEIGHT + 1;
    }

    set_row(
        &mut lines,
        home_rows::STATS_TOP,
        Line::from(Span::styled(STATS_HEADING, theme.emphasis(theme.palette.accent))),
    );
    if reveal.is_revealed(home_targets::STATS) {
        set_row(&mut lines, home_rows::STATS_TOP + 2, stat_pair_line(model, 0, theme));
        set_row(&mut lines, home_rows::STATS_TOP + 4, stat_pair_line(model, 2, theme));
    } else {
        set_row(&mut lines, home_rows::STATS_TOP + 2, placeholder_line(theme));
    }

    set_row(
        &mut lines,
        home_rows::CTA_TOP,
        Line::from(Span::styled(CTA_HEADING, theme.emphasis(theme.palette.accent))),
    );
    if reveal.is_revealed(home_targets::CTA) {
        set_row(&mut lines, home_rows::CTA_TOP + 2, Line::from(CTA_ADDRESS));
        set_row(&mut lines, home_rows::CTA_TOP + 3, Line::from(CTA_HOURS));
        set_row(
            &mut lines,
            home_rows::CTA_TOP + 4,
            Line::from(Span::styled("Press 3 to send us a message.", theme.fg(theme.palette.muted))),
        );
    } else {
        set_row(&mut lines, home_rows::CTA_TOP + 2, placeholder_line(theme));
    }

    lines
}

fn set_row(lines: &mut [Line<'static>], row: u32, line: Line<'static>) {
    if let Some(slot) = lines.get_mut(row as usize) {
        *slot = line;
    }
}

fn placeholder_line(theme: Theme) -> Line<'static> {
    Line::from(Span::styled("· · ·", theme.fg(theme.palette.muted)))
}

/// Two statistics side by side, figure then caption.
fn stat_pair_line(model: &BrowserModel, first: usize, theme: Theme) -> Line<'static> {
    let mut spans = Vec::with_capacity(4);
    for stat in model.home.stats.iter().skip(first).take(2) {
        spans.push(Span::styled(
            format!("{:>8}", stat.counter.display()),
            theme.emphasis(theme.palette.success),
        ));
        spans.push(Span::raw(format!("  {:<26}", stat.label)));
    }
    Line::from(spans)
}

fn inventory_lines(model: &BrowserModel, theme: Theme) -> Vec<Line<'static>> {
    let state = model.controller.state();
    let (cols, rows) = model.terminal_size;
    let mut lines = Vec::new();

    // Category chips, with the cursor marked and the applied chip bracketed.
    let mut chips = vec![Span::raw("Categories: ")];
    for (index, chip) in model.categories.iter().enumerate() {
        if index == model.chip_cursor {
            chips.push(Span::styled("▸", theme.fg(theme.palette.accent)));
        }
        let applied = model.active_chip() == Some(index);
        let style = if index == model.chip_cursor {
            theme.selection()
        } else if applied {
            theme.emphasis(theme.palette.accent)
        } else {
            theme.fg(theme.palette.text)
        };
        chips.push(Span::styled(chip_text(chip, applied), style));
        chips.push(Span::raw(" "));
    }
    lines.push(Line::from(chips));

    let search_text = if model.search_focused {
        format!("Search: {}▏", model.search_input)
    } else if model.search_input.is_empty() {
        "Search: (press / to type)".to_string()
    } else {
        format!("Search: {}", model.search_input)
    };
    let mut search_spans = vec![Span::raw(search_text)];
    if model.debouncer.deadline().is_some() {
        search_spans.push(Span::styled("  …narrowing", theme.fg(theme.palette.muted)));
    }
    lines.push(Line::from(search_spans));
    lines.push(Line::from(format!("Sort: {}", state.sort_key.label())));
    lines.push(Line::default());

    let visible = model.controller.visible_vehicles();
    if visible.is_empty() {
        lines.push(Line::from(Span::styled(
            "No vehicles match the current view.",
            theme.fg(theme.palette.warning),
        )));
    } else {
        let label_cap = usize::from(cols).saturating_sub(36).max(16);
        let card_rows = usize::from(rows).saturating_sub(10).max(3);
        let (start, end) = centered_window(model.selected, visible.len(), card_rows);
        for (offset, vehicle) in visible[start..end].iter().enumerate() {
            let index = start + offset;
            let selected = index == model.selected;
            let marker = if selected { "▸ " } else { "  " };
            let label_style = if selected {
                theme.selection()
            } else {
                theme.fg(theme.palette.text)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{marker}{:<label_cap$}", ellipsize(&vehicle.label, label_cap)), label_style),
                Span::styled(format!(" {:<6}", vehicle.category), theme.fg(theme.palette.muted)),
                Span::styled(format!(" {:>14}", vehicle.display_price()), theme.fg(theme.palette.success)),
                Span::raw(format!("  {}", vehicle.display_year())),
            ]));
        }
    }

    lines.push(Line::default());
    lines.push(Line::from(format!(
        "Showing {} of {} vehicles",
        visible.len(),
        model.controller.len(),
    )));
    lines
}

/// Window `rows` items around the selection, pinned at the edges.
fn centered_window(selected: usize, total: usize, rows: usize) -> (usize, usize) {
    if total <= rows {
        return (0, total);
    }
    let start = selected.saturating_sub(rows / 2).min(total - rows);
    (start, start + rows)
}

fn contact_lines(model: &BrowserModel, theme: Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from("Send us a message and we'll call you back."),
        Line::default(),
    ];

    for id in ContactFieldId::ALL {
        let focused = model.contact.focus() == id;
        let marker = if focused { "▸ " } else { "  " };
        let required = if id.is_required() { "*" } else { " " };
        let cursor = if focused { "▏" } else { "" };
        let label_style = if focused {
            theme.emphasis(theme.palette.accent)
        } else {
            theme.fg(theme.palette.text)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<8}{required} ", id.label()), label_style),
            Span::raw(format!("{}{cursor}", model.contact.value(id))),
        ]));
        if let Some(error) = model.contact.error(id) {
            lines.push(Line::from(Span::styled(
                format!("            ! {error}"),
                theme.fg(theme.palette.warning),
            )));
        }
    }

    lines.push(Line::default());
    if let Some(banner) = &model.banner {
        lines.push(Line::from(Span::styled(
            format!("✓ {banner}"),
            theme.emphasis(theme.palette.success),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Enter advances; Enter on the message sends the form.",
            theme.fg(theme.palette.muted),
        )));
    }
    lines
}

// ──────────────────── overlays and chrome ────────────────────

fn menu_lines(model: &BrowserModel, theme: Theme) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled("Navigate", theme.emphasis(theme.palette.accent)))];
    for (index, entry) in model.nav.entries().iter().enumerate() {
        let cursor = if index == model.nav.cursor_index() { "▸ " } else { "  " };
        let active = if index == model.nav.active_index() { " •" } else { "" };
        let style = if index == model.nav.cursor_index() {
            theme.selection()
        } else {
            theme.fg(theme.palette.text)
        };
        lines.push(Line::from(Span::styled(
            format!("{cursor}{}{active}", entry.label),
            style,
        )));
    }
    lines
}

fn help_lines(model: &BrowserModel, theme: Theme) -> Vec<Line<'static>> {
    // Help describes the state under the overlay, not the overlay itself.
    let mut context = input_context(model);
    context.help_visible = false;
    let help = input::contextual_help(context);

    let mut lines = vec![
        Line::from(Span::styled(format!("Help: {}", help.title), theme.emphasis(theme.palette.accent))),
        Line::from(Span::styled(help.hint, theme.fg(theme.palette.muted))),
        Line::default(),
    ];
    for binding in &help.bindings {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<22}", binding.keys), theme.fg(theme.palette.accent)),
            Span::raw(binding.description),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Esc or ? closes this overlay.", theme.fg(theme.palette.muted))));
    lines
}

fn footer_line(model: &BrowserModel, theme: Theme) -> Line<'static> {
    let help = input::contextual_help(input_context(model));
    Line::from(vec![
        Span::styled(help.hint, theme.fg(theme.palette.muted)),
        Span::raw("   "),
        Span::styled("?", theme.emphasis(theme.palette.accent)),
        Span::raw(" help  "),
        Span::styled("q", theme.emphasis(theme.palette.accent)),
        Span::raw(" quit"),
    ])
}

fn input_context(model: &BrowserModel) -> InputContext {
    InputContext {
        screen: model.screen,
        help_visible: model.help_visible,
        menu_open: model.nav.is_open(),
        search_editing: model.search_focused,
    }
}

// ──────────────────── tests ────────────────────
