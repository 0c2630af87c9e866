//! Input routing for the browser runtime.
//!
//! Key events resolve through deterministic precedence: the help overlay
//! first, then the navigation drawer, then whichever text surface is
//! editing, then global keys. Screen-specific browse keys (scrolling,
//! chips, list cursors) pass through to the update layer.

#![allow(missing_docs)]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::model::Screen;

/// The modal state a key event is resolved against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputContext {
    pub screen: Screen,
    pub help_visible: bool,
    pub menu_open: bool,
    /// True while the inventory search box owns keystrokes.
    pub search_editing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Quit,
    Navigate(Screen),
    NavigatePrev,
    NavigateNext,
    ToggleMenu,
    CloseMenu,
    MenuCursorNext,
    MenuCursorPrev,
    MenuSelect,
    ToggleHelp,
    CloseHelp,
    // search box
    SearchChar(char),
    SearchBackspace,
    CommitSearch,
    LeaveSearch,
    // contact form
    FormChar(char),
    FormBackspace,
    FormNextField,
    FormPrevField,
    FormEnter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputResolution {
    pub action: Option<InputAction>,
    pub consumed: bool,
}

impl InputResolution {
    const fn action(action: InputAction) -> Self {
        Self {
            action: Some(action),
            consumed: true,
        }
    }

    const fn consumed_without_action() -> Self {
        Self {
            action: None,
            consumed: true,
        }
    }

    const fn passthrough() -> Self {
        Self {
            action: None,
            consumed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpBinding {
    pub keys: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextualHelp {
    pub title: &'static str,
    pub hint: &'static str,
    pub bindings: Vec<HelpBinding>,
}

/// Decide what a key press means under a fixed precedence: help overlay
/// first, then the navigation drawer, then text editing, then global keys.
/// Anything left over passes through to the screen handlers.
#[must_use]
pub fn resolve_key_event(key: &KeyEvent, context: InputContext) -> InputResolution {
    // Ctrl-C quits from any context, including mid-edit.
    if key.code == KeyCode::Char('c') && is_ctrl(key) {
        return InputResolution::action(InputAction::Quit);
    }
    if context.help_visible {
        return resolve_help_key(key);
    }
    if context.menu_open {
        return resolve_menu_key(key);
    }
    if context.search_editing {
        return resolve_search_key(key);
    }
    if context.screen == Screen::Contact {
        return resolve_form_key(key);
    }
    resolve_global_key(key)
}

fn resolve_help_key(key: &KeyEvent) -> InputResolution {
    match key.code {
        KeyCode::Esc | KeyCode::Char('?') => InputResolution::action(InputAction::CloseHelp),
        _ => InputResolution::consumed_without_action(),
    }
}

fn resolve_menu_key(key: &KeyEvent) -> InputResolution {
    match key.code {
        KeyCode::Esc | KeyCode::Char('m') => InputResolution::action(InputAction::CloseMenu),
        KeyCode::Down | KeyCode::Char('j') => InputResolution::action(InputAction::MenuCursorNext),
        KeyCode::Up | KeyCode::Char('k') => InputResolution::action(InputAction::MenuCursorPrev),
        KeyCode::Enter => InputResolution::action(InputAction::MenuSelect),
        KeyCode::Char('?') => InputResolution::action(InputAction::ToggleHelp),
        _ => InputResolution::consumed_without_action(),
    }
}

/// While the search box is editing, every printable key is text. The box
/// is left with Esc, or Enter which also applies the term at once.
fn resolve_search_key(key: &KeyEvent) -> InputResolution {
    match key.code {
        KeyCode::Esc => InputResolution::action(InputAction::LeaveSearch),
        KeyCode::Enter => InputResolution::action(InputAction::CommitSearch),
        KeyCode::Backspace => InputResolution::action(InputAction::SearchBackspace),
        KeyCode::Char(c) => InputResolution::action(InputAction::SearchChar(c)),
        _ => InputResolution::consumed_without_action(),
    }
}

/// The contact screen is always in form entry. Esc reaches the navigation
/// drawer, which is the only way off the screen besides quitting.
fn resolve_form_key(key: &KeyEvent) -> InputResolution {
    match key.code {
        KeyCode::Esc => InputResolution::action(InputAction::ToggleMenu),
        KeyCode::Tab => InputResolution::action(InputAction::FormNextField),
        KeyCode::BackTab => InputResolution::action(InputAction::FormPrevField),
        KeyCode::Enter => InputResolution::action(InputAction::FormEnter),
        KeyCode::Backspace => InputResolution::action(InputAction::FormBackspace),
        KeyCode::Char(c) => InputResolution::action(InputAction::FormChar(c)),
        _ => InputResolution::passthrough(),
    }
}

fn resolve_global_key(key: &KeyEvent) -> InputResolution {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => InputResolution::action(InputAction::Quit),
        KeyCode::Char(c @ '1'..='3') => match Screen::from_number(c as u8 - b'0') {
            Some(screen) => InputResolution::action(InputAction::Navigate(screen)),
            None => InputResolution::passthrough(),
        },
        KeyCode::Char('[') => InputResolution::action(InputAction::NavigatePrev),
        KeyCode::Char(']') => InputResolution::action(InputAction::NavigateNext),
        KeyCode::Char('m') => InputResolution::action(InputAction::ToggleMenu),
        KeyCode::Char('?') => InputResolution::action(InputAction::ToggleHelp),
        _ => InputResolution::passthrough(),
    }
}

fn is_ctrl(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Build contextual help entries for the current screen and modal state.
#[must_use]
pub fn contextual_help(context: InputContext) -> ContextualHelp {
    if context.help_visible {
        return ContextualHelp {
            title: "Help",
            hint: "Key map for the current screen.",
            bindings: vec![
                HelpBinding {
                    keys: "Esc or ?",
                    description: "Close help",
                },
            ],
        };
    }
    if context.menu_open {
        return ContextualHelp {
            title: "Navigation Menu",
            hint: "Pick a page; the menu closes on selection.",
            bindings: vec![
                HelpBinding {
                    keys: "j/k or arrows",
                    description: "Move between pages",
                },
                HelpBinding {
                    keys: "Enter",
                    description: "Open the highlighted page",
                },
                HelpBinding {
                    keys: "Esc or m",
                    description: "Close the menu",
                },
            ],
        };
    }
    if context.search_editing {
        return ContextualHelp {
            title: "Search",
            hint: "The list narrows shortly after you stop typing.",
            bindings: vec![
                HelpBinding {
                    keys: "Enter",
                    description: "Apply the term now",
                },
                HelpBinding {
                    keys: "Esc",
                    description: "Back to the list",
                },
            ],
        };
    }
    screen_help(context.screen)
}

fn screen_help(screen: Screen) -> ContextualHelp {
    let mut bindings = Vec::with_capacity(GLOBAL_HELP_BINDINGS.len() + 8);
    bindings.extend_from_slice(&screen_bindings(screen));
    bindings.extend_from_slice(&GLOBAL_HELP_BINDINGS);

    ContextualHelp {
        title: screen.title(),
        hint: screen_hint(screen),
        bindings,
    }
}

const GLOBAL_HELP_BINDINGS: [HelpBinding; 5] = [
    HelpBinding {
        keys: "1..3",
        description: "Jump directly to a page",
    },
    HelpBinding {
        keys: "[ / ]",
        description: "Previous/next page",
    },
    HelpBinding {
        keys: "m",
        description: "Open the navigation menu",
    },
    HelpBinding {
        keys: "?",
        description: "Toggle this help",
    },
    HelpBinding {
        keys: "q or Ctrl-C",
        description: "Quit",
    },
];

fn screen_bindings(screen: Screen) -> &'static [HelpBinding] {
    match screen {
        Screen::Home => &[
            HelpBinding {
                keys: "j/k or arrows",
                description: "Scroll the page",
            },
            HelpBinding {
                keys: "PgUp/PgDn, Home/End",
                description: "Scroll by page, jump to edges",
            },
            HelpBinding {
                keys: "Tab",
                description: "Glide to the next section",
            },
            HelpBinding {
                keys: "Enter",
                description: "Browse the inventory",
            },
        ],
        Screen::Inventory => &[
            HelpBinding {
                keys: "h/l or arrows",
                description: "Move along the category chips",
            },
            HelpBinding {
                keys: "Enter",
                description: "Apply the highlighted category",
            },
            HelpBinding {
                keys: "/",
                description: "Type a search term",
            },
            HelpBinding {
                keys: "s",
                description: "Cycle the sort criterion",
            },
            HelpBinding {
                keys: "j/k",
                description: "Move through the cards",
            },
            HelpBinding {
                keys: "r",
                description: "Reset filter, search, and sort",
            },
        ],
        Screen::Contact => &[
            HelpBinding {
                keys: "Tab / Shift-Tab",
                description: "Next/previous field",
            },
            HelpBinding {
                keys: "Enter",
                description: "Next field, or send from the message",
            },
            HelpBinding {
                keys: "Esc",
                description: "Open the navigation menu",
            },
        ],
    }
}

fn screen_hint(screen: Screen) -> &'static str {
    match screen {
        Screen::Home => "Home: showroom highlights and statistics",
        Screen::Inventory => "Inventory: filter, search, and sort the stock",
        Screen::Contact => "Contact: send a message to the dealership",
    }
}
