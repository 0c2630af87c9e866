//! Shared theme tokens for browser rendering.

#![allow(missing_docs)]

use std::env;

use ratatui::style::{Color, Modifier, Style};

/// Whether styles carry color. `NO_COLOR` and `--no-color` both force
/// plain output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Enabled,
    Disabled,
}

impl ColorMode {
    #[must_use]
    pub const fn from_no_color_flag(no_color: bool) -> Self {
        if no_color {
            Self::Disabled
        } else {
            Self::Enabled
        }
    }

    #[must_use]
    pub fn from_environment() -> Self {
        Self::from_no_color_flag(env::var_os("NO_COLOR").is_some())
    }

    #[must_use]
    pub const fn is_disabled(self) -> bool {
        matches!(self, Self::Disabled)
    }
}

/// Semantic colors the screens agree on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub muted: Color,
    pub text: Color,
    pub highlight: Color,
}

impl ThemePalette {
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            muted: Color::DarkGray,
            text: Color::White,
            highlight: Color::LightCyan,
        }
    }

    #[must_use]
    pub const fn light() -> Self {
        Self {
            accent: Color::Blue,
            success: Color::Green,
            warning: Color::Red,
            muted: Color::Gray,
            text: Color::Black,
            highlight: Color::LightBlue,
        }
    }

    /// Parse a configured theme name. Unknown names fall back to dark.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }
}

/// Padding steps shared by every screen so density shifts in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpacingScale {
    pub outer_padding: u16,
    pub inner_padding: u16,
    pub card_gap: u16,
}

impl SpacingScale {
    #[must_use]
    pub const fn compact() -> Self {
        Self {
            outer_padding: 0,
            inner_padding: 1,
            card_gap: 0,
        }
    }

    #[must_use]
    pub const fn comfortable() -> Self {
        Self {
            outer_padding: 1,
            inner_padding: 2,
            card_gap: 1,
        }
    }

    /// Pick a density from the terminal width. 100 columns is the break.
    #[must_use]
    pub const fn for_columns(cols: u16) -> Self {
        match cols {
            0..=99 => Self::compact(),
            _ => Self::comfortable(),
        }
    }
}

/// Everything render code needs to style a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub palette: ThemePalette,
    pub spacing: SpacingScale,
    pub color: ColorMode,
}

impl Theme {
    #[must_use]
    pub fn for_terminal(cols: u16, palette_name: &str, color: ColorMode) -> Self {
        Self {
            palette: ThemePalette::from_name(palette_name),
            spacing: SpacingScale::for_columns(cols),
            color,
        }
    }

    /// Foreground style for a palette color, honoring `NO_COLOR`.
    #[must_use]
    pub fn fg(self, color: Color) -> Style {
        if self.color.is_disabled() {
            Style::default()
        } else {
            Style::default().fg(color)
        }
    }

    /// Bold foreground style. Bold survives color suppression so focus
    /// remains visible on monochrome terminals.
    #[must_use]
    pub fn emphasis(self, color: Color) -> Style {
        self.fg(color).add_modifier(Modifier::BOLD)
    }

    /// Inverted style for the selected row or chip.
    #[must_use]
    pub fn selection(self) -> Style {
        if self.color.is_disabled() {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
                .fg(Color::Black)
                .bg(self.palette.highlight)
        }
    }
}
