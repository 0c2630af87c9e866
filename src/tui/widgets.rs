//! Widget primitives and shared visual helpers for browser screens.

#![allow(missing_docs)]

/// Glyph ramp for the scroll position gauge.
pub const GAUGE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render a one-cell scroll position gauge for the status line.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn scroll_gauge(offset: u32, max_offset: u32) -> char {
    if max_offset == 0 {
        return GAUGE_CHARS[0];
    }
    let ratio = f64::from(offset.min(max_offset)) / f64::from(max_offset);
    let idx = (ratio * 7.0).round() as usize;
    GAUGE_CHARS[idx.min(7)]
}

/// Truncate to `width` characters, appending an ellipsis when cut.
#[must_use]
pub fn ellipsize(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Chip text for the category row. The applied chip carries brackets so it
/// stays distinguishable without color.
#[must_use]
pub fn chip_text(label: &str, applied: bool) -> String {
    if applied {
        format!("[{label}]")
    } else {
        format!(" {label} ")
    }
}
