//! Scroll position tracking with named anchors and smooth glides.
//!
//! Pages register anchors at fixed rows. Jumping to one does not snap:
//! a glide target is set and each tick moves the offset a fraction of the
//! remaining distance, landing exactly on the target. The landing row sits
//! a fixed header offset above the anchor so the section heading is not
//! buried under the chrome. Manual scrolling cancels an in-flight glide.

/// A named row in the content.
#[derive(Debug, Clone)]
pub struct Anchor {
    pub name: String,
    pub top: u32,
}

/// Offset state for one scrollable page.
#[derive(Debug, Clone)]
pub struct ScrollView {
    offset: u32,
    content_height: u32,
    viewport_height: u32,
    header_offset: u32,
    anchors: Vec<Anchor>,
    glide_target: Option<u32>,
}

impl ScrollView {
    #[must_use]
    pub const fn new(header_offset: u32) -> Self {
        Self {
            offset: 0,
            content_height: 0,
            viewport_height: 0,
            header_offset,
            anchors: Vec::new(),
            glide_target: None,
        }
    }

    /// Record the measured extents and re-clamp the offset to them.
    pub fn set_extent(&mut self, content_height: u32, viewport_height: u32) {
        self.content_height = content_height;
        self.viewport_height = viewport_height;
        self.offset = self.offset.min(self.max_offset());
        if let Some(target) = self.glide_target {
            self.glide_target = Some(target.min(self.max_offset()));
        }
    }

    pub fn add_anchor(&mut self, name: &str, top: u32) {
        self.anchors.push(Anchor {
            name: name.to_string(),
            top,
        });
    }

    #[must_use]
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    #[must_use]
    pub const fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    #[must_use]
    pub const fn max_offset(&self) -> u32 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    #[must_use]
    pub const fn is_gliding(&self) -> bool {
        self.glide_target.is_some()
    }

    /// Scroll by a signed number of rows, clamped to the content. A manual
    /// move cancels any glide in flight.
    pub fn scroll_by(&mut self, delta: i32) {
        self.glide_target = None;
        self.offset = if delta.is_negative() {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset
                .saturating_add(delta.unsigned_abs())
                .min(self.max_offset())
        };
    }

    /// Jump without animation.
    pub fn scroll_to(&mut self, row: u32) {
        self.glide_target = None;
        self.offset = row.min(self.max_offset());
    }

    /// The section the viewport currently sits in: the deepest anchor whose
    /// top has passed the header line. None before the first anchor.
    #[must_use]
    pub fn active_anchor(&self) -> Option<&str> {
        self.anchors
            .iter()
            .filter(|anchor| anchor.top <= self.offset.saturating_add(self.header_offset))
            .max_by_key(|anchor| anchor.top)
            .map(|anchor| anchor.name.as_str())
    }

    /// Begin a glide toward `name`, landing the header offset above it.
    /// Returns false when no such anchor exists.
    pub fn glide_to_anchor(&mut self, name: &str) -> bool {
        let Some(anchor) = self.anchors.iter().find(|anchor| anchor.name == name) else {
            return false;
        };
        let target = anchor
            .top
            .saturating_sub(self.header_offset)
            .min(self.max_offset());
        self.glide_target = Some(target);
        true
    }

    /// Advance an in-flight glide by one frame. Returns true while still
    /// moving. Each frame covers a quarter of the remaining distance, at
    /// least one row, so every glide terminates on target.
    pub fn glide_tick(&mut self) -> bool {
        let Some(target) = self.glide_target else {
            return false;
        };
        if self.offset == target {
            self.glide_target = None;
            return false;
        }
        let remaining = if target > self.offset {
            target - self.offset
        } else {
            self.offset - target
        };
        let step = (remaining / 4).max(1);
        if target > self.offset {
            self.offset += step;
        } else {
            self.offset -= step;
        }
        if self.offset == target {
            self.glide_target = None;
            return false;
        }
        true
    }
}
