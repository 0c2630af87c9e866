//! Collapsible navigation drawer.
//!
//! Mirrors the classic mobile-header machine: a toggle flips the drawer,
//! selecting an entry closes it and yields the destination, and a press
//! outside dismisses it without navigating. The highlighted entry always
//! reflects the page currently shown, not the drawer cursor.

/// One destination in the drawer.
#[derive(Debug, Clone)]
pub struct NavEntry<T> {
    pub label: String,
    pub target: T,
}

/// Drawer state over destinations of type `T`.
#[derive(Debug, Clone)]
pub struct NavMenu<T> {
    entries: Vec<NavEntry<T>>,
    open: bool,
    /// Entry matching the page currently shown.
    active: usize,
    /// Keyboard position while the drawer is open.
    cursor: usize,
}

impl<T: Copy + PartialEq> NavMenu<T> {
    /// Build a closed drawer. The first entry starts highlighted; an empty
    /// drawer is legal and every operation on it is a no-op.
    #[must_use]
    pub fn new(entries: Vec<NavEntry<T>>) -> Self {
        Self {
            entries,
            open: false,
            active: 0,
            cursor: 0,
        }
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn entries(&self) -> &[NavEntry<T>] {
        &self.entries
    }

    #[must_use]
    pub const fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    pub const fn cursor_index(&self) -> usize {
        self.cursor
    }

    /// Flip the drawer. Opening parks the cursor on the active entry.
    pub fn toggle(&mut self) {
        self.open = !self.open;
        if self.open {
            self.cursor = self.active;
        }
    }

    /// Close without navigating, as a press outside the drawer does.
    pub fn dismiss(&mut self) {
        self.open = false;
    }

    pub fn cursor_next(&mut self) {
        if !self.entries.is_empty() {
            self.cursor = (self.cursor + 1) % self.entries.len();
        }
    }

    pub fn cursor_prev(&mut self) {
        if !self.entries.is_empty() {
            self.cursor = self.cursor.checked_sub(1).unwrap_or(self.entries.len() - 1);
        }
    }

    /// Choose the entry under the cursor: the drawer closes, the entry
    /// becomes active, and its destination is returned.
    pub fn select_cursor(&mut self) -> Option<T> {
        let entry = self.entries.get(self.cursor)?;
        let target = entry.target;
        self.active = self.cursor;
        self.open = false;
        Some(target)
    }

    /// Align the highlight with a page reached some other way, for example
    /// a shortcut key. Unknown targets leave the highlight alone.
    pub fn set_active_target(&mut self, target: T) {
        if let Some(index) = self
            .entries
            .iter()
            .position(|entry| entry.target == target)
        {
            self.active = index;
        }
    }
}
