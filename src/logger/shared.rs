//! Cloneable handle over the interaction log.
//!
//! The TUI runtime records from its update path while the CLI records from
//! the main thread, so the writer sits behind a `parking_lot` mutex. Every
//! recording method takes `&self`; lock scope is one entry.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::logger::jsonl::{InteractionEvent, InteractionLog, LogEntry, Severity};

/// Shared, cloneable log handle.
#[derive(Clone)]
pub struct LogHandle {
    inner: Arc<Mutex<InteractionLog>>,
}

impl LogHandle {
    #[must_use]
    pub fn new(log: InteractionLog) -> Self {
        Self {
            inner: Arc::new(Mutex::new(log)),
        }
    }

    /// A handle that records nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(InteractionLog::disabled())
    }

    pub fn record(&self, entry: &LogEntry) {
        self.inner.lock().record(entry);
    }

    pub fn flush(&self) {
        self.inner.lock().flush();
    }

    /// Degradation state of the underlying writer.
    #[must_use]
    pub fn state(&self) -> &'static str {
        self.inner.lock().state()
    }

    // Convenience constructors for the common events.

    pub fn session_start(&self, page: &str, total: usize) {
        let mut entry = LogEntry::new(InteractionEvent::SessionStart, Severity::Info);
        entry.page = Some(page.to_string());
        entry.total = Some(total as u64);
        self.record(&entry);
    }

    pub fn session_stop(&self, duration_ms: u64) {
        let mut entry = LogEntry::new(InteractionEvent::SessionStop, Severity::Info);
        entry.duration_ms = Some(duration_ms);
        self.record(&entry);
    }

    pub fn filter_change(&self, filter: &str, visible: usize, total: usize) {
        let mut entry = LogEntry::new(InteractionEvent::FilterChange, Severity::Info);
        entry.filter = Some(filter.to_string());
        entry.visible = Some(visible as u64);
        entry.total = Some(total as u64);
        self.record(&entry);
    }

    pub fn search_commit(&self, term: &str, visible: usize, total: usize) {
        let mut entry = LogEntry::new(InteractionEvent::SearchCommit, Severity::Info);
        entry.term = Some(term.to_string());
        entry.visible = Some(visible as u64);
        entry.total = Some(total as u64);
        self.record(&entry);
    }

    pub fn sort_change(&self, sort: &str) {
        let mut entry = LogEntry::new(InteractionEvent::SortChange, Severity::Info);
        entry.sort = Some(sort.to_string());
        self.record(&entry);
    }

    pub fn view_reset(&self, visible: usize, total: usize) {
        let mut entry = LogEntry::new(InteractionEvent::ViewReset, Severity::Info);
        entry.visible = Some(visible as u64);
        entry.total = Some(total as u64);
        self.record(&entry);
    }

    pub fn page_change(&self, page: &str) {
        let mut entry = LogEntry::new(InteractionEvent::PageChange, Severity::Info);
        entry.page = Some(page.to_string());
        self.record(&entry);
    }

    pub fn form_submit(&self, details: &str) {
        let mut entry = LogEntry::new(InteractionEvent::FormSubmit, Severity::Info);
        entry.details = Some(details.to_string());
        self.record(&entry);
    }

    pub fn form_reject(&self, field: &str, message: &str) {
        let mut entry = LogEntry::new(InteractionEvent::FormReject, Severity::Info);
        entry.field = Some(field.to_string());
        entry.error_message = Some(message.to_string());
        self.record(&entry);
    }

    pub fn error(&self, code: &str, message: &str) {
        let mut entry = LogEntry::new(InteractionEvent::Error, Severity::Warning);
        entry.error_code = Some(code.to_string());
        entry.error_message = Some(message.to_string());
        self.record(&entry);
    }
}
