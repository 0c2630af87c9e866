//! The contact form: four fields, blur validation, reset-on-submit.
//!
//! Moving focus off a field validates it, so errors surface as the visitor
//! works through the form rather than all at once. Submission gates on the
//! required fields; when they pass, the form clears and a record of the
//! message is returned for the caller to log and acknowledge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::forms::rules::{FieldKind, FieldRules};

/// The fields of the contact form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactFieldId {
    Name,
    Email,
    Phone,
    Message,
}

impl ContactFieldId {
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Phone, Self::Message];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Message => "Message",
        }
    }

    #[must_use]
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Name | Self::Message => FieldKind::Text,
            Self::Email => FieldKind::Email,
            Self::Phone => FieldKind::Phone,
        }
    }

    /// Phone is the one optional field.
    #[must_use]
    pub const fn is_required(self) -> bool {
        !matches!(self, Self::Phone)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Name => 0,
            Self::Email => 1,
            Self::Phone => 2,
            Self::Message => 3,
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Name => Self::Email,
            Self::Email => Self::Phone,
            Self::Phone => Self::Message,
            Self::Message => Self::Name,
        }
    }

    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Name => Self::Message,
            Self::Email => Self::Name,
            Self::Phone => Self::Email,
            Self::Message => Self::Phone,
        }
    }
}

/// A message accepted by the form, timestamped at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub name: String,
    pub email: String,
    /// Empty when the visitor left the optional field blank.
    pub phone: String,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
struct FieldState {
    value: String,
    error: Option<&'static str>,
}

/// Live form state.
#[derive(Debug, Clone)]
pub struct ContactForm {
    rules: FieldRules,
    fields: [FieldState; 4],
    focus: ContactFieldId,
}

impl ContactForm {
    #[must_use]
    pub fn new(rules: FieldRules) -> Self {
        Self {
            rules,
            fields: Default::default(),
            focus: ContactFieldId::Name,
        }
    }

    #[must_use]
    pub const fn focus(&self) -> ContactFieldId {
        self.focus
    }

    #[must_use]
    pub fn value(&self, id: ContactFieldId) -> &str {
        &self.fields[id.index()].value
    }

    #[must_use]
    pub fn error(&self, id: ContactFieldId) -> Option<&'static str> {
        self.fields[id.index()].error
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|field| field.error.is_some())
    }

    pub fn set_value(&mut self, id: ContactFieldId, value: &str) {
        self.fields[id.index()].value = value.to_string();
    }

    /// Append to the focused field.
    pub fn push_char(&mut self, c: char) {
        self.fields[self.focus.index()].value.push(c);
    }

    /// Delete the last character of the focused field.
    pub fn pop_char(&mut self) {
        self.fields[self.focus.index()].value.pop();
    }

    /// Leave the focused field for the next one, validating on the way out.
    pub fn focus_next(&mut self) {
        self.validate_field(self.focus);
        self.focus = self.focus.next();
    }

    /// Leave the focused field for the previous one, validating on the way
    /// out.
    pub fn focus_prev(&mut self) {
        self.validate_field(self.focus);
        self.focus = self.focus.prev();
    }

    pub fn focus_field(&mut self, id: ContactFieldId) {
        if id != self.focus {
            self.validate_field(self.focus);
            self.focus = id;
        }
    }

    /// Check one field and record its error state. Returns whether the
    /// field passed.
    pub fn validate_field(&mut self, id: ContactFieldId) -> bool {
        let error = self
            .rules
            .check(id.kind(), id.is_required(), &self.fields[id.index()].value);
        self.fields[id.index()].error = error;
        error.is_none()
    }

    /// Attempt submission at `now`. Every required field is validated; if
    /// all pass, the form resets and the accepted message comes back with
    /// trimmed values. Otherwise the per-field errors stand and nothing is
    /// cleared.
    pub fn submit(&mut self, now: DateTime<Utc>) -> Option<SubmissionRecord> {
        let mut all_required_pass = true;
        for id in ContactFieldId::ALL {
            if id.is_required() && !self.validate_field(id) {
                all_required_pass = false;
            }
        }
        if !all_required_pass {
            return None;
        }

        let record = SubmissionRecord {
            name: self.value(ContactFieldId::Name).trim().to_string(),
            email: self.value(ContactFieldId::Email).trim().to_string(),
            phone: self.value(ContactFieldId::Phone).trim().to_string(),
            message: self.value(ContactFieldId::Message).trim().to_string(),
            submitted_at: now,
        };
        self.reset();
        Some(record)
    }

    /// Clear every value, every error, and return focus to the top.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
            field.error = None;
        }
        self.focus = ContactFieldId::Name;
    }
}
