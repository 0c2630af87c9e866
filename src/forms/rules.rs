//! Field validation rules.
//!
//! Each field is checked in a fixed order: the required rule first, then
//! the type rule for non-empty values. An optional field left empty always
//! passes, so a blank phone is fine while a blank name is not. Checks never
//! fail with more than one message; the first broken rule wins.

use regex::Regex;

use crate::core::errors::{Result, SibError};

/// Message for a required field left blank.
pub const REQUIRED_MESSAGE: &str = "This field is required";
/// Message for a malformed email address.
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
/// Message for a malformed phone number.
pub const PHONE_MESSAGE: &str = "Please enter a valid phone number";

/// What shape a field's value must have, beyond being present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, no shape requirement.
    Text,
    /// Something@somewhere.tld, no whitespace around the separators.
    Email,
    /// Digits with optional leading `+`, separators tolerated.
    Phone,
}

/// Compiled validation rules, built once and shared by every form.
#[derive(Debug, Clone)]
pub struct FieldRules {
    email: Regex,
    phone: Regex,
    phone_noise: Regex,
}

impl FieldRules {
    pub fn new() -> Result<Self> {
        Ok(Self {
            email: compile(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")?,
            phone: compile(r"^\+?[1-9][0-9]{0,15}$")?,
            phone_noise: compile(r"[\s\-()]")?,
        })
    }

    /// Check one field value. Returns the error message to show, or `None`
    /// when the value passes. The value is trimmed before any rule runs.
    #[must_use]
    pub fn check(&self, kind: FieldKind, required: bool, raw: &str) -> Option<&'static str> {
        let value = raw.trim();
        if value.is_empty() {
            return required.then_some(REQUIRED_MESSAGE);
        }
        match kind {
            FieldKind::Text => None,
            FieldKind::Email => (!self.email.is_match(value)).then_some(EMAIL_MESSAGE),
            FieldKind::Phone => {
                let bare = self.phone_noise.replace_all(value, "");
                (!self.phone.is_match(&bare)).then_some(PHONE_MESSAGE)
            }
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|err| SibError::Runtime {
        details: format!("bad validation pattern {pattern:?}: {err}"),
    })
}
