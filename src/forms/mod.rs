//! Contact form state and validation.

pub mod contact;
pub mod rules;

pub use contact::{ContactFieldId, ContactForm, SubmissionRecord};
pub use rules::{FieldKind, FieldRules};
