//! Form validation
//!
//! Submitted forms arrive as optional strings. Each form collects its problems
//! into [`FieldErrors`] (field name to messages) so a handler can re-render the
//! form next to the values the visitor typed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";

/// Longest accepted email address
pub const EMAIL_MAX_LENGTH: usize = 254;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@([a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}$",
    )
    .expect("email pattern is valid")
});

/// Validation messages keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= EMAIL_MAX_LENGTH && EMAIL_RE.is_match(email)
}

/// Trimmed, non-empty value of a required field
pub fn required(errors: &mut FieldErrors, field: &str, value: Option<&str>) -> Option<String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => Some(v.to_string()),
        None => {
            errors.add(field, REQUIRED);
            None
        }
    }
}

/// A required field no longer than `max` characters
pub fn required_max(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Option<String> {
    let value = required(errors, field, value)?;
    let len = value.chars().count();
    if len > max {
        errors.add(
            field,
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                max, len
            ),
        );
        return None;
    }
    Some(value)
}

/// A required, well-formed email address
pub fn required_email(errors: &mut FieldErrors, field: &str, value: Option<&str>) -> Option<String> {
    let value = required(errors, field, value)?;
    if !is_valid_email(&value) {
        errors.add(field, INVALID_EMAIL);
        return None;
    }
    Some(value)
}

/// Error types for form submissions
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// One or more fields failed validation
    #[error("Invalid form submission")]
    Invalid(FieldErrors),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Whether an error chain bottoms out in a unique-constraint violation
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<sqlx::Error>(),
            Some(sqlx::Error::Database(db)) if db.is_unique_violation()
        )
    })
}
