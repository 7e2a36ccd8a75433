//! Contact service
//!
//! Validates and stores messages sent through the contact form.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::validation::{required, required_email, required_max, FieldErrors, SubmissionError};
use crate::db::repositories::ContactRepository;
use crate::models::{Contact, CreateContactInput};

pub const NAME_MAX_LENGTH: usize = 100;
pub const SUBJECT_MAX_LENGTH: usize = 200;

/// Raw contact form as submitted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

impl ContactForm {
    pub fn validate(&self) -> Result<CreateContactInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required_max(&mut errors, "name", self.name.as_deref(), NAME_MAX_LENGTH);
        let email = required_email(&mut errors, "email", self.email.as_deref());
        let subject = required_max(&mut errors, "subject", self.subject.as_deref(), SUBJECT_MAX_LENGTH);
        let message = required(&mut errors, "message", self.message.as_deref());

        match (name, email, subject, message) {
            (Some(name), Some(email), Some(subject), Some(message)) if errors.is_empty() => {
                Ok(CreateContactInput {
                    name,
                    email,
                    subject,
                    message,
                })
            }
            _ => Err(errors),
        }
    }
}

pub struct ContactService {
    repo: Arc<dyn ContactRepository>,
}

impl ContactService {
    pub fn new(repo: Arc<dyn ContactRepository>) -> Self {
        Self { repo }
    }

    /// Validate and store a contact message
    pub async fn submit(&self, form: &ContactForm) -> Result<Contact, SubmissionError> {
        let input = form.validate().map_err(SubmissionError::Invalid)?;
        let contact = self.repo.create(&input).await?;
        tracing::info!("Contact message {} received from {}", contact.id, contact.email);
        Ok(contact)
    }
}
