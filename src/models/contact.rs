//! Contact message model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message sent through the contact form. Never updated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Input for storing a contact message
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContactInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}
