//! Contact message repository
//!
//! Contact messages are write-only from the site's point of view; reading them
//! back is left to whatever administrative tool sits on the database.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use crate::db::query;
use crate::db::DynDatabasePool;
use crate::models::{Contact, CreateContactInput};

#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Store a contact message
    async fn create(&self, input: &CreateContactInput) -> Result<Contact>;
}

/// SQLx-based contact repository implementation
pub struct SqlxContactRepository {
    pool: DynDatabasePool,
}

impl SqlxContactRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ContactRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepository {
    async fn create(&self, input: &CreateContactInput) -> Result<Contact> {
        let now = Utc::now();
        let id = query::insert(
            &self.pool,
            r#"
            INSERT INTO contacts (name, email, subject, message, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            vec![
                input.name.as_str().into(),
                input.email.as_str().into(),
                input.subject.as_str().into(),
                input.message.as_str().into(),
                now.into(),
                now.into(),
            ],
        )
        .await
        .context("Failed to store contact message")?;

        Ok(Contact {
            id,
            name: input.name.clone(),
            email: input.email.clone(),
            subject: input.subject.clone(),
            message: input.message.clone(),
            created_at: now,
        })
    }
}
