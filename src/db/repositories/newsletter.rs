//! Newsletter subscriber repository

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use crate::db::query;
use crate::db::DynDatabasePool;
use crate::models::Subscriber;

#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    /// Store a subscriber; fails if the email is already subscribed
    async fn create(&self, email: &str) -> Result<Subscriber>;

    /// Whether `email` is already subscribed
    async fn exists_by_email(&self, email: &str) -> Result<bool>;
}

/// SQLx-based newsletter repository implementation
pub struct SqlxNewsletterRepository {
    pool: DynDatabasePool,
}

impl SqlxNewsletterRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn NewsletterRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl NewsletterRepository for SqlxNewsletterRepository {
    async fn create(&self, email: &str) -> Result<Subscriber> {
        let now = Utc::now();
        let id = query::insert(
            &self.pool,
            "INSERT INTO newsletters (email, created_at, updated_at) VALUES (?, ?, ?)",
            vec![email.into(), now.into(), now.into()],
        )
        .await
        .with_context(|| format!("Failed to subscribe {}", email))?;

        Ok(Subscriber {
            id,
            email: email.to_string(),
            created_at: now,
        })
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let count = query::count(
            &self.pool,
            "SELECT COUNT(*) AS count FROM newsletters WHERE email = ?",
            vec![email.into()],
        )
        .await?;
        Ok(count > 0)
    }
}
