//! Tag repository
//!
//! Tags are attached to posts through the `post_tags` join table.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::mysql::MySqlRow;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::sync::Arc;

use crate::config::DatabaseDriver;
use crate::db::query::{self, Bind};
use crate::db::DynDatabasePool;
use crate::models::Tag;

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Create a tag with a unique name
    async fn create(&self, name: &str) -> Result<Tag>;

    /// Get tag by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>>;

    /// List all tags in creation order
    async fn list_all(&self) -> Result<Vec<Tag>>;

    /// Tags attached to a post
    async fn list_by_post(&self, post_id: i64) -> Result<Vec<Tag>>;

    /// Attach a tag to a post
    async fn add_to_post(&self, tag_id: i64, post_id: i64) -> Result<()>;
}

/// SQLx-based tag repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxTagRepository {
    pool: DynDatabasePool,
}

impl SqlxTagRepository {
    /// Create a new SQLx tag repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(pool))
    }

    async fn fetch_all(&self, sql: &str, binds: Vec<Bind>) -> Result<Vec<Tag>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => query::fetch_all_sqlite(self.pool.sqlite()?, sql, binds)
                .await?
                .iter()
                .map(row_to_tag_sqlite)
                .collect(),
            DatabaseDriver::Mysql => query::fetch_all_mysql(self.pool.mysql()?, sql, binds)
                .await?
                .iter()
                .map(row_to_tag_mysql)
                .collect(),
        }
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn create(&self, name: &str) -> Result<Tag> {
        let now = Utc::now();
        let id = query::insert(
            &self.pool,
            "INSERT INTO tags (name, created_at, updated_at) VALUES (?, ?, ?)",
            vec![name.into(), now.into(), now.into()],
        )
        .await
        .with_context(|| format!("Failed to create tag {:?}", name))?;

        self.get_by_id(id).await?.context("Tag not found after insert")
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>> {
        let tags = self
            .fetch_all(
                "SELECT id, name, created_at, updated_at FROM tags WHERE id = ?",
                vec![id.into()],
            )
            .await?;
        Ok(tags.into_iter().next())
    }

    async fn list_all(&self) -> Result<Vec<Tag>> {
        self.fetch_all(
            "SELECT id, name, created_at, updated_at FROM tags ORDER BY id",
            vec![],
        )
        .await
    }

    async fn list_by_post(&self, post_id: i64) -> Result<Vec<Tag>> {
        self.fetch_all(
            r#"
            SELECT t.id, t.name, t.created_at, t.updated_at
            FROM tags t
            INNER JOIN post_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = ?
            ORDER BY t.name
            "#,
            vec![post_id.into()],
        )
        .await
    }

    async fn add_to_post(&self, tag_id: i64, post_id: i64) -> Result<()> {
        query::execute(
            &self.pool,
            "INSERT INTO post_tags (post_id, tag_id) VALUES (?, ?)",
            vec![post_id.into(), tag_id.into()],
        )
        .await
        .with_context(|| format!("Failed to tag post {} with tag {}", post_id, tag_id))?;
        Ok(())
    }
}

fn row_to_tag_sqlite(row: &SqliteRow) -> Result<Tag> {
    Ok(Tag {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_tag_mysql(row: &MySqlRow) -> Result<Tag> {
    Ok(Tag {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
