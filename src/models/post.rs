//! Post model
//!
//! This module provides:
//! - `Post` entity representing a news post
//! - `PostStatus` enum for publication states
//! - `CreatePostInput` used by the administrative seam to add posts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Unique identifier, increasing in insertion order
    pub id: i64,
    /// Post title
    pub title: String,
    /// HTML content
    pub content: String,
    /// Path of the featured image, relative to the static directory
    pub featured_image: Option<String>,
    /// Publication status
    pub status: PostStatus,
    /// Detail-page view counter
    pub views_count: i64,
    /// Publication timestamp; unset posts are never shown publicly
    pub published_at: Option<DateTime<Utc>>,
    /// Category ID
    pub category_id: i64,
    /// Category name, filled when the query joins categories
    #[serde(default)]
    pub category_name: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Whether the post may appear on public pages
    pub fn is_visible(&self) -> bool {
        self.status == PostStatus::Active && self.published_at.is_some()
    }
}

/// Post publication status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostStatus {
    /// Work in progress
    #[default]
    #[serde(rename = "draft")]
    Draft,
    /// Publicly visible once `published_at` is set
    #[serde(rename = "active")]
    Active,
    /// Withdrawn from the site
    #[serde(rename = "in_active")]
    Inactive,
}

impl PostStatus {
    /// Convert status to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Active => "active",
            PostStatus::Inactive => "in_active",
        }
    }

    /// Parse status from database string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(PostStatus::Draft),
            "active" => Some(PostStatus::Active),
            "in_active" => Some(PostStatus::Inactive),
            _ => None,
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for creating a new post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub category_id: i64,
    /// Starting view count, mostly useful for seeding
    #[serde(default)]
    pub views_count: i64,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

impl CreatePostInput {
    /// A draft post in the given category
    pub fn new(title: impl Into<String>, content: impl Into<String>, category_id: i64) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            featured_image: None,
            status: PostStatus::Draft,
            published_at: None,
            category_id,
            views_count: 0,
            tag_ids: Vec::new(),
        }
    }

    /// Mark the post active and published at `at`
    pub fn published(mut self, at: DateTime<Utc>) -> Self {
        self.status = PostStatus::Active;
        self.published_at = Some(at);
        self
    }

    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_views(mut self, views_count: i64) -> Self {
        self.views_count = views_count;
        self
    }

    pub fn with_featured_image(mut self, path: impl Into<String>) -> Self {
        self.featured_image = Some(path.into());
        self
    }

    pub fn with_tags(mut self, tag_ids: Vec<i64>) -> Self {
        self.tag_ids = tag_ids;
        self
    }
}
