//! Post service
//!
//! Builds the public views of the post collection:
//! - the home page selections (latest, featured, weekly top)
//! - paginated listings by category, tag or search text
//! - the detail view with previous/next navigation and view counting

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::db::repositories::{
    CategoryRepository, CommentRepository, PostFilter, PostRepository, TagRepository,
};
use crate::models::{Category, Comment, Page, PageToken, PaginationError, Paginator, Post, Tag};

/// Posts shown in the home page's main column
pub const HOME_POST_COUNT: i64 = 5;
/// Rank 1 plus ranks 2-4
pub const FEATURED_POST_COUNT: i64 = 4;
pub const WEEKLY_TOP_COUNT: i64 = 7;
pub const WEEKLY_TOP_DAYS: i64 = 7;

/// Error types for post service operations
#[derive(Debug, thiserror::Error)]
pub enum PostServiceError {
    /// Post missing or not publicly visible
    #[error("Post not found: {0}")]
    NotFound(i64),

    /// Requested page number does not exist
    #[error(transparent)]
    PageOutOfRange(#[from] PaginationError),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Everything the home page shows
#[derive(Debug, Clone, Serialize)]
pub struct HomePage {
    pub posts: Vec<Post>,
    pub featured_post: Option<Post>,
    pub featured_posts: Vec<Post>,
    pub weekly_top_posts: Vec<Post>,
}

/// A post with its surroundings on the detail page
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub tags: Vec<Tag>,
    pub comments: Vec<Comment>,
    pub previous_post: Option<Post>,
    pub next_post: Option<Post>,
}

/// Post service for the public site
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    comments: Arc<dyn CommentRepository>,
    per_page: i64,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        categories: Arc<dyn CategoryRepository>,
        tags: Arc<dyn TagRepository>,
        comments: Arc<dyn CommentRepository>,
        per_page: i64,
    ) -> Self {
        Self {
            posts,
            categories,
            tags,
            comments,
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    /// Home page selections as of `now`
    pub async fn home(&self, now: DateTime<Utc>) -> Result<HomePage, PostServiceError> {
        let posts = self
            .posts
            .list_visible_in_id_order(HOME_POST_COUNT)
            .await
            .context("Failed to load latest posts")?;

        let mut featured = self
            .posts
            .list_most_viewed(FEATURED_POST_COUNT)
            .await
            .context("Failed to load featured posts")?
            .into_iter();
        let featured_post = featured.next();
        let featured_posts = featured.collect();

        let since = now - Duration::days(WEEKLY_TOP_DAYS);
        let weekly_top_posts = self
            .posts
            .list_published_since(since, WEEKLY_TOP_COUNT)
            .await
            .context("Failed to load weekly top posts")?;

        Ok(HomePage {
            posts,
            featured_post,
            featured_posts,
            weekly_top_posts,
        })
    }

    /// One page of visible posts matching `filter`
    pub async fn list(
        &self,
        filter: &PostFilter,
        token: PageToken,
    ) -> Result<Page<Post>, PostServiceError> {
        let total = self
            .posts
            .count_visible(filter)
            .await
            .context("Failed to count posts")?;

        let paginator = Paginator::new(total, self.per_page);
        let number = paginator.resolve(token)?;

        let items = self
            .posts
            .list_visible(filter, paginator.offset(number), paginator.limit())
            .await
            .context("Failed to list posts")?;

        Ok(Page::new(items, number, &paginator))
    }

    /// Detail view of a visible post. Counts one view.
    pub async fn detail(&self, id: i64) -> Result<PostDetail, PostServiceError> {
        let mut post = self
            .posts
            .get_visible(id)
            .await
            .context("Failed to load post")?
            .ok_or(PostServiceError::NotFound(id))?;

        if self.posts.increment_views(id).await? {
            post.views_count += 1;
        }
        tracing::debug!("Post {} viewed ({} views)", id, post.views_count);

        self.surroundings(post).await
    }

    /// Tags, comments and neighbours of `post` without counting a view
    pub async fn surroundings(&self, post: Post) -> Result<PostDetail, PostServiceError> {
        let tags = self
            .tags
            .list_by_post(post.id)
            .await
            .context("Failed to load post tags")?;
        let comments = self
            .comments
            .list_by_post(post.id)
            .await
            .context("Failed to load comments")?;
        let previous_post = self
            .posts
            .previous_visible(post.id)
            .await
            .context("Failed to load previous post")?;
        let next_post = self
            .posts
            .next_visible(post.id)
            .await
            .context("Failed to load next post")?;

        Ok(PostDetail {
            post,
            tags,
            comments,
            previous_post,
            next_post,
        })
    }

    /// Any post by ID, visible or not
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>, PostServiceError> {
        Ok(self.posts.get_by_id(id).await?)
    }

    pub async fn category(&self, id: i64) -> Result<Option<Category>, PostServiceError> {
        Ok(self.categories.get_by_id(id).await?)
    }

    pub async fn tag(&self, id: i64) -> Result<Option<Tag>, PostServiceError> {
        Ok(self.tags.get_by_id(id).await?)
    }

    /// Categories and tags for site navigation
    pub async fn navigation(&self) -> Result<(Vec<Category>, Vec<Tag>), PostServiceError> {
        let categories = self
            .categories
            .list_all()
            .await
            .context("Failed to list categories")?;
        let tags = self.tags.list_all().await.context("Failed to list tags")?;
        Ok((categories, tags))
    }
}
