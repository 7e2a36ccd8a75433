//! Comment service
//!
//! Comments reference their post by ID; the target post is looked up without
//! regard to visibility.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::validation::{required, required_email, required_max, FieldErrors};
use crate::db::repositories::{CommentRepository, PostRepository};
use crate::models::{Comment, CreateCommentInput, Post};

pub const NAME_MAX_LENGTH: usize = 50;

/// Raw comment form as submitted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    /// Target post ID, kept raw so a bad value can be told apart from a missing one
    pub post: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub comment: Option<String>,
}

impl CommentForm {
    /// The target post ID, if present and an integer
    pub fn post_id(&self) -> Option<i64> {
        self.post.as_deref()?.trim().parse().ok()
    }

    fn validate(&self, post_id: i64) -> Result<CreateCommentInput, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = required_max(&mut errors, "name", self.name.as_deref(), NAME_MAX_LENGTH);
        let email = required_email(&mut errors, "email", self.email.as_deref());
        let comment = required(&mut errors, "comment", self.comment.as_deref());

        match (name, email, comment) {
            (Some(name), Some(email), Some(comment)) if errors.is_empty() => Ok(CreateCommentInput {
                post_id,
                name,
                email,
                comment,
            }),
            _ => Err(errors),
        }
    }
}

/// Error types for comment submissions
#[derive(Debug, thiserror::Error)]
pub enum CommentSubmissionError {
    /// `post` field missing or not an integer
    #[error("Missing or malformed post id")]
    BadPostId,

    /// No post with that ID
    #[error("Post not found: {0}")]
    PostNotFound(i64),

    /// Field validation failed; carries the post for re-rendering
    #[error("Invalid comment")]
    Invalid { post: Box<Post>, errors: FieldErrors },

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct CommentService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    /// Validate and store a comment on an existing post
    pub async fn submit(&self, form: &CommentForm) -> Result<Comment, CommentSubmissionError> {
        let post_id = form.post_id().ok_or(CommentSubmissionError::BadPostId)?;

        let post = self
            .posts
            .get_by_id(post_id)
            .await
            .context("Failed to load comment target")?
            .ok_or(CommentSubmissionError::PostNotFound(post_id))?;

        let input = form
            .validate(post.id)
            .map_err(|errors| CommentSubmissionError::Invalid {
                post: Box::new(post),
                errors,
            })?;

        let comment = self.comments.create(&input).await?;
        tracing::info!("Comment {} added to post {}", comment.id, comment.post_id);
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{CommentRepositoryImpl, SqlxPostRepository};
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> CommentService {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        pool.execute("INSERT INTO categories (name) VALUES ('General')").await.unwrap();
        // a draft post: comments do not care about visibility
        pool.execute("INSERT INTO posts (title, content, category_id) VALUES ('Draft', 'c', 1)")
            .await
            .unwrap();
        CommentService::new(
            SqlxPostRepository::boxed(pool.clone()),
            CommentRepositoryImpl::boxed(pool),
        )
    }

    fn form(post: Option<&str>) -> CommentForm {
        CommentForm {
            post: post.map(str::to_string),
            name: Some("Ann".to_string()),
            email: Some("ann@example.com".to_string()),
            comment: Some("Great read".to_string()),
        }
    }

    #[test]
    fn test_post_id_parsing() {
        assert_eq!(form(Some("12")).post_id(), Some(12));
        assert_eq!(form(Some(" 3 ")).post_id(), Some(3));
        assert_eq!(form(Some("x")).post_id(), None);
        assert_eq!(form(None).post_id(), None);
    }

    #[tokio::test]
    async fn test_submit_comment() {
        let service = setup().await;
        let comment = service.submit(&form(Some("1"))).await.unwrap();
        assert_eq!(comment.post_id, 1);
        assert_eq!(comment.name, "Ann");
    }

    #[tokio::test]
    async fn test_bad_post_id() {
        let service = setup().await;
        assert!(matches!(
            service.submit(&form(None)).await,
            Err(CommentSubmissionError::BadPostId)
        ));
        assert!(matches!(
            service.submit(&form(Some("one"))).await,
            Err(CommentSubmissionError::BadPostId)
        ));
    }

    #[tokio::test]
    async fn test_unknown_post() {
        let service = setup().await;
        assert!(matches!(
            service.submit(&form(Some("99"))).await,
            Err(CommentSubmissionError::PostNotFound(99))
        ));
    }

    #[tokio::test]
    async fn test_invalid_fields_return_post() {
        let service = setup().await;
        let mut bad = form(Some("1"));
        bad.name = Some("n".repeat(NAME_MAX_LENGTH + 1));
        bad.email = Some("bad".to_string());

        match service.submit(&bad).await {
            Err(CommentSubmissionError::Invalid { post, errors }) => {
                assert_eq!(post.id, 1);
                assert!(errors.contains("name"));
                assert!(errors.contains("email"));
                assert!(!errors.contains("comment"));
            }
            other => panic!("expected invalid comment, got {:?}", other),
        }
    }
}
