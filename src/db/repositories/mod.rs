//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles the operations for a specific entity.

pub mod category;
pub mod comment;
pub mod contact;
pub mod newsletter;
pub mod post;
pub mod tag;

pub use category::{CategoryRepository, SqlxCategoryRepository};
pub use comment::{CommentRepository, CommentRepositoryImpl};
pub use contact::{ContactRepository, SqlxContactRepository};
pub use newsletter::{NewsletterRepository, SqlxNewsletterRepository};
pub use post::{PostFilter, PostRepository, SqlxPostRepository};
pub use tag::{SqlxTagRepository, TagRepository};
