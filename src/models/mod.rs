//! Data models
//!
//! Plain data structures shared by the repositories, services and handlers:
//! - Database entities (Post, Category, Tag, Comment, Contact, Subscriber)
//! - Input types for the repository `create` operations
//! - Pagination of listings

mod category;
mod comment;
mod contact;
mod newsletter;
pub mod pagination;
mod post;
mod tag;

pub use category::Category;
pub use comment::{Comment, CreateCommentInput};
pub use contact::{Contact, CreateContactInput};
pub use newsletter::Subscriber;
pub use pagination::{Page, PageToken, PaginationError, Paginator};
pub use post::{CreatePostInput, Post, PostStatus};
pub use tag::Tag;
