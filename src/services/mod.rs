//! Services layer - Business logic
//!
//! Services sit between the HTTP handlers and the repositories:
//! - Building the public views of posts (home, listings, detail)
//! - Validating submitted forms
//! - Mapping failures to service error types

pub mod comment;
pub mod contact;
pub mod newsletter;
pub mod post;
pub mod validation;

pub use comment::{CommentForm, CommentService, CommentSubmissionError};
pub use contact::{ContactForm, ContactService};
pub use newsletter::{NewsletterForm, NewsletterService};
pub use post::{HomePage, PostDetail, PostService, PostServiceError};
pub use validation::{FieldErrors, SubmissionError};
