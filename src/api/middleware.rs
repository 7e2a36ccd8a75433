//! Shared application state, the error type returned by handlers, and the
//! middleware that turns error responses into themed error pages.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use super::render;
use crate::config::SiteConfig;
use crate::db::repositories::{
    CommentRepositoryImpl, SqlxCategoryRepository, SqlxContactRepository,
    SqlxNewsletterRepository, SqlxPostRepository, SqlxTagRepository,
};
use crate::db::DynDatabasePool;
use crate::services::{
    CommentService, ContactService, NewsletterService, PostService, PostServiceError,
};
use crate::theme::ThemeEngine;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub site: Arc<SiteConfig>,
    pub post_service: Arc<PostService>,
    pub comment_service: Arc<CommentService>,
    pub contact_service: Arc<ContactService>,
    pub newsletter_service: Arc<NewsletterService>,
    pub theme: Arc<ThemeEngine>,
}

impl AppState {
    /// Wire repositories and services over `pool`
    pub fn new(pool: DynDatabasePool, site: &SiteConfig, theme: ThemeEngine) -> Self {
        let posts = SqlxPostRepository::boxed(pool.clone());
        let comments = CommentRepositoryImpl::boxed(pool.clone());

        let post_service = PostService::new(
            posts.clone(),
            SqlxCategoryRepository::boxed(pool.clone()),
            SqlxTagRepository::boxed(pool.clone()),
            comments.clone(),
            i64::from(site.posts_per_page),
        );

        Self {
            site: Arc::new(site.clone()),
            post_service: Arc::new(post_service),
            comment_service: Arc::new(CommentService::new(posts, comments)),
            contact_service: Arc::new(ContactService::new(SqlxContactRepository::boxed(
                pool.clone(),
            ))),
            newsletter_service: Arc::new(NewsletterService::new(
                SqlxNewsletterRepository::boxed(pool),
            )),
            theme: Arc::new(theme),
        }
    }
}

/// Error returned by page handlers
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Marker left on error responses so `render_error_pages` can theme them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPage {
    pub title: &'static str,
    pub message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn page(&self) -> ErrorPage {
        match self {
            Self::NotFound(_) => ErrorPage {
                title: "Page not found",
                message: "The page you were looking for does not exist.".to_string(),
            },
            Self::BadRequest(message) => ErrorPage {
                title: "Bad request",
                message: message.clone(),
            },
            // internal details stay in the log
            Self::Internal(_) => ErrorPage {
                title: "Server error",
                message: "Something went wrong on our end. Please try again later.".to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(err) => tracing::error!("Request failed: {:#}", err),
            Self::NotFound(what) => tracing::debug!("Not found: {}", what),
            Self::BadRequest(why) => tracing::debug!("Bad request: {}", why),
        }

        let page = self.page();
        let mut response = (self.status(), page.message.clone()).into_response();
        response.extensions_mut().insert(page);
        response
    }
}

impl From<PostServiceError> for AppError {
    fn from(err: PostServiceError) -> Self {
        match err {
            PostServiceError::NotFound(id) => Self::NotFound(format!("post {}", id)),
            PostServiceError::PageOutOfRange(e) => Self::NotFound(e.to_string()),
            PostServiceError::InternalError(e) => Self::Internal(e),
        }
    }
}

/// Replace the plain body of an `AppError` response with the theme's error page
pub async fn render_error_pages(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let Some(page) = response.extensions().get::<ErrorPage>().cloned() else {
        return response;
    };
    let status = response.status();

    match render::render_error(&state, &path, status, &page).await {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            tracing::error!("Failed to render error page: {:#}", err);
            response
        }
    }
}
