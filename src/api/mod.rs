//! HTTP layer - page handlers and routing
//!
//! Server-rendered pages for the public site:
//! - home, about and contact pages
//! - post listings (all, by category, by tag), detail and search
//! - comment and newsletter submissions
//! - static assets under `/static`

pub mod comments;
pub mod common;
pub mod contact;
pub mod flash;
pub mod home;
pub mod middleware;
pub mod newsletter;
pub mod posts;
pub mod render;

#[cfg(test)]
mod tests;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

pub use middleware::{AppError, AppState};

/// Page routes
pub fn build_site_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/about/", get(home::about))
        .route("/contact/", get(contact::contact_page).post(contact::submit_contact))
        .route("/post-list/", get(posts::post_list))
        .route("/post-by-category/{category_id}/", get(posts::post_by_category))
        .route("/post-by-tag/{tag_id}/", get(posts::post_by_tag))
        .route("/post-detail/{id}/", get(posts::post_detail))
        .route("/comment/", post(comments::submit_comment))
        .route("/newsletter/", post(newsletter::subscribe))
        .route("/search/", get(posts::search))
}

async fn not_found() -> AppError {
    AppError::NotFound("no route".to_string())
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, static_path: &Path) -> Router {
    build_site_router()
        .nest_service("/static", ServeDir::new(static_path))
        .fallback(not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::render_error_pages,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
