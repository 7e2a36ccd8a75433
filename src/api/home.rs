//! Front page and about page

use axum::{extract::State, http::StatusCode, response::Response};
use chrono::Utc;
use tera::Context;

use super::middleware::{AppError, AppState};
use super::render::{render_page, SiteContext};

/// GET / - latest, featured and weekly top posts
pub async fn home(State(state): State<AppState>, site: SiteContext) -> Result<Response, AppError> {
    let home = state.post_service.home(Utc::now()).await?;

    let mut context = Context::new();
    context.insert("posts", &home.posts);
    context.insert("featured_post", &home.featured_post);
    context.insert("featured_posts", &home.featured_posts);
    context.insert("weekly_top_posts", &home.weekly_top_posts);

    render_page(&state, site, "home.html", &context, StatusCode::OK).await
}

/// GET /about/
pub async fn about(State(state): State<AppState>, site: SiteContext) -> Result<Response, AppError> {
    render_page(&state, site, "about.html", &Context::new(), StatusCode::OK).await
}
