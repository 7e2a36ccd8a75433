//! Post listings, detail page and search

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
};
use serde_json::json;
use tera::Context;

use super::common::{PageQuery, SearchQuery};
use super::middleware::{AppError, AppState};
use super::render::{render_page, SiteContext};
use crate::db::repositories::PostFilter;
use crate::models::{Page, PageToken, Post};
use crate::services::PostDetail;

async fn render_list(
    state: &AppState,
    site: SiteContext,
    filter: PostFilter,
    token: PageToken,
    heading: &str,
) -> Result<Response, AppError> {
    let page = state.post_service.list(&filter, token).await?;

    let mut context = Context::new();
    context.insert("page", &page);
    context.insert("heading", heading);
    render_page(state, site, "list.html", &context, StatusCode::OK).await
}

/// GET /post-list/
pub async fn post_list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    site: SiteContext,
) -> Result<Response, AppError> {
    render_list(&state, site, PostFilter::All, query.token(), "Latest News").await
}

/// GET /post-by-category/{category_id}/
pub async fn post_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
    Query(query): Query<PageQuery>,
    site: SiteContext,
) -> Result<Response, AppError> {
    let heading = match state.post_service.category(category_id).await? {
        Some(category) => category.name,
        None => "Category".to_string(),
    };
    render_list(&state, site, PostFilter::Category(category_id), query.token(), &heading).await
}

/// GET /post-by-tag/{tag_id}/
pub async fn post_by_tag(
    State(state): State<AppState>,
    Path(tag_id): Path<i64>,
    Query(query): Query<PageQuery>,
    site: SiteContext,
) -> Result<Response, AppError> {
    let heading = match state.post_service.tag(tag_id).await? {
        Some(tag) => format!("#{}", tag.name),
        None => "Tag".to_string(),
    };
    render_list(&state, site, PostFilter::Tag(tag_id), query.token(), &heading).await
}

/// Template context for the detail page. `form` and `errors` hold a rejected
/// comment submission, if any.
pub(super) fn detail_context(
    detail: &PostDetail,
    form: serde_json::Value,
    errors: serde_json::Value,
) -> Context {
    let mut context = Context::new();
    context.insert("post", &detail.post);
    context.insert("post_tags", &detail.tags);
    context.insert("comments", &detail.comments);
    context.insert("previous_post", &detail.previous_post);
    context.insert("next_post", &detail.next_post);
    context.insert("form", &form);
    context.insert("errors", &errors);
    context
}

/// GET /post-detail/{id}/ - counts a view
pub async fn post_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    site: SiteContext,
) -> Result<Response, AppError> {
    let detail = state.post_service.detail(id).await?;
    let context = detail_context(&detail, json!({}), json!({}));
    render_page(&state, site, "detail.html", &context, StatusCode::OK).await
}

/// GET /search/?query=
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
    site: SiteContext,
) -> Result<Response, AppError> {
    let page: Page<Post> = state
        .post_service
        .list(&PostFilter::Search(query.query.clone()), query.token())
        .await?;

    let mut context = Context::new();
    context.insert("page", &page);
    context.insert("query", &query.query);
    render_page(&state, site, "search.html", &context, StatusCode::OK).await
}
