//! Comment submission

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};

use super::middleware::{AppError, AppState};
use super::posts::detail_context;
use super::render::{render_page, SiteContext};
use crate::services::{CommentForm, CommentSubmissionError};

/// POST /comment/
///
/// Redirects to the post on success. Invalid fields re-render the post's
/// detail page with the errors and without counting a view.
pub async fn submit_comment(
    State(state): State<AppState>,
    site: SiteContext,
    form: Result<Form<CommentForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Form(form) = form.map_err(|e| AppError::BadRequest(e.body_text()))?;

    match state.comment_service.submit(&form).await {
        Ok(comment) => {
            Ok(Redirect::to(&format!("/post-detail/{}/", comment.post_id)).into_response())
        }
        Err(CommentSubmissionError::BadPostId) => Err(AppError::BadRequest(
            "A numeric post id is required.".to_string(),
        )),
        Err(CommentSubmissionError::PostNotFound(id)) => {
            Err(AppError::NotFound(format!("comment target {}", id)))
        }
        Err(CommentSubmissionError::Invalid { post, errors }) => {
            let detail = state.post_service.surroundings(*post).await?;
            let form = serde_json::to_value(&form).map_err(anyhow::Error::from)?;
            let errors = serde_json::to_value(&errors).map_err(anyhow::Error::from)?;
            let context = detail_context(&detail, form, errors);
            render_page(&state, site, "detail.html", &context, StatusCode::OK).await
        }
        Err(CommentSubmissionError::InternalError(err)) => Err(AppError::Internal(err)),
    }
}
