//! Contact form

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::Response,
    Form,
};
use tera::Context;

use super::flash::redirect_with;
use super::middleware::{AppError, AppState};
use super::render::{render_page, SiteContext};
use crate::services::{ContactForm, FieldErrors, SubmissionError};
use crate::theme::Message;

pub const SUBMITTED: &str = "Successfully submitted your query. We will contact you soon.";
pub const NOT_SUBMITTED: &str = "Cannot submit your query. Please make sure all fields are valid.";

async fn render_form(
    state: &AppState,
    site: SiteContext,
    form: &ContactForm,
    errors: &FieldErrors,
) -> Result<Response, AppError> {
    let mut context = Context::new();
    context.insert("form", form);
    context.insert("errors", errors);
    render_page(state, site, "contact.html", &context, StatusCode::OK).await
}

/// GET /contact/
pub async fn contact_page(
    State(state): State<AppState>,
    site: SiteContext,
) -> Result<Response, AppError> {
    render_form(&state, site, &ContactForm::default(), &FieldErrors::new()).await
}

/// POST /contact/
pub async fn submit_contact(
    State(state): State<AppState>,
    mut site: SiteContext,
    form: Result<Form<ContactForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Form(form) = form.map_err(|e| AppError::BadRequest(e.body_text()))?;

    match state.contact_service.submit(&form).await {
        Ok(_) => Ok(redirect_with("/contact/", Message::success(SUBMITTED))),
        Err(SubmissionError::Invalid(errors)) => {
            site.notify(Message::error(NOT_SUBMITTED));
            render_form(&state, site, &form, &errors).await
        }
        Err(SubmissionError::InternalError(err)) => Err(AppError::Internal(err)),
    }
}
