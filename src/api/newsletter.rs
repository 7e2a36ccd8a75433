//! AJAX newsletter signup

use axum::{
    extract::{rejection::FormRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};

use super::common::is_ajax;
use super::middleware::AppState;
use crate::services::{NewsletterForm, SubmissionError};

pub const SUBSCRIBED: &str = "Successfully subscribed to our newsletter.";
pub const FORM_INVALID: &str = "Form is not valid";
pub const NOT_AJAX: &str = "Cannot process request. Must be an AJAX XMLHttpRequest";
pub const FAILED: &str = "Cannot process request. Please try again later.";

/// JSON body of every newsletter response
#[derive(Debug, Serialize, Deserialize)]
pub struct NewsletterResponse {
    pub success: bool,
    pub message: String,
}

fn reply(status: StatusCode, success: bool, message: &str) -> Response {
    let body = NewsletterResponse {
        success,
        message: message.to_string(),
    };
    (status, Json(body)).into_response()
}

/// POST /newsletter/
pub async fn subscribe(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<NewsletterForm>, FormRejection>,
) -> Response {
    if !is_ajax(&headers) {
        return reply(StatusCode::BAD_REQUEST, false, NOT_AJAX);
    }
    let Ok(Form(form)) = form else {
        return reply(StatusCode::BAD_REQUEST, false, FORM_INVALID);
    };

    match state.newsletter_service.subscribe(&form).await {
        Ok(_) => reply(StatusCode::CREATED, true, SUBSCRIBED),
        Err(SubmissionError::Invalid(errors)) => {
            tracing::debug!("Rejected newsletter signup: {:?}", errors);
            reply(StatusCode::BAD_REQUEST, false, FORM_INVALID)
        }
        Err(SubmissionError::InternalError(err)) => {
            tracing::error!("Newsletter signup failed: {:#}", err);
            reply(StatusCode::INTERNAL_SERVER_ERROR, false, FAILED)
        }
    }
}
