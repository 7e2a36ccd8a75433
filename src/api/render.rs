//! Page rendering with the standard template variables

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use std::convert::Infallible;
use tera::Context;

use super::flash;
use super::middleware::{AppError, AppState, ErrorPage};
use crate::theme::{Message, StandardTemplateVars};

/// Per-request page data: the path being served and pending notices
#[derive(Debug, Clone)]
pub struct SiteContext {
    pub path: String,
    pub messages: Vec<Message>,
    from_cookie: bool,
}

impl SiteContext {
    /// Show `message` on the page being rendered
    pub fn notify(&mut self, message: Message) {
        self.messages.push(message);
    }
}

impl<S> FromRequestParts<S> for SiteContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let messages = flash::read_messages(&CookieJar::from_headers(&parts.headers));
        Ok(Self {
            path: parts.uri.path().to_string(),
            from_cookie: !messages.is_empty(),
            messages,
        })
    }
}

async fn standard_vars(state: &AppState, path: &str, messages: Vec<Message>) -> StandardTemplateVars {
    let vars = StandardTemplateVars::new(&state.site.name, &state.site.description, path)
        .with_messages(messages);
    match state.post_service.navigation().await {
        Ok((categories, tags)) => vars.with_navigation(categories, tags),
        Err(err) => {
            tracing::warn!("Rendering without navigation: {}", err);
            vars
        }
    }
}

/// Render `template` into a full HTML response, consuming any flash notices
pub async fn render_page(
    state: &AppState,
    site: SiteContext,
    template: &str,
    context: &Context,
    status: StatusCode,
) -> Result<Response, AppError> {
    let vars = standard_vars(state, &site.path, site.messages).await;
    let html = state
        .theme
        .render_with_standard_vars(template, context, &vars)?;

    let jar = if site.from_cookie {
        flash::clear(CookieJar::new())
    } else {
        CookieJar::new()
    };
    Ok((status, jar, Html(html)).into_response())
}

/// Render the theme's error page
pub async fn render_error(
    state: &AppState,
    path: &str,
    status: StatusCode,
    page: &ErrorPage,
) -> anyhow::Result<String> {
    let mut context = Context::new();
    context.insert("status", &status.as_u16());
    context.insert("title", page.title);
    context.insert("message", &page.message);

    let vars = standard_vars(state, path, Vec::new()).await;
    state.theme.render_with_standard_vars("error.html", &context, &vars)
}
