//! Query parameters and request helpers shared by handlers

use axum::http::HeaderMap;
use serde::Deserialize;

use crate::models::PageToken;

/// `?page=` on paginated listings
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
}

impl PageQuery {
    pub fn token(&self) -> PageToken {
        PageToken::parse(self.page.as_deref())
    }
}

/// `?query=&page=` on the search page. `query` is required.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default)]
    pub page: Option<String>,
}

impl SearchQuery {
    pub fn token(&self) -> PageToken {
        PageToken::parse(self.page.as_deref())
    }
}

/// Whether the request was sent by `XMLHttpRequest`/`fetch` with the usual marker header
pub fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == "XMLHttpRequest")
}
