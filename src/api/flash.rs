//! One-shot notices carried across a redirect in a cookie

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::theme::Message;

pub const FLASH_COOKIE: &str = "newspaper_messages";

/// Messages stored in the flash cookie. Garbage reads as empty.
pub fn read_messages(jar: &CookieJar) -> Vec<Message> {
    jar.get(FLASH_COOKIE)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
        .unwrap_or_default()
}

fn flash_cookie(value: String) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Add a cookie holding `messages` to `jar`
pub fn store(jar: CookieJar, messages: &[Message]) -> CookieJar {
    let json = serde_json::to_string(messages).unwrap_or_else(|_| "[]".to_string());
    jar.add(flash_cookie(json))
}

/// Add a cookie to `jar` that deletes the flash cookie in the browser
pub fn clear(jar: CookieJar) -> CookieJar {
    let mut cookie = flash_cookie(String::new());
    cookie.make_removal();
    jar.add(cookie)
}

/// 303 redirect to `to` carrying `message` for the next page
pub fn redirect_with(to: &str, message: Message) -> Response {
    (store(CookieJar::new(), &[message]), Redirect::to(to)).into_response()
}
