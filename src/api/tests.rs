//! HTTP-level tests for the public site

use super::*;
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use chrono::{Duration, Utc};
use std::path::PathBuf;

use crate::config::SiteConfig;
use crate::db::repositories::{
    CategoryRepository, PostRepository, SqlxCategoryRepository, SqlxPostRepository,
    SqlxTagRepository, TagRepository,
};
use crate::db::{create_test_pool, migrations, DynDatabasePool};
use crate::models::{CreatePostInput, PostStatus};
use crate::theme::ThemeEngine;
use super::newsletter::NewsletterResponse;

struct Fixture {
    pool: DynDatabasePool,
    server: TestServer,
}

fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

fn ajax() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    )
}

/// Eight posts; 4 (draft), 6 (inactive) and 7 (unpublished) are hidden,
/// leaving ids [1, 2, 3, 5, 8] visible.
async fn setup() -> Fixture {
    let pool = create_test_pool().await.unwrap();
    migrations::run_migrations(&pool).await.unwrap();

    let categories = SqlxCategoryRepository::new(pool.clone());
    let world = categories.create("World").await.unwrap();
    let sports = categories.create("Sports").await.unwrap();
    let economy = SqlxTagRepository::new(pool.clone()).create("economy").await.unwrap();

    let now = Utc::now();
    let posts = SqlxPostRepository::new(pool.clone());
    let inputs = vec![
        CreatePostInput::new("Alpha report", "<p>Old news</p>", world.id)
            .published(now - Duration::days(30))
            .with_views(10),
        CreatePostInput::new("Bravo market", "<p>Stocks climb</p>", world.id)
            .published(now - Duration::hours(5))
            .with_views(50)
            .with_tags(vec![economy.id]),
        CreatePostInput::new("Charlie match", "<p>A late goal</p>", sports.id)
            .published(now - Duration::hours(4))
            .with_views(5),
        CreatePostInput::new("Delta draft", "<p>Not ready</p>", world.id).with_views(1000),
        CreatePostInput::new("Echo budget", "<p>Rates rise 100% overnight</p>", world.id)
            .published(now - Duration::hours(3))
            .with_views(40)
            .with_tags(vec![economy.id]),
        CreatePostInput::new("Foxtrot hidden", "<p>Pulled</p>", world.id)
            .published(now - Duration::hours(2))
            .with_status(PostStatus::Inactive),
        CreatePostInput::new("Golf pending", "<p>Soon</p>", world.id)
            .with_status(PostStatus::Active),
        CreatePostInput::new("Hotel review", "<p>Rust and rooms</p>", world.id)
            .published(now - Duration::hours(1))
            .with_views(20),
    ];
    for input in &inputs {
        posts.create(input).await.unwrap();
    }

    let state = AppState::new(
        pool.clone(),
        &SiteConfig::default(),
        ThemeEngine::embedded().unwrap(),
    );
    let server = TestServer::new(build_router(state, &static_dir())).unwrap();

    Fixture { pool, server }
}

async fn views_of(pool: &DynDatabasePool, id: i64) -> i64 {
    SqlxPostRepository::new(pool.clone())
        .get_by_id(id)
        .await
        .unwrap()
        .unwrap()
        .views_count
}

#[tokio::test]
async fn test_home_page_selections() {
    let fx = setup().await;

    let response = fx.server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.text();

    assert!(body.contains(r#"<h1><a href="/post-detail/2/">Bravo market</a></h1>"#));
    assert!(body.contains("Echo budget"));
    assert!(body.contains("Hotel review"));
    for hidden in ["Delta draft", "Foxtrot hidden", "Golf pending"] {
        assert!(!body.contains(hidden), "{} leaked onto the home page", hidden);
    }
    // navigation on every page
    assert!(body.contains(r#"href="/post-by-category/2/">Sports</a>"#));
    assert!(body.contains("#economy"));
}

#[tokio::test]
async fn test_about_page() {
    let fx = setup().await;
    let response = fx.server.get("/about/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("About Newspaper"));
}

#[tokio::test]
async fn test_post_list_garbage_page_is_first_page() {
    let fx = setup().await;

    let first = fx.server.get("/post-list/").add_query_param("page", "1").await;
    let garbage = fx.server.get("/post-list/").add_query_param("page", "abc").await;
    let absent = fx.server.get("/post-list/").await;

    assert_eq!(garbage.status_code(), StatusCode::OK);
    assert_eq!(first.text(), garbage.text());
    assert_eq!(first.text(), absent.text());
    // newest first, one per page
    assert!(first.text().contains("Hotel review"));
    assert!(first.text().contains("Page 1 of 5"));
}

#[tokio::test]
async fn test_post_list_last_page() {
    let fx = setup().await;
    let response = fx.server.get("/post-list/").add_query_param("page", "last").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.text();
    assert!(body.contains("Alpha report"));
    assert!(body.contains("Page 5 of 5"));
}

#[tokio::test]
async fn test_post_list_out_of_range_is_404() {
    let fx = setup().await;

    for page in ["0", "6", "-1"] {
        let response = fx.server.get("/post-list/").add_query_param("page", page).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND, "page={}", page);
        assert!(response.text().contains("Page not found"));
    }
}

#[tokio::test]
async fn test_post_by_category_and_tag() {
    let fx = setup().await;

    let response = fx.server.get("/post-by-category/2/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.text();
    assert!(body.contains("<h1>Sports</h1>"));
    assert!(body.contains("Charlie match"));

    let response = fx.server.get("/post-by-tag/1/").add_query_param("page", "2").await;
    let body = response.text();
    assert!(body.contains("<h1>#economy</h1>"));
    assert!(body.contains("Bravo market"));
    assert!(body.contains("Page 2 of 2"));
}

#[tokio::test]
async fn test_unknown_category_is_empty_listing() {
    let fx = setup().await;
    let response = fx.server.get("/post-by-category/99/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("No posts found."));
}

#[tokio::test]
async fn test_non_integer_path_id_is_400() {
    let fx = setup().await;
    let response = fx.server.get("/post-detail/abc/").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_detail_previous_and_next_skip_hidden_posts() {
    let fx = setup().await;

    let response = fx.server.get("/post-detail/5/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.text();

    assert!(body.contains(r#"class="previous" href="/post-detail/3/""#));
    assert!(body.contains(r#"class="next" href="/post-detail/8/""#));
    assert!(body.contains("#economy"));

    let body = fx.server.get("/post-detail/1/").await.text();
    assert!(!body.contains(r#"class="previous""#));
    let body = fx.server.get("/post-detail/8/").await.text();
    assert!(!body.contains(r#"class="next""#));
}

#[tokio::test]
async fn test_detail_counts_every_view() {
    let fx = setup().await;

    for _ in 0..3 {
        let response = fx.server.get("/post-detail/8/").await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    assert_eq!(views_of(&fx.pool, 8).await, 23);
    // the page shows the count including the current view
    assert!(fx.server.get("/post-detail/8/").await.text().contains("24 views"));
}

#[tokio::test]
async fn test_hidden_post_detail_is_404() {
    let fx = setup().await;

    for id in [4, 6, 7, 99] {
        let response = fx.server.get(&format!("/post-detail/{}/", id)).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND, "post {}", id);
    }
    assert_eq!(views_of(&fx.pool, 4).await, 1000);
}

#[tokio::test]
async fn test_search() {
    let fx = setup().await;

    let response = fx.server.get("/search/").add_query_param("query", "RUST").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.text();
    assert!(body.contains("Hotel review"));
    assert!(body.contains("1 result"));

    let body = fx.server.get("/search/").add_query_param("query", "100%").await.text();
    assert!(body.contains("Echo budget"));

    let body = fx.server.get("/search/").add_query_param("query", "Not ready").await.text();
    assert!(body.contains("0 results"));
}

#[tokio::test]
async fn test_search_empty_query_matches_everything() {
    let fx = setup().await;
    let body = fx.server.get("/search/").add_query_param("query", "").await.text();
    assert!(body.contains("5 results"));
}

#[tokio::test]
async fn test_search_requires_query() {
    let fx = setup().await;
    let response = fx.server.get("/search/").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_contact_success_redirects_with_flash() {
    let fx = setup().await;

    let response = fx
        .server
        .post("/contact/")
        .form(&[
            ("name", "Ann Reader"),
            ("email", "ann@example.com"),
            ("subject", "Typo"),
            ("message", "Second paragraph has a typo."),
        ])
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/contact/");
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let count = crate::db::query::count(&fx.pool, "SELECT COUNT(*) AS count FROM contacts", vec![])
        .await
        .unwrap();
    assert_eq!(count, 1);

    let page = fx
        .server
        .get("/contact/")
        .add_header(header::COOKIE, HeaderValue::from_str(&cookie).unwrap())
        .await;
    assert!(page.text().contains(contact::SUBMITTED));
    let cleared = page.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_contact_invalid_rerenders_form() {
    let fx = setup().await;

    let response = fx
        .server
        .post("/contact/")
        .form(&[("name", "Ann"), ("email", "not-an-email"), ("subject", ""), ("message", "Hi")])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.text();
    assert!(body.contains(contact::NOT_SUBMITTED));
    assert!(body.contains("Enter a valid email address."));
    assert!(body.contains("This field is required."));
    assert!(body.contains(r#"value="Ann""#));
}

#[tokio::test]
async fn test_comment_bad_post_id_is_400() {
    let fx = setup().await;

    let missing = fx
        .server
        .post("/comment/")
        .form(&[("name", "Bo"), ("email", "bo@example.com"), ("comment", "Hi")])
        .await;
    assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);

    let garbage = fx
        .server
        .post("/comment/")
        .form(&[("post", "five"), ("name", "Bo"), ("email", "bo@example.com"), ("comment", "Hi")])
        .await;
    assert_eq!(garbage.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_comment_unknown_post_is_404() {
    let fx = setup().await;
    let response = fx
        .server
        .post("/comment/")
        .form(&[("post", "99"), ("name", "Bo"), ("email", "bo@example.com"), ("comment", "Hi")])
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_success_redirects_to_post() {
    let fx = setup().await;

    let response = fx
        .server
        .post("/comment/")
        .form(&[("post", "5"), ("name", "Bo"), ("email", "bo@example.com"), ("comment", "Well <b>said</b>")])
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/post-detail/5/");

    let body = fx.server.get("/post-detail/5/").await.text();
    assert!(body.contains("1 Comment"));
    assert!(body.contains("Well &lt;b&gt;said&lt;&#x2F;b&gt;"));
}

#[tokio::test]
async fn test_comment_invalid_rerenders_without_counting_a_view() {
    let fx = setup().await;

    let response = fx
        .server
        .post("/comment/")
        .form(&[("post", "5"), ("name", ""), ("email", "bo@example.com"), ("comment", "Hi")])
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.text();
    assert!(body.contains("Echo budget"));
    assert!(body.contains("This field is required."));
    assert!(body.contains(r#"value="bo@example.com""#));
    assert_eq!(views_of(&fx.pool, 5).await, 40);
}

#[tokio::test]
async fn test_newsletter_requires_ajax() {
    let fx = setup().await;

    let response = fx
        .server
        .post("/newsletter/")
        .form(&[("email", "reader@example.com")])
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: NewsletterResponse = response.json();
    assert!(!body.success);
    assert_eq!(body.message, newsletter::NOT_AJAX);
}

#[tokio::test]
async fn test_newsletter_subscribe_then_duplicate() {
    let fx = setup().await;
    let (name, value) = ajax();

    let response = fx
        .server
        .post("/newsletter/")
        .add_header(name.clone(), value.clone())
        .form(&[("email", "reader@example.com")])
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: NewsletterResponse = response.json();
    assert!(body.success);
    assert_eq!(body.message, newsletter::SUBSCRIBED);

    let response = fx
        .server
        .post("/newsletter/")
        .add_header(name, value)
        .form(&[("email", "reader@example.com")])
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: NewsletterResponse = response.json();
    assert!(!body.success);
    assert_eq!(body.message, newsletter::FORM_INVALID);
}

#[tokio::test]
async fn test_newsletter_invalid_payloads() {
    let fx = setup().await;

    let (name, value) = ajax();
    let response = fx
        .server
        .post("/newsletter/")
        .add_header(name, value)
        .form(&[("email", "nope")])
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<NewsletterResponse>().message, newsletter::FORM_INVALID);

    let (name, value) = ajax();
    let response = fx
        .server
        .post("/newsletter/")
        .add_header(name, value)
        .text("email is reader@example.com")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<NewsletterResponse>().message, newsletter::FORM_INVALID);
}

#[tokio::test]
async fn test_static_assets_and_unknown_routes() {
    let fx = setup().await;

    let response = fx.server.get("/static/css/site.css").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = fx.server.get("/no-such-page/").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert!(response.text().contains("Back to the front page"));
}
