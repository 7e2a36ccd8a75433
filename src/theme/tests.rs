//! Tests for the theme engine

use super::*;
use chrono::{TimeZone, Utc};
use std::fs;
use tempfile::TempDir;
use tera::Context as TeraContext;

use crate::models::{Page, Paginator, Post, PostStatus};

/// Helper to create a test theme directory with templates
fn create_test_theme(themes_dir: &Path, theme_name: &str) -> PathBuf {
    let theme_path = themes_dir.join(theme_name);
    fs::create_dir_all(theme_path.join("partials")).unwrap();

    let base_html = r#"<!DOCTYPE html>
<html>
<head><title>{{ site_name }}</title></head>
<body>{% for m in messages %}<p class="{{ m.level }}">{{ m.text }}</p>{% endfor %}{% block content %}{% endblock %}</body>
</html>"#;
    fs::write(theme_path.join("base.html"), base_html).unwrap();

    let home_html = r#"{% extends "base.html" %}
{% block content %}
<h1>Welcome to {{ site_name }}</h1>
<p>{{ site_description }}</p>
{% include "partials/nav.html" %}
{% endblock %}"#;
    fs::write(theme_path.join("home.html"), home_html).unwrap();

    let nav_html = r#"<nav>{% for c in categories %}<a href="/post-by-category/{{ c.id }}/">{{ c.name }}</a>{% endfor %}</nav>"#;
    fs::write(theme_path.join("partials").join("nav.html"), nav_html).unwrap();

    theme_path
}

fn sample_post(id: i64, title: &str) -> Post {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
    Post {
        id,
        title: title.to_string(),
        content: "<p>Body <strong>text</strong></p>".to_string(),
        featured_image: None,
        status: PostStatus::Active,
        views_count: 12,
        published_at: Some(at),
        category_id: 1,
        category_name: Some("World".to_string()),
        created_at: at,
        updated_at: at,
    }
}

fn standard_vars(path: &str) -> StandardTemplateVars {
    StandardTemplateVars::new("Daily Planet", "All the news", path)
}

#[test]
fn test_new_loads_theme_from_disk() {
    let temp_dir = TempDir::new().unwrap();
    let themes_path = temp_dir.path().join("themes");
    let theme_path = create_test_theme(&themes_path, "custom");

    let engine = ThemeEngine::new(&themes_path, "custom").unwrap();

    assert_eq!(engine.source(), &TemplateSource::Directory(theme_path));
    assert!(engine.has_template("home.html"));
    assert!(engine.has_template("partials/nav.html"));
}

#[test]
fn test_new_falls_back_to_embedded_theme() {
    let temp_dir = TempDir::new().unwrap();

    let engine = ThemeEngine::new(temp_dir.path(), "missing").unwrap();

    assert_eq!(engine.source(), &TemplateSource::Embedded);
    assert!(engine.missing_templates().is_empty());
}

#[test]
fn test_missing_templates_reported() {
    let temp_dir = TempDir::new().unwrap();
    let theme_path = create_test_theme(temp_dir.path(), "partial");

    let engine = ThemeEngine::from_dir(&theme_path).unwrap();
    let missing = engine.missing_templates();

    assert!(missing.contains(&"detail.html"));
    assert!(!missing.contains(&"home.html"));
}

#[test]
fn test_empty_directory_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    assert!(ThemeEngine::from_dir(temp_dir.path()).is_err());
}

#[test]
fn test_broken_template_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("base.html"), "{% block content %}").unwrap();
    assert!(ThemeEngine::from_dir(temp_dir.path()).is_err());
}

#[test]
fn test_render_with_standard_vars() {
    let temp_dir = TempDir::new().unwrap();
    let theme_path = create_test_theme(temp_dir.path(), "custom");
    let engine = ThemeEngine::from_dir(&theme_path).unwrap();

    let now = Utc::now();
    let vars = standard_vars("/")
        .with_navigation(
            vec![crate::models::Category {
                id: 4,
                name: "Sports".to_string(),
                created_at: now,
                updated_at: now,
            }],
            vec![],
        )
        .with_messages(vec![Message::success("Saved")]);

    let html = engine
        .render_with_standard_vars("home.html", &TeraContext::new(), &vars)
        .unwrap();

    assert!(html.contains("<title>Daily Planet</title>"));
    assert!(html.contains("All the news"));
    assert!(html.contains(r#"<a href="/post-by-category/4/">Sports</a>"#));
    assert!(html.contains(r#"<p class="success">Saved</p>"#));
}

#[test]
fn test_render_unknown_template_fails() {
    let engine = ThemeEngine::embedded().unwrap();
    let err = engine.render("nope.html", &TeraContext::new()).unwrap_err();
    assert!(err.to_string().contains("nope.html"));
}

#[test]
fn test_embedded_detail_renders_post_html_unescaped() {
    let engine = ThemeEngine::embedded().unwrap();

    let mut context = TeraContext::new();
    context.insert("post", &sample_post(5, "Budget <passes>"));
    context.insert("post_tags", &Vec::<crate::models::Tag>::new());
    context.insert("comments", &Vec::<crate::models::Comment>::new());
    context.insert("previous_post", &Some(sample_post(3, "Older")));
    context.insert("next_post", &None::<Post>);
    context.insert("form", &serde_json::json!({}));
    context.insert("errors", &serde_json::json!({}));

    let html = engine
        .render_with_standard_vars("detail.html", &context, &standard_vars("/post-detail/5/"))
        .unwrap();

    assert!(html.contains("<p>Body <strong>text</strong></p>"));
    assert!(html.contains("Budget &lt;passes&gt;"));
    assert!(html.contains("/post-detail/3/"));
    assert!(html.contains("12 views"));
}

#[test]
fn test_embedded_list_renders_pagination() {
    let engine = ThemeEngine::embedded().unwrap();
    let paginator = Paginator::new(3, 1);
    let page = Page::new(vec![sample_post(2, "Middle")], 2, &paginator);

    let mut context = TeraContext::new();
    context.insert("page", &page);
    context.insert("heading", "Latest News");

    let html = engine
        .render_with_standard_vars("list.html", &context, &standard_vars("/post-list/"))
        .unwrap();

    assert!(html.contains("Page 2 of 3"));
    assert!(html.contains(r#"href="?page=1""#));
    assert!(html.contains(r#"href="?page=3""#));
    assert!(html.contains("Middle"));
}

#[test]
fn test_message_serialization() {
    let json = serde_json::to_value(Message::error("Nope")).unwrap();
    assert_eq!(json, serde_json::json!({ "level": "error", "text": "Nope" }));
}
