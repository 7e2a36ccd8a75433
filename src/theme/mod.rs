//! Theme engine
//!
//! This module provides template rendering using Tera.
//! Features:
//! - Templates loaded from `<themes_path>/<active>/` on disk
//! - Fallback to the default theme compiled into the binary
//! - Standard template variables shared by every page

use anyhow::{Context, Result};
use chrono::Datelike;
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fs;
use std::path::{Path, PathBuf};
use tera::{Context as TeraContext, Tera};

use crate::models::{Category, Tag};

mod error;

pub use error::ThemeError;

/// Templates every theme must provide
pub const REQUIRED_TEMPLATES: &[&str] = &[
    "base.html",
    "home.html",
    "list.html",
    "search.html",
    "detail.html",
    "contact.html",
    "about.html",
    "error.html",
];

/// Default theme compiled into the binary
#[derive(RustEmbed)]
#[folder = "themes/default/"]
#[include = "*.html"]
struct DefaultTheme;

/// Where the loaded templates came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// A theme directory on disk
    Directory(PathBuf),
    /// The built-in default theme
    Embedded,
}

/// Theme engine for rendering templates
pub struct ThemeEngine {
    /// Tera template engine instance
    tera: Tera,
    /// Origin of the loaded templates
    source: TemplateSource,
}

impl ThemeEngine {
    /// Load the active theme.
    ///
    /// Uses `<themes_path>/<active>/` when that directory exists, the built-in
    /// default theme otherwise.
    pub fn new(themes_path: &Path, active: &str) -> Result<Self> {
        let theme_dir = themes_path.join(active);
        if theme_dir.is_dir() {
            tracing::info!("Loading theme '{}' from {:?}", active, theme_dir);
            Self::from_dir(&theme_dir)
        } else {
            tracing::info!(
                "Theme directory {:?} not found, using built-in default theme",
                theme_dir
            );
            Self::embedded()
        }
    }

    /// Load the built-in default theme
    pub fn embedded() -> Result<Self> {
        let mut templates = Vec::new();
        for name in DefaultTheme::iter() {
            let file = DefaultTheme::get(&name)
                .ok_or_else(|| ThemeError::NotFound(name.to_string()))?;
            let content = String::from_utf8(file.data.into_owned())
                .with_context(|| format!("Template is not UTF-8: {}", name))?;
            templates.push((name.to_string(), content));
        }

        Ok(Self {
            tera: build_tera(templates)?,
            source: TemplateSource::Embedded,
        })
    }

    /// Load every `.html` file under `dir` (recursively)
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut templates = Vec::new();
        collect_templates(dir, dir, &mut templates)?;

        if templates.is_empty() {
            return Err(ThemeError::NotFound(dir.display().to_string()).into());
        }

        let engine = Self {
            tera: build_tera(templates)?,
            source: TemplateSource::Directory(dir.to_path_buf()),
        };

        let missing = engine.missing_templates();
        if !missing.is_empty() {
            tracing::warn!("Theme at {:?} lacks templates: {}", dir, missing.join(", "));
        }

        Ok(engine)
    }

    /// Render a template with context
    pub fn render(&self, template: &str, context: &TeraContext) -> Result<String> {
        self.tera.render(template, context).map_err(|e| {
            let mut error_msg = format!("Failed to render '{}': {}", template, e);
            let mut source = e.source();
            while let Some(s) = source {
                error_msg.push_str(&format!("\n  Caused by: {}", s));
                source = s.source();
            }
            ThemeError::TemplateError(error_msg).into()
        })
    }

    /// Render a template with the standard variables added to `context`
    pub fn render_with_standard_vars(
        &self,
        template: &str,
        context: &TeraContext,
        standard_vars: &StandardTemplateVars,
    ) -> Result<String> {
        let mut full_context = context.clone();

        full_context.insert("site_name", &standard_vars.site_name);
        full_context.insert("site_description", &standard_vars.site_description);
        full_context.insert("request_path", &standard_vars.request_path);
        full_context.insert("year", &standard_vars.year);
        full_context.insert("categories", &standard_vars.categories);
        full_context.insert("tags", &standard_vars.tags);
        full_context.insert("messages", &standard_vars.messages);

        self.render(template, &full_context)
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|t| t == name)
    }

    /// Required templates this theme does not provide
    pub fn missing_templates(&self) -> Vec<&'static str> {
        REQUIRED_TEMPLATES
            .iter()
            .copied()
            .filter(|name| !self.has_template(name))
            .collect()
    }
}

fn build_tera(templates: Vec<(String, String)>) -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(templates)
        .map_err(|e| ThemeError::TemplateError(format!("Failed to load templates: {}", e)))?;
    Ok(tera)
}

fn collect_templates(base: &Path, current: &Path, templates: &mut Vec<(String, String)>) -> Result<()> {
    for entry in fs::read_dir(current).map_err(ThemeError::from)? {
        let path = entry.map_err(ThemeError::from)?.path();

        if path.is_dir() {
            collect_templates(base, &path, templates)?;
        } else if path.extension().is_some_and(|ext| ext == "html") {
            let relative = path
                .strip_prefix(base)
                .map_err(|_| ThemeError::TemplateError("Failed to get relative path".to_string()))?;
            let name = relative.to_string_lossy().replace('\\', "/");
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read template: {:?}", path))?;
            templates.push((name, content));
        }
    }
    Ok(())
}

/// Severity of a one-shot notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Success,
    Error,
}

/// A notice shown once at the top of the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}

impl Message {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            text: text.into(),
        }
    }
}

/// Standard template variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardTemplateVars {
    /// Site name
    pub site_name: String,
    /// Site description
    pub site_description: String,
    /// Current request path
    pub request_path: String,
    /// Current year (for copyright)
    pub year: i32,
    /// Categories for navigation
    pub categories: Vec<Category>,
    /// Tags for navigation
    pub tags: Vec<Tag>,
    /// Pending one-shot notices
    pub messages: Vec<Message>,
}

impl StandardTemplateVars {
    /// Create new standard template variables
    pub fn new(
        site_name: impl Into<String>,
        site_description: impl Into<String>,
        request_path: impl Into<String>,
    ) -> Self {
        Self {
            site_name: site_name.into(),
            site_description: site_description.into(),
            request_path: request_path.into(),
            year: chrono::Utc::now().year(),
            categories: Vec::new(),
            tags: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn with_navigation(mut self, categories: Vec<Category>, tags: Vec<Tag>) -> Self {
        self.categories = categories;
        self.tags = tags;
        self
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }
}

#[cfg(test)]
mod tests;
