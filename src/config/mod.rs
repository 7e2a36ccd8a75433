//! Configuration management
//!
//! Configuration is loaded from a `config.yml` file, with environment
//! variables (prefixed `NEWSPAPER_`) overriding file settings. Missing values
//! are filled with defaults, so an absent or empty file yields a working
//! SQLite-backed site on port 8000.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix shared by every environment override
const ENV_PREFIX: &str = "NEWSPAPER_";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Theme configuration
    #[serde(default)]
    pub theme: ThemeConfig,
    /// Site presentation settings
    #[serde(default)]
    pub site: SiteConfig,
    /// Static asset serving
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database driver (sqlite or mysql)
    #[serde(default)]
    pub driver: DatabaseDriver,
    /// Database connection URL or SQLite file path
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DatabaseDriver::default(),
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/newspaper.db".to_string()
}

/// Database driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    /// SQLite (default)
    #[default]
    Sqlite,
    /// MySQL
    Mysql,
}

/// Theme configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Active theme name
    #[serde(default = "default_theme")]
    pub active: String,
    /// Path to themes directory
    #[serde(default = "default_theme_path")]
    pub path: PathBuf,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            active: default_theme(),
            path: default_theme_path(),
        }
    }
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_theme_path() -> PathBuf {
    PathBuf::from("themes")
}

/// Site presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site name shown in page titles and the header
    #[serde(default = "default_site_name")]
    pub name: String,
    /// Short tagline
    #[serde(default = "default_site_description")]
    pub description: String,
    /// Number of posts on each list/search page
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            description: default_site_description(),
            posts_per_page: default_posts_per_page(),
        }
    }
}

fn default_site_name() -> String {
    "Newspaper".to_string()
}

fn default_site_description() -> String {
    "Latest news, stories and opinion".to_string()
}

/// One post per page on every paginated listing.
pub const DEFAULT_POSTS_PER_PAGE: u32 = 1;

fn default_posts_per_page() -> u32 {
    DEFAULT_POSTS_PER_PAGE
}

/// Static asset serving configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticFilesConfig {
    /// Directory served under `/static`
    #[serde(default = "default_static_path")]
    pub path: PathBuf,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            path: default_static_path(),
        }
    }
}

fn default_static_path() -> PathBuf {
    PathBuf::from("static")
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist or is empty, returns the default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Recognised variables:
    /// - NEWSPAPER_SERVER_HOST, NEWSPAPER_SERVER_PORT
    /// - NEWSPAPER_DATABASE_DRIVER, NEWSPAPER_DATABASE_URL
    /// - NEWSPAPER_THEME_ACTIVE, NEWSPAPER_THEME_PATH
    /// - NEWSPAPER_SITE_NAME, NEWSPAPER_SITE_POSTS_PER_PAGE
    /// - NEWSPAPER_STATIC_PATH
    pub fn load_with_env(path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides looked up by full variable name.
    ///
    /// Values that fail to parse are ignored and the previous setting kept.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(host) = var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }

        if let Some(driver) = var("DATABASE_DRIVER") {
            match driver.to_lowercase().as_str() {
                "sqlite" => self.database.driver = DatabaseDriver::Sqlite,
                "mysql" => self.database.driver = DatabaseDriver::Mysql,
                _ => {}
            }
        }
        if let Some(url) = var("DATABASE_URL") {
            self.database.url = url;
        }

        if let Some(active) = var("THEME_ACTIVE") {
            self.theme.active = active;
        }
        if let Some(path) = var("THEME_PATH") {
            self.theme.path = PathBuf::from(path);
        }

        if let Some(name) = var("SITE_NAME") {
            self.site.name = name;
        }
        if let Some(per_page) = var("SITE_POSTS_PER_PAGE").and_then(|p| p.parse::<u32>().ok()) {
            self.site.posts_per_page = per_page;
        }

        if let Some(path) = var("STATIC_PATH") {
            self.static_files.path = PathBuf::from(path);
        }
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }
        if self.site.posts_per_page == 0 {
            return Err(ConfigError::ValidationError(
                "site.posts_per_page must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}
