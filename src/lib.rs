//! Newspaper - a server-rendered news and blog site
//!
//! Posts, categories, tags, comments, contact messages and newsletter
//! signups, rendered through tera templates over a SQLite or MySQL database.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
pub mod theme;
