//! Category model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category a post belongs to. Names are unique.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
