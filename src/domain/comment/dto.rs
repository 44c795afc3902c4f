use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::activity::CommentId;

// ============================================================================
// Comment Output Shape
// ============================================================================

/// What callers get back after a comment is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: CommentId,
    pub created_at: DateTime<Utc>,
    pub body: String,
    pub username: String,
    pub display_name: String,
    /// URL of the author's main photo.
    pub image: Option<String>,
}
