use serde::{Deserialize, Serialize};

use crate::core::Request;
use crate::domain::activity::ActivityId;

use super::dto::CommentDto;

// ============================================================================
// Comment Commands - Represent user intent
// ============================================================================

/// Add a comment to an activity on behalf of the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
    /// An absent body deserializes as empty and is rejected by validation.
    #[serde(default)]
    pub body: String,
    pub activity_id: ActivityId,
}

impl CreateComment {
    pub fn new(activity_id: ActivityId, body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            activity_id,
        }
    }
}

impl Request for CreateComment {
    const NAME: &'static str = "CreateComment";
    type Output = CommentDto;
}
