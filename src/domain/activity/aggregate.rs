use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::AppUser;

use super::errors::ActivityError;
use super::value_objects::{ActivityId, ActivityInput, CommentId};

// ============================================================================
// Activity Aggregate
// ============================================================================
//
// An activity owns its comments. A comment only comes into existence through
// `Activity::add_comment`, so it always has a parent and an author.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub title: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub category: String,
    pub city: String,
    pub venue: String,
    pub is_cancelled: bool,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub body: String,
    pub author: AppUser,
    pub activity_id: ActivityId,
    pub created_at: DateTime<Utc>,
}

impl Activity {
    pub fn new(id: ActivityId, input: ActivityInput) -> Self {
        Self {
            id,
            title: input.title,
            date: input.date,
            description: input.description,
            category: input.category,
            city: input.city,
            venue: input.venue,
            is_cancelled: false,
            comments: Vec::new(),
        }
    }

    /// Overwrite the editable fields. Returns whether anything changed.
    pub fn apply(&mut self, input: ActivityInput) -> bool {
        let changed = self.title != input.title
            || self.date != input.date
            || self.description != input.description
            || self.category != input.category
            || self.city != input.city
            || self.venue != input.venue;

        self.title = input.title;
        self.date = input.date;
        self.description = input.description;
        self.category = input.category;
        self.city = input.city;
        self.venue = input.venue;

        changed
    }

    pub fn input(&self) -> ActivityInput {
        ActivityInput {
            title: self.title.clone(),
            date: self.date,
            description: self.description.clone(),
            category: self.category.clone(),
            city: self.city.clone(),
            venue: self.venue.clone(),
        }
    }

    /// Create a comment authored by `author` and attach it to this activity.
    pub fn add_comment(
        &mut self,
        author: AppUser,
        body: impl Into<String>,
    ) -> Result<&Comment, ActivityError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(ActivityError::EmptyCommentBody);
        }

        self.comments.push(Comment {
            id: CommentId::generate(),
            body,
            author,
            activity_id: self.id,
            created_at: Utc::now(),
        });

        // just pushed
        Ok(&self.comments[self.comments.len() - 1])
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
