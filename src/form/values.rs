use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::activity::{Activity, ActivityId, ActivityInput};

use super::FormError;

/// Field values held by the activity form. A new record has no id until it
/// is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFormValues {
    pub id: Option<ActivityId>,
    pub title: String,
    pub category: String,
    pub description: String,
    pub date: Option<DateTime<Utc>>,
    pub city: String,
    pub venue: String,
}

impl ActivityFormValues {
    /// Empty values for a new activity.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Converts to the backend input shape. Fails only when no date is set.
    pub fn to_input(&self) -> Result<ActivityInput, FormError> {
        let date = self.date.ok_or(FormError::MissingDate)?;
        Ok(ActivityInput {
            title: self.title.clone(),
            date,
            description: self.description.clone(),
            category: self.category.clone(),
            city: self.city.clone(),
            venue: self.venue.clone(),
        })
    }
}

impl From<&Activity> for ActivityFormValues {
    fn from(activity: &Activity) -> Self {
        Self {
            id: Some(activity.id),
            title: activity.title.clone(),
            category: activity.category.clone(),
            description: activity.description.clone(),
            date: Some(activity.date),
            city: activity.city.clone(),
            venue: activity.venue.clone(),
        }
    }
}
