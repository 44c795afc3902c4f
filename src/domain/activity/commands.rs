use serde::{Deserialize, Serialize};

use crate::core::Request;

use super::aggregate::Activity;
use super::value_objects::{ActivityId, ActivityInput};

// ============================================================================
// Activity Commands - Represent user intent
// ============================================================================

/// Insert a new activity under a caller-chosen id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivity {
    pub id: ActivityId,
    pub activity: ActivityInput,
}

impl Request for CreateActivity {
    const NAME: &'static str = "CreateActivity";
    type Output = ();
}

/// Overwrite the editable fields of an existing activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditActivity {
    pub id: ActivityId,
    pub activity: ActivityInput,
}

impl Request for EditActivity {
    const NAME: &'static str = "EditActivity";
    type Output = ();
}

// ============================================================================
// Activity Queries
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDetails {
    pub id: ActivityId,
}

impl Request for ActivityDetails {
    const NAME: &'static str = "ActivityDetails";
    type Output = Activity;
}
