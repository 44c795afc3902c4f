use crate::core::{Rules, ValidationFailure};

use super::values::ActivityFormValues;

// ============================================================================
// Client-side Validation Schema
// ============================================================================
//
// Checked on every edit. Messages are what the user sees under each field.
//
// ============================================================================

pub const TITLE_REQUIRED: &str = "The activity title is required";
pub const DESCRIPTION_REQUIRED: &str = "The activity description is required";
pub const CATEGORY_REQUIRED: &str = "category is a required field";
pub const DATE_REQUIRED: &str = "Date is required";
pub const VENUE_REQUIRED: &str = "venue is a required field";
pub const CITY_REQUIRED: &str = "city is a required field";

pub fn validate(values: &ActivityFormValues) -> Vec<ValidationFailure> {
    let mut rules = Rules::new();
    rules.rule_for("title", &values.title).not_empty_with(TITLE_REQUIRED);
    rules
        .rule_for("description", &values.description)
        .not_empty_with(DESCRIPTION_REQUIRED);
    rules.rule_for("category", &values.category).not_empty_with(CATEGORY_REQUIRED);
    rules.ensure("date", values.date.is_some(), DATE_REQUIRED);
    rules.rule_for("venue", &values.venue).not_empty_with(VENUE_REQUIRED);
    rules.rule_for("city", &values.city).not_empty_with(CITY_REQUIRED);
    rules.finish()
}
