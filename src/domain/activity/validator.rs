use crate::core::{Rules, ValidationFailure, Validator};

use super::commands::{CreateActivity, EditActivity};
use super::value_objects::ActivityInput;

// Required fields, shared by create and edit. The date is non-nullable by type.
fn validate_input(input: &ActivityInput) -> Vec<ValidationFailure> {
    let mut rules = Rules::new();
    rules.rule_for("title", &input.title).not_empty();
    rules.rule_for("description", &input.description).not_empty();
    rules.rule_for("category", &input.category).not_empty();
    rules.rule_for("city", &input.city).not_empty();
    rules.rule_for("venue", &input.venue).not_empty();
    rules.finish()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CreateActivityValidator;

impl Validator<CreateActivity> for CreateActivityValidator {
    fn validate(&self, command: &CreateActivity) -> Vec<ValidationFailure> {
        validate_input(&command.activity)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EditActivityValidator;

impl Validator<EditActivity> for EditActivityValidator {
    fn validate(&self, command: &EditActivity) -> Vec<ValidationFailure> {
        validate_input(&command.activity)
    }
}
