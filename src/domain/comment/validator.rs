use crate::core::{Rules, ValidationFailure, Validator};

use super::commands::CreateComment;

/// Body must not be empty. The activity id is non-nullable by type.
#[derive(Debug, Default, Clone, Copy)]
pub struct CreateCommentValidator;

impl Validator<CreateComment> for CreateCommentValidator {
    fn validate(&self, command: &CreateComment) -> Vec<ValidationFailure> {
        let mut rules = Rules::new();
        rules.rule_for("body", &command.body).not_empty();
        rules.finish()
    }
}
