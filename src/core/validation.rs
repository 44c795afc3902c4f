use serde::Serialize;

// ============================================================================
// Validation - Rule Sets Checked Before a Handler Runs
// ============================================================================
//
// Validators are pure and stateless. They always run every rule so the
// caller can report every problem at once.
//
// ============================================================================

/// One rule violation on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub field: String,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Declarative rule set for a command type.
pub trait Validator<C>: Send + Sync {
    fn validate(&self, command: &C) -> Vec<ValidationFailure>;
}

/// Validator for requests that carry nothing worth checking.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoValidation;

impl<C> Validator<C> for NoValidation {
    fn validate(&self, _command: &C) -> Vec<ValidationFailure> {
        Vec::new()
    }
}

/// Collects violations while rules are declared.
///
/// ```
/// use activity_comments::core::Rules;
///
/// let mut rules = Rules::new();
/// rules.rule_for("body", "").not_empty();
/// let failures = rules.finish();
/// assert_eq!(failures[0].message, "Body must not be empty");
/// ```
#[derive(Debug, Default)]
pub struct Rules {
    failures: Vec<ValidationFailure>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule_for<'a>(&'a mut self, field: &'static str, value: &'a str) -> TextRule<'a> {
        TextRule {
            rules: self,
            field,
            value,
        }
    }

    /// Records `message` against `field` unless `holds` is true.
    pub fn ensure(&mut self, field: &'static str, holds: bool, message: impl Into<String>) -> &mut Self {
        if !holds {
            self.failures.push(ValidationFailure::new(field, message));
        }
        self
    }

    pub fn finish(self) -> Vec<ValidationFailure> {
        self.failures
    }
}

/// Rules over a text field.
pub struct TextRule<'a> {
    rules: &'a mut Rules,
    field: &'static str,
    value: &'a str,
}

impl<'a> TextRule<'a> {
    /// Fails on empty or whitespace-only text with "`Field` must not be empty".
    pub fn not_empty(self) -> Self {
        let message = format!("{} must not be empty", display_name(self.field));
        self.not_empty_with(message)
    }

    pub fn not_empty_with(self, message: impl Into<String>) -> Self {
        let holds = !self.value.trim().is_empty();
        self.rules.ensure(self.field, holds, message);
        self
    }
}

fn display_name(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
