use serde::Serialize;

use super::validation::ValidationFailure;

// ============================================================================
// Outcome - Uniform Success/Failure Envelope
// ============================================================================
//
// Every handler answers with an Outcome. Expected failures (validation,
// missing records, zero-row commits) travel here; unexpected faults travel
// as anyhow errors next to it.
//
// ============================================================================

/// Category of an expected failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "errors", rename_all = "snake_case")]
pub enum FailureKind {
    /// One or more validation rules rejected the command.
    Validation(Vec<ValidationFailure>),
    /// A referenced record does not exist.
    NotFound,
    /// The current user could not be resolved.
    Unauthorized,
    /// The store accepted the commit but changed nothing.
    Persistence,
}

impl FailureKind {
    /// Stable label used for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::Validation(_) => "validation",
            FailureKind::NotFound => "not_found",
            FailureKind::Unauthorized => "unauthorized",
            FailureKind::Persistence => "persistence",
        }
    }
}

/// Failure half of an [`Outcome`]. The message is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct Failure {
    kind: FailureKind,
    message: String,
}

impl Failure {
    pub fn kind(&self) -> &FailureKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Field-level violations, empty unless this is a validation failure.
    pub fn validation_errors(&self) -> &[ValidationFailure] {
        match &self.kind {
            FailureKind::Validation(errors) => errors,
            _ => &[],
        }
    }
}

/// Result of handling one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Success { value: T },
    Failure(Failure),
}

impl<T> Outcome<T> {
    pub fn success(value: T) -> Self {
        Outcome::Success { value }
    }

    /// Generic failure with a fixed message, e.g. a commit that touched no rows.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::failed(FailureKind::Persistence, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::failed(FailureKind::NotFound, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::failed(FailureKind::Unauthorized, message)
    }

    /// Validation failure. The message joins every violation so callers that
    /// only render text still report all of them.
    pub fn invalid(errors: Vec<ValidationFailure>) -> Self {
        let message = if errors.is_empty() {
            "Validation failed".to_string()
        } else {
            errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ")
        };
        Self::failed(FailureKind::Validation(errors), message)
    }

    fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "Request failed".to_string();
        }
        Outcome::Failure(Failure { kind, message })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Success { value } => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure(failure) => Some(failure.message()),
        }
    }

    pub fn failure_kind(&self) -> Option<&FailureKind> {
        match self {
            Outcome::Success { .. } => None,
            Outcome::Failure(failure) => Some(failure.kind()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Success { value } => Outcome::Success { value: f(value) },
            Outcome::Failure(failure) => Outcome::Failure(failure),
        }
    }

    pub fn into_result(self) -> Result<T, Failure> {
        match self {
            Outcome::Success { value } => Ok(value),
            Outcome::Failure(failure) => Err(failure),
        }
    }
}
