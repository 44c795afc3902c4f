// ============================================================================
// Activity Form
// ============================================================================
//
// Client-side state for creating or editing an activity:
// - values:     field values, empty or loaded from an activity
// - schema:     required-field rules with user-facing messages
// - state:      clean / dirty / submitting / submitted / failed
// - controller: edits, submit gate, id generation, navigation
// - gateway:    where loads and submissions go
//
// ============================================================================

pub mod controller;
pub mod gateway;
pub mod schema;
pub mod state;
pub mod values;

pub use controller::{ActivityForm, Navigation};
pub use gateway::{ActivityGateway, MediatorGateway};
pub use state::FormState;
pub use values::ActivityFormValues;

use crate::core::ValidationFailure;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("form cannot be submitted while {0}")]
    NotSubmittable(FormState),

    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(Vec<ValidationFailure>),

    #[error("activity date is not set")]
    MissingDate,

    #[error(transparent)]
    Gateway(#[from] anyhow::Error),
}
