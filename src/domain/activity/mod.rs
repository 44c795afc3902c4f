// ============================================================================
// Activity Aggregate
// ============================================================================
//
// The activity owns its comments. Create, edit and details requests for the
// activity itself live here; adding comments lives in `domain::comment`.
//
// ============================================================================

pub mod aggregate;
pub mod command_handler;
pub mod commands;
pub mod errors;
pub mod validator;
pub mod value_objects;

pub use aggregate::{Activity, Comment};
pub use command_handler::{ActivityDetailsHandler, CreateActivityHandler, EditActivityHandler};
pub use commands::{ActivityDetails, CreateActivity, EditActivity};
pub use errors::ActivityError;
pub use validator::{CreateActivityValidator, EditActivityValidator};
pub use value_objects::{ActivityId, ActivityInput, CommentId};
