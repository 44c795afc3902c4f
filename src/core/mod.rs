// ============================================================================
// Command Pipeline Core - Generic Infrastructure
// ============================================================================
//
// Generic pieces shared by every command:
// - Outcome: success/failure envelope
// - Validation: rule sets run before a handler
// - Handler: request + handler traits
// - Dispatcher: validator + handler composition
// - Cancellation: signal observed by handlers
//
// No domain-specific code lives here.
//
// ============================================================================

pub mod cancellation;
pub mod dispatcher;
pub mod handler;
pub mod outcome;
pub mod validation;

pub use cancellation::{CancellationHandle, CancellationSignal, Cancelled};
pub use dispatcher::{Dispatch, Pipeline};
pub use handler::{Request, RequestHandler};
pub use outcome::{Failure, FailureKind, Outcome};
pub use validation::{NoValidation, Rules, ValidationFailure, Validator};
