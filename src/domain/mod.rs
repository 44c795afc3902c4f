// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each feature has its own subdirectory with:
// - Value objects
// - Commands
// - Errors
// - Validator
// - Aggregate implementation
// - Command handler
//
// Handlers reach the store only through `persistence::DataContext`.
//
// ============================================================================

pub mod activity;
pub mod comment;
pub mod user;
