use anyhow::Result;
use async_trait::async_trait;

use super::cancellation::CancellationSignal;
use super::outcome::Outcome;

// ============================================================================
// Requests and Handlers
// ============================================================================
//
// A request is an immutable value object naming one operation. Its handler
// performs the operation and answers with an Outcome. `Err` is reserved for
// faults nobody planned for: store outages, constraint violations,
// cancellation.
//
// ============================================================================

/// A command or query that can be sent through a pipeline.
pub trait Request: Send + 'static {
    /// Stable name used in logs and metric labels.
    const NAME: &'static str;

    type Output: Send + 'static;
}

/// Executes one request.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    async fn handle(&self, request: R, cancel: &CancellationSignal) -> Result<Outcome<R::Output>>;
}
