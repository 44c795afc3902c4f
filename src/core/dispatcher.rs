use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;
use tracing::Instrument;

use crate::metrics::Metrics;

use super::cancellation::CancellationSignal;
use super::handler::{Request, RequestHandler};
use super::outcome::Outcome;
use super::validation::Validator;

// ============================================================================
// Dispatcher - Validate, then Handle
// ============================================================================
//
// Orchestrates: Request → Validator → Handler → Outcome
//
// The validator and the handler only share the request type. A request that
// fails validation never reaches its handler.
//
// ============================================================================

/// Anything that can accept a request and answer with an outcome.
#[async_trait]
pub trait Dispatch<R: Request>: Send + Sync {
    async fn send(&self, request: R, cancel: &CancellationSignal) -> Result<Outcome<R::Output>>;
}

/// A validator paired with the handler it guards.
pub struct Pipeline<V, H> {
    validator: V,
    handler: H,
    metrics: Option<Arc<Metrics>>,
}

impl<V, H> Pipeline<V, H> {
    pub fn new(validator: V, handler: H) -> Self {
        Self {
            validator,
            handler,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }
}

#[async_trait]
impl<R, V, H> Dispatch<R> for Pipeline<V, H>
where
    R: Request,
    V: Validator<R>,
    H: RequestHandler<R>,
{
    async fn send(&self, request: R, cancel: &CancellationSignal) -> Result<Outcome<R::Output>> {
        let span = tracing::info_span!("command", name = R::NAME);

        async move {
            let started = Instant::now();

            let failures = self.validator.validate(&request);
            let result = if failures.is_empty() {
                self.handler.handle(request, cancel).await
            } else {
                tracing::info!(
                    violations = failures.len(),
                    "Request rejected by validator"
                );
                Ok(Outcome::invalid(failures))
            };

            self.record(R::NAME, &result, started);
            result
        }
        .instrument(span)
        .await
    }
}

impl<V, H> Pipeline<V, H> {
    fn record<T>(&self, name: &str, result: &Result<Outcome<T>>, started: Instant) {
        match result {
            Ok(Outcome::Success { .. }) => {
                tracing::debug!("Request handled successfully");
            }
            Ok(Outcome::Failure(failure)) => {
                tracing::info!(
                    kind = failure.kind().label(),
                    message = %failure.message(),
                    "Request handled with failure"
                );
            }
            Err(error) => {
                tracing::error!(error = %error, "Request aborted by unexpected error");
            }
        }

        if let Some(metrics) = &self.metrics {
            let kind = match result {
                Ok(Outcome::Success { .. }) => None,
                Ok(Outcome::Failure(failure)) => Some(failure.kind().label()),
                Err(_) => Some("error"),
            };
            metrics.record_command(name, kind, started.elapsed().as_secs_f64());
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
