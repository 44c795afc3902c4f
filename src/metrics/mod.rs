// Private module declaration
mod server;

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

// Re-export for public API
pub use server::start_metrics_server;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Provides metrics for:
// - Commands dispatched through a pipeline (throughput, latency)
// - Expected failures by kind, and unexpected faults
// - Retry attempts during startup
//
// All metrics are registered with Prometheus and can be scraped via /metrics
// ============================================================================

/// Central metrics registry for the entire application
pub struct Metrics {
    registry: Registry,

    // Command Metrics
    pub commands_dispatched: IntCounterVec,
    pub commands_failed: IntCounterVec,
    pub command_duration: HistogramVec,

    // Retry Metrics
    pub retry_attempts_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        // Command Metrics
        let commands_dispatched = IntCounterVec::new(
            Opts::new("commands_dispatched_total", "Total commands dispatched"),
            &["command"],
        )?;
        registry.register(Box::new(commands_dispatched.clone()))?;

        let commands_failed = IntCounterVec::new(
            Opts::new("commands_failed_total", "Total commands that did not succeed"),
            &["command", "kind"],
        )?;
        registry.register(Box::new(commands_failed.clone()))?;

        let command_duration = HistogramVec::new(
            HistogramOpts::new("command_duration_seconds", "Validation plus handling duration")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["command"],
        )?;
        registry.register(Box::new(command_duration.clone()))?;

        // Retry Metrics
        let retry_attempts_total = IntCounterVec::new(
            Opts::new("retry_attempts_total", "Total attempts made by retried operations"),
            &["operation"],
        )?;
        registry.register(Box::new(retry_attempts_total.clone()))?;

        Ok(Self {
            registry,
            commands_dispatched,
            commands_failed,
            command_duration,
            retry_attempts_total,
        })
    }

    /// Get the Prometheus registry for exposing metrics via HTTP
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record one dispatched command. `failure` is the failure label, `None` on success.
    pub fn record_command(&self, command: &str, failure: Option<&str>, duration_secs: f64) {
        self.commands_dispatched.with_label_values(&[command]).inc();
        if let Some(kind) = failure {
            self.commands_failed.with_label_values(&[command, kind]).inc();
        }
        self.command_duration.with_label_values(&[command]).observe(duration_secs);
    }

    /// Helper to record retry attempt
    pub fn record_retry_attempt(&self, operation: &str, attempt: u32) {
        tracing::trace!(operation, attempt, "Retry attempt recorded");
        self.retry_attempts_total.with_label_values(&[operation]).inc();
    }
}
