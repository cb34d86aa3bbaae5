//! Metrics collection for observability
//!
//! # Metrics
//!
//! - `ledger_invocations_total{function, outcome}` - Invocations by outcome
//! - `ledger_invocation_errors_total{kind}` - Failed invocations by status code
//! - `ledger_transfer_value` - Histogram of committed transfer values
//! - `ledger_commit_duration_seconds` - Histogram of RocksDB commit latencies

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;
use token_contract::ErrorKind;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Invocations by function and outcome
    pub invocations_total: IntCounterVec,

    /// Failed invocations by error kind
    pub errors_total: IntCounterVec,

    /// Committed transfer values
    pub transfer_value: Histogram,

    /// Commit duration histogram
    pub commit_duration: Histogram,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector with its own registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let invocations_total = IntCounterVec::new(
            Opts::new("ledger_invocations_total", "Contract invocations by outcome"),
            &["function", "outcome"],
        )?;
        registry.register(Box::new(invocations_total.clone()))?;

        let errors_total = IntCounterVec::new(
            Opts::new(
                "ledger_invocation_errors_total",
                "Failed invocations by status code",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(errors_total.clone()))?;

        let transfer_value = Histogram::with_opts(
            HistogramOpts::new("ledger_transfer_value", "Committed transfer values").buckets(
                vec![0.0, 10.0, 100.0, 1_000.0, 10_000.0, 100_000.0, 1_000_000.0],
            ),
        )?;
        registry.register(Box::new(transfer_value.clone()))?;

        let commit_duration = Histogram::with_opts(
            HistogramOpts::new(
                "ledger_commit_duration_seconds",
                "Histogram of invocation commit latencies",
            )
            .buckets(vec![0.0005, 0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250]),
        )?;
        registry.register(Box::new(commit_duration.clone()))?;

        Ok(Self {
            invocations_total,
            errors_total,
            transfer_value,
            commit_duration,
            registry,
        })
    }

    /// Record a committed invocation
    pub fn record_committed(&self, function: &str) {
        self.invocations_total
            .with_label_values(&[function, "committed"])
            .inc();
    }

    /// Record a read-only invocation
    pub fn record_query(&self, function: &str) {
        self.invocations_total
            .with_label_values(&[function, "query"])
            .inc();
    }

    /// Record a failed invocation
    pub fn record_failed(&self, function: &str, kind: ErrorKind) {
        self.invocations_total
            .with_label_values(&[function, "failed"])
            .inc();
        self.errors_total.with_label_values(&[kind.as_str()]).inc();
    }

    /// Record a committed transfer value
    pub fn record_transfer_value(&self, value: i64) {
        self.transfer_value.observe(value as f64);
    }

    /// Record commit duration
    pub fn record_commit_duration(&self, duration_seconds: f64) {
        self.commit_duration.observe(duration_seconds);
    }

    /// Render in Prometheus text exposition format
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
