//! Counters emitted by the documentation recorder.
//!
//! All recording goes through the `metrics` facade. Without an installed
//! recorder every call here is a no-op, so the recorder never needs to know
//! whether the host exports metrics.

use metrics::{counter, describe_counter};

/// Observed request/response cycles, labelled by `outcome`.
pub const OBSERVATIONS_TOTAL: &str = "herodotus_observations_total";

/// Examples merged into content entries, labelled by `form`.
pub const EXAMPLES_TOTAL: &str = "herodotus_examples_total";

/// Document flush attempts, labelled by `outcome`.
pub const FLUSHES_TOTAL: &str = "herodotus_flushes_total";

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether metric descriptions are registered at startup.
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Registers descriptions for all recorder metrics.
pub fn describe_metrics() {
    describe_counter!(
        OBSERVATIONS_TOTAL,
        "Request/response cycles seen by the documentation recorder"
    );
    describe_counter!(
        EXAMPLES_TOTAL,
        "Response body examples merged into the document"
    );
    describe_counter!(FLUSHES_TOTAL, "Documentation flush attempts by outcome");
}

/// Records one observation.
///
/// `outcome` is `"recorded"` or `"skipped"`.
pub fn record_observation(outcome: &'static str) {
    counter!(OBSERVATIONS_TOTAL, "outcome" => outcome).increment(1);
}

/// Records one merged example.
///
/// `form` is the shape of the content entry after the merge: `"singular"`
/// or `"plural"`.
pub fn record_example(form: &'static str) {
    counter!(EXAMPLES_TOTAL, "form" => form).increment(1);
}

/// Records one flush attempt.
///
/// `outcome` is `"written"`, `"skipped"` or `"failed"`.
pub fn record_flush(outcome: &'static str) {
    counter!(FLUSHES_TOTAL, "outcome" => outcome).increment(1);
}
