//! Analysis metrics.
//!
//! Counters are recorded through the `metrics` facade; the embedding
//! application decides whether to install an exporter.

use metrics::counter;

use crate::extract::ExtractionMethod;

/// Metric names as constants for consistency.
pub mod names {
    pub const ANALYSES_TOTAL: &str = "courtside_analyses_total";
    pub const ANALYSES_FAILED_TOTAL: &str = "courtside_analyses_failed_total";
    pub const EXAMPLE_FALLBACKS_TOTAL: &str = "courtside_example_fallbacks_total";
    pub const NO_SHOTS_TOTAL: &str = "courtside_no_shots_total";
}

/// Record a completed analysis and how its shots were recovered.
pub fn record_analysis(method: ExtractionMethod, shots: usize) {
    let labels = [
        ("method", method_label(method).to_string()),
        ("has_shots", (shots > 0).to_string()),
    ];
    counter!(names::ANALYSES_TOTAL, &labels).increment(1);
}

/// Record a switch to example feedback.
pub fn record_example_fallback(reason: &str) {
    let labels = [("reason", reason.to_string())];
    counter!(names::EXAMPLE_FALLBACKS_TOTAL, &labels).increment(1);
}

/// Record an analysis that ended with no shots.
pub fn record_no_shots() {
    counter!(names::NO_SHOTS_TOTAL).increment(1);
}

/// Record a failed analysis.
pub fn record_failure(kind: &str) {
    let labels = [("kind", kind.to_string())];
    counter!(names::ANALYSES_FAILED_TOTAL, &labels).increment(1);
}

fn method_label(method: ExtractionMethod) -> &'static str {
    match method {
        ExtractionMethod::Json => "json",
        ExtractionMethod::EmbeddedJson => "embedded_json",
        ExtractionMethod::Heuristic => "heuristic",
    }
}
