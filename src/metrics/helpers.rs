//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use super::{
    BATCHES_HALTED_TOTAL, DISPATCH_DURATION_SECONDS, DISPATCH_TOTAL, ROUTING_DECISIONS_TOTAL,
    SETTINGS_WRITES_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording routing metrics
pub struct RoutingMetrics;

impl RoutingMetrics {
    /// Record a terminal routing state
    pub fn record_decision(decision: &str) {
        ROUTING_DECISIONS_TOTAL.with_label_values(&[decision]).inc();
    }

    pub fn record_batch_halted() {
        BATCHES_HALTED_TOTAL.inc();
    }
}

/// Helper struct for recording dispatch metrics
pub struct DispatchMetrics;

impl DispatchMetrics {
    /// Record a provider call and its latency
    pub fn record_result(success: bool, duration_secs: f64) {
        let label = if success { "success" } else { "failure" };
        DISPATCH_TOTAL.with_label_values(&[label]).inc();
        DISPATCH_DURATION_SECONDS.observe(duration_secs);
    }
}

/// Helper struct for recording settings metrics
pub struct SettingsMetrics;

impl SettingsMetrics {
    pub fn record_write(scope: &str) {
        SETTINGS_WRITES_TOTAL.with_label_values(&[scope]).inc();
    }
}
