//! Prometheus metrics for the SMS routing service.
//!
//! - Routing decisions by outcome
//! - Dispatch attempts by result, and provider latency
//! - Settings writes by scope
//! - Halted batches

mod helpers;

pub use helpers::{encode_metrics, DispatchMetrics, RoutingMetrics, SettingsMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "survey_sms";

lazy_static! {
    // ============================================================================
    // Routing Metrics
    // ============================================================================

    /// Routing decisions by outcome
    pub static ref ROUTING_DECISIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_routing_decisions_total", METRIC_PREFIX),
        "Routing decisions by outcome",
        &["decision"]
    ).unwrap();

    /// Batches halted by a routing error
    pub static ref BATCHES_HALTED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_batches_halted_total", METRIC_PREFIX),
        "Notification batches halted by a routing error"
    ).unwrap();

    // ============================================================================
    // Dispatch Metrics
    // ============================================================================

    /// Dispatch attempts by result
    pub static ref DISPATCH_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_dispatch_total", METRIC_PREFIX),
        "Message dispatch attempts by result",
        &["result"]
    ).unwrap();

    /// Provider call latency
    pub static ref DISPATCH_DURATION_SECONDS: Histogram = register_histogram!(
        format!("{}_dispatch_duration_seconds", METRIC_PREFIX),
        "Message provider call latency in seconds",
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();

    // ============================================================================
    // Settings Metrics
    // ============================================================================

    /// Settings writes by scope
    pub static ref SETTINGS_WRITES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_settings_writes_total", METRIC_PREFIX),
        "Settings values written by scope",
        &["scope"]
    ).unwrap();
}
