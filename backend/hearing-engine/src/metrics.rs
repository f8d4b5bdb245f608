use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter_vec, Encoder, Histogram, IntCounterVec, TextEncoder,
};

lazy_static! {
    // Test lifecycle
    pub static ref HEARING_TESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "hearing_tests_total",
        "Total number of hearing tests by outcome",
        &["status"]
    )
    .unwrap();

    pub static ref ROUNDS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "rounds_total",
        "Total number of answered rounds",
        &["correct"]
    )
    .unwrap();

    // Upload protocol
    pub static ref UPLOAD_ATTEMPTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "upload_attempts_total",
        "Total number of result upload attempts by outcome",
        &["outcome"]
    )
    .unwrap();

    pub static ref UPLOAD_DURATION_SECONDS: Histogram = register_histogram!(
        "upload_duration_seconds",
        "Duration of a single upload attempt in seconds",
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .unwrap();

    // Session history store
    pub static ref SESSION_STORE_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "session_store_operations_total",
        "Total number of session store operations",
        &["operation", "status"]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Helper: track a session store operation with metrics
pub async fn track_store_operation<F, T, E>(operation: &str, future: F) -> Result<T, E>
where
    F: std::future::Future<Output = Result<T, E>>,
{
    let result = future.await;
    let status = if result.is_ok() { "success" } else { "error" };

    SESSION_STORE_OPERATIONS_TOTAL
        .with_label_values(&[operation, status])
        .inc();

    result
}

pub fn record_round(correct: bool) {
    let label = if correct { "true" } else { "false" };
    ROUNDS_TOTAL.with_label_values(&[label]).inc();
}

pub fn record_test_outcome(status: &str) {
    HEARING_TESTS_TOTAL.with_label_values(&[status]).inc();
}
