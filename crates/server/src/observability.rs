use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_gauge, Encoder, IntCounter, IntGauge, TextEncoder};

// Prometheus metrics (default registry)
pub static REQUESTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "user_directory_requests_total",
        "Total requests handled by the user API"
    )
    .expect("register requests_total")
});

pub static USERS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "user_directory_users_created_total",
        "Total users created"
    )
    .expect("register users_created_total")
});

pub static USERS_DELETED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "user_directory_users_deleted_total",
        "Total users deleted"
    )
    .expect("register users_deleted_total")
});

pub static VALIDATION_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "user_directory_validation_failures_total",
        "Total create/update requests rejected by validation"
    )
    .expect("register validation_failures_total")
});

pub static USERS_STORED: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "user_directory_users_stored",
        "Users currently held by the store"
    )
    .expect("register users_stored")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
