use lazy_static::lazy_static;
use prometheus::{register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder};

lazy_static! {
    // Query metrics
    pub static ref QUERY_COUNTER: CounterVec = register_counter_vec!(
        "cqrs_queries_total",
        "Total number of queries processed",
        &["query_type", "status"]
    )
    .expect("metric cannot be created");

    pub static ref QUERY_DURATION: HistogramVec = register_histogram_vec!(
        "cqrs_query_duration_seconds",
        "Query processing duration in seconds",
        &["query_type"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("metric cannot be created");

    // Cache metrics
    pub static ref CACHE_HIT_COUNTER: CounterVec = register_counter_vec!(
        "cqrs_cache_requests_total",
        "Total number of cache requests",
        &["cache_type", "status"]
    )
    .expect("metric cannot be created");
}

/// Get all metrics in Prometheus text format
pub fn gather_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Record one query execution
pub fn record_query(query_type: &str, success: bool, duration_secs: f64) {
    let status = if success { "success" } else { "error" };
    QUERY_COUNTER
        .with_label_values(&[query_type, status])
        .inc();
    QUERY_DURATION
        .with_label_values(&[query_type])
        .observe(duration_secs);
}

/// Record a cache hit or miss
pub fn record_cache_request(cache_type: &str, hit: bool) {
    let status = if hit { "hit" } else { "miss" };
    CACHE_HIT_COUNTER
        .with_label_values(&[cache_type, status])
        .inc();
}
