//! Prometheus metrics for the explorer.
//!
//! All metrics follow the naming convention: `oapp_<component>_<metric>_<unit>`
//! and live on a private registry, so embedding applications never collide
//! with their own default registry.

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Explorer metrics registry
    pub static ref REGISTRY: Registry = Registry::new_custom(Some("oapp".to_string()), None)
        .expect("registry creation failed");

    /// Nodes fetched and resolved by the crawler
    pub static ref CRAWL_NODES_PROCESSED: Counter = Counter::new(
        "crawl_nodes_processed_total",
        "Total number of OApps processed by the crawler"
    ).expect("metric creation failed");

    /// Failed upstream fetches during crawls
    pub static ref CRAWL_FETCH_FAILURES: Counter = Counter::new(
        "crawl_fetch_failures_total",
        "Total number of failed upstream batch fetches"
    ).expect("metric creation failed");

    /// Wall time of complete crawls
    pub static ref CRAWL_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "crawl_duration_seconds",
            "Time spent on a complete crawl"
        ).buckets(exponential_buckets(0.01, 2.0, 14).expect("bucket creation failed"))
    ).expect("metric creation failed");

    /// Resolved routes by provenance
    pub static ref RESOLVER_ROUTES: CounterVec = CounterVec::new(
        Opts::new("resolver_routes_total", "Total number of resolved routes"),
        &["source"]  // source: materialized/default
    ).expect("metric creation failed");
}

/// Register all explorer metrics. Safe to call more than once.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(CRAWL_NODES_PROCESSED.clone()),
        Box::new(CRAWL_FETCH_FAILURES.clone()),
        Box::new(CRAWL_DURATION.clone()),
        Box::new(RESOLVER_ROUTES.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
