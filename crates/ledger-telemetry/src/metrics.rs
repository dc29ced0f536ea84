//! Prometheus metrics for the submission pipeline.
//!
//! All metrics follow the naming convention: `lg_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., submissions_total)
//! - **Gauge**: Value that can go up or down (e.g., active_commit_subscriptions)
//! - **Histogram**: Distribution of values (e.g., commit_wait_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // WRITE PATH
    // =========================================================================

    /// Write submissions by final outcome
    pub static ref SUBMISSIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("lg_submissions_total", "Write submissions by outcome"),
        &["outcome"]  // committed, endorsement_rejected, order_rejected, commit_timeout, ...
    ).expect("metric creation failed");

    /// Proposals that failed the endorsement policy
    pub static ref ENDORSEMENT_REJECTIONS: Counter = Counter::new(
        "lg_endorsement_rejections_total",
        "Proposals rejected by the endorsement policy"
    ).expect("metric creation failed");

    /// Commit waits that hit the deadline
    pub static ref COMMIT_TIMEOUTS: Counter = Counter::new(
        "lg_commit_timeouts_total",
        "Commit confirmations that timed out"
    ).expect("metric creation failed");

    /// Time from subscription to commit verdict
    pub static ref COMMIT_WAIT_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "lg_commit_wait_duration_seconds",
            "Time spent waiting for a commit event"
        ).buckets(exponential_buckets(0.01, 2.0, 12).unwrap())
    ).expect("metric creation failed");

    /// End-to-end write submission latency
    pub static ref SUBMISSION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "lg_submission_duration_seconds",
            "Time from proposal to final verdict"
        ).buckets(exponential_buckets(0.01, 2.0, 12).unwrap())
    ).expect("metric creation failed");

    /// Commit subscriptions currently open
    pub static ref ACTIVE_COMMIT_SUBSCRIPTIONS: Gauge = Gauge::new(
        "lg_active_commit_subscriptions",
        "Commit listeners currently waiting"
    ).expect("metric creation failed");

    // =========================================================================
    // READ PATH
    // =========================================================================

    /// Queries by outcome
    pub static ref QUERIES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("lg_queries_total", "Read-only queries by outcome"),
        &["outcome"]  // ok, no_result, peer_unreachable
    ).expect("metric creation failed");
}

/// Handle for the registered metrics
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; already-registered collectors are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Write path
        Box::new(SUBMISSIONS_TOTAL.clone()),
        Box::new(ENDORSEMENT_REJECTIONS.clone()),
        Box::new(COMMIT_TIMEOUTS.clone()),
        Box::new(COMMIT_WAIT_DURATION.clone()),
        Box::new(SUBMISSION_DURATION.clone()),
        Box::new(ACTIVE_COMMIT_SUBSCRIPTIONS.clone()),
        // Read path
        Box::new(QUERIES_TOTAL.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
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
        let duration = self.start.elapsed().as_secs_f64();
        self.histogram.observe(duration);
    }
}

/// Gauge held up for as long as the guard lives.
///
/// Raised on creation, lowered on drop, so a cancelled future cannot leave
/// the gauge counting work that is gone.
pub struct GaugeGuard {
    gauge: Gauge,
}

impl GaugeGuard {
    pub fn new(gauge: &Gauge) -> Self {
        gauge.inc();
        Self {
            gauge: gauge.clone(),
        }
    }
}

impl Drop for GaugeGuard {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
