//! # Ledger Telemetry
//!
//! Logging and metrics bootstrap for the ledger gateway.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` registry with an `EnvFilter`, pretty or
//!   JSON formatted
//! - **Metrics**: Prometheus counters and histograms for the submission
//!   pipeline, rendered with `encode_metrics()`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{TelemetryConfig, init_telemetry};
//!
//! let config = TelemetryConfig::from_env();
//! let _guard = init_telemetry(config).expect("Failed to init telemetry");
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LG_SERVICE_NAME` | `ledger-gateway` | Service name in logs |
//! | `LG_LOG_LEVEL` | `info` | Log level filter |
//! | `LG_JSON_LOGS` | `false` | JSON log output |
//! | `LG_METRICS` | `true` | Register Prometheus metrics |

mod config;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, GaugeGuard, HistogramTimer, MetricsHandle,
    ACTIVE_COMMIT_SUBSCRIPTIONS, COMMIT_TIMEOUTS, COMMIT_WAIT_DURATION, ENDORSEMENT_REJECTIONS,
    QUERIES_TOTAL, SUBMISSIONS_TOTAL, SUBMISSION_DURATION,
};
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = if config.metrics_enabled {
        Some(register_metrics()?)
    } else {
        None
    };

    tracing_setup::init_tracing(&config)?;

    Ok(TelemetryGuard { _metrics: metrics })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: Option<MetricsHandle>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}

/// Convenience macro for creating a span with submission context.
///
/// # Example
///
/// ```rust,ignore
/// use ledger_telemetry::submission_span;
///
/// let _span = submission_span!("submit", operation = "init-domain");
/// ```
#[macro_export]
macro_rules! submission_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
