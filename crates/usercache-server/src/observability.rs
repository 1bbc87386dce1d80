//! Prometheus recorder setup.

use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tracing::info;
use usercache_config::ObservabilityConfig;
use usercache_core::{UserCacheError, UserCacheResult};
use usercache_service::{metrics::names, register_metrics};

/// Histogram buckets for lookup latency, in seconds.
const LOOKUP_DURATION_BUCKETS: &[f64] = &[
    0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
];

/// Installs the global Prometheus recorder when metrics are enabled.
///
/// Returns the handle the metrics endpoint renders from.
pub fn install_metrics(config: &ObservabilityConfig) -> UserCacheResult<Option<PrometheusHandle>> {
    if !config.metrics_enabled {
        info!("Metrics disabled");
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(names::LOOKUP_DURATION_SECONDS.to_string()),
            LOOKUP_DURATION_BUCKETS,
        )
        .map_err(|e| UserCacheError::Configuration(format!("Invalid metric buckets: {}", e)))?
        .install_recorder()
        .map_err(|e| UserCacheError::internal(format!("Failed to install metrics recorder: {}", e)))?;

    register_metrics();
    info!("Prometheus recorder installed");

    Ok(Some(handle))
}
