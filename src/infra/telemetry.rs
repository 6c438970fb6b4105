use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let default_directive = logging
        .level
        .parse()
        .map_err(|err| InfraError::configuration(format!("invalid log level: {err}")))?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_directive)
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "foglio_cache_hit_total",
            Unit::Count,
            "Total number of TTL-cache hits."
        );
        describe_counter!(
            "foglio_cache_miss_total",
            Unit::Count,
            "Total number of TTL-cache misses."
        );
        describe_counter!(
            "foglio_db_query_total",
            Unit::Count,
            "Total number of backing-store round trips."
        );
        describe_counter!(
            "foglio_index_skipped_total",
            Unit::Count,
            "Total number of documents excluded from the content index."
        );
    });
}
