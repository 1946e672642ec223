//! Tracing subscriber setup.

use crate::config::Config;
use crate::constants::LOG_FORMAT_JSON;
use crate::errors::{AppError, AppResult};
use crate::telemetry::{TelemetryClient, TelemetryGuard, TelemetryLayer};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Builds the log filter: `RUST_LOG` if set, otherwise the configured level.
pub fn build_filter(config: &Config) -> AppResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| {
            AppError::Config(format!("Invalid log level '{}': {}", config.log_level, e))
        }),
    }
}

/// Installs the global subscriber: logs go to stderr as text or JSON, and
/// `ERROR` events are reported when a telemetry endpoint is configured.
///
/// A subscriber installed earlier (by a test harness, say) is left alone.
/// Hold the returned guard until exit so pending crash reports get posted.
pub fn init(config: &Config) -> AppResult<Option<TelemetryGuard>> {
    let filter = build_filter(config)?;
    let json = config.log_format == LOG_FORMAT_JSON;

    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(false)
    });
    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
    });
    let telemetry_layer = config
        .telemetry_url
        .as_ref()
        .map(|url| TelemetryLayer::new(TelemetryClient::new(url.as_str())));
    let telemetry_guard = telemetry_layer.as_ref().map(TelemetryLayer::guard);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .with(telemetry_layer)
        .try_init()
        .is_ok();

    if !installed {
        return Ok(None);
    }
    tracing::debug!(format = %config.log_format, "Logging initialized");
    Ok(telemetry_guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_invalid_level_is_config_error() {
        let saved = std::env::var("RUST_LOG").ok();
        std::env::remove_var("RUST_LOG");

        let config = Config {
            log_level: "quill=loud".to_string(),
            ..Config::default()
        };
        let result = build_filter(&config);

        if let Some(value) = saved {
            std::env::set_var("RUST_LOG", value);
        }
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    #[serial]
    fn test_init_twice_is_harmless() {
        let config = Config::default();
        init(&config).unwrap();
        init(&config).unwrap();
    }

    #[test]
    #[serial]
    fn test_no_guard_without_telemetry_url() {
        let config = Config {
            telemetry_url: None,
            ..Config::default()
        };
        assert!(init(&config).unwrap().is_none());
    }
}
