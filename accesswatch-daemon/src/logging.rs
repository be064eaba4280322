//! Logging initialization for accesswatch-daemon.
//!
//! Configures `tracing-subscriber` based on the `[general]` section
//! of `AccesswatchConfig`. Supports JSON structured logging and
//! human-readable pretty format.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use accesswatch_core::config::GeneralConfig;

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
/// `RUST_LOG` takes precedence over the configured level, so access
/// event targets (`accesswatch::access`, `accesswatch::alert`) can be
/// filtered independently at runtime.
///
/// The log format has already been validated by
/// `AccesswatchConfig::validate`; anything other than `"json"` is
/// treated as `"pretty"` here.
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
    };
    result.map_err(|e| {
        anyhow::anyhow!(
            "failed to initialize tracing subscriber (format '{}'): {}",
            config.log_format,
            e
        )
    })
}
