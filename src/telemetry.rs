//! Tracing setup.
//!
//! Call [`init_telemetry`] once at process start. Log level comes from
//! `RUST_LOG` when set, otherwise from the `default_level` argument.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// `json` selects machine-readable output for deployed environments;
/// plain formatting is easier on the eyes during development. Calling
/// this more than once is a no-op.
pub fn init_telemetry(default_level: &str, json: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json {
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_ansi(false))
            .try_init();
    } else {
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false))
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init_telemetry("info", false);
        init_telemetry("debug", true);
    }
}
