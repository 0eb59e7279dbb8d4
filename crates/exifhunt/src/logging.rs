//! Logging initialization.
//!
//! Uses `tracing` with either human-readable or JSON output. Logs always go to
//! stderr; stdout only carries the report path.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Initialize the logging subsystem at `level`.
///
/// The RUST_LOG environment variable overrides `level` when set.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` config section, with CLI overrides.
pub fn init_from_config(
    config: &exifhunt_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let level = effective_level(&config.logging.level, verbose_override);
    let json_format = json_logs_override || config.logging.format == "json";
    init(level, json_format);
}

/// `--verbose` raises the level to at least debug; unknown names fall back to info.
fn effective_level(configured: &str, verbose: bool) -> &'static str {
    let configured = LEVELS
        .iter()
        .copied()
        .find(|l| l.eq_ignore_ascii_case(configured))
        .unwrap_or("info");

    if verbose && configured != "trace" {
        "debug"
    } else {
        configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_is_used() {
        assert_eq!(effective_level("warn", false), "warn");
        assert_eq!(effective_level("DEBUG", false), "debug");
    }

    #[test]
    fn verbose_raises_to_debug() {
        assert_eq!(effective_level("info", true), "debug");
        assert_eq!(effective_level("error", true), "debug");
        assert_eq!(effective_level("trace", true), "trace");
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        assert_eq!(effective_level("chatty", false), "info");
    }
}
