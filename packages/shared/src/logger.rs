//! Logging setup utilities for the Arena binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Every crate in `crate_names` gets `default_log_level`; everything else stays at the
/// subscriber default. The filter can be overridden using the `RUST_LOG` environment
/// variable.
///
/// # Examples
///
/// ```no_run
/// use arena_shared::logger::setup_logger;
///
/// setup_logger(&["arena_server", "arena_shared"], "debug");
/// ```
pub fn setup_logger(crate_names: &[&str], default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(crate_names, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build `crate=level` directives, normalizing package names to their module form.
fn default_directives(crate_names: &[&str], default_log_level: &str) -> String {
    crate_names
        .iter()
        .map(|name| format!("{}={}", name.replace('-', "_"), default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}
