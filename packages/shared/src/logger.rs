//! Logging setup utilities for the Tsunagari session server.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose log output is enabled by default alongside the binary itself.
const WORKSPACE_CRATES: [&str; 3] = ["tsunagari_server", "tsunagari_shared", "tower_http"];

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// ```
/// use tsunagari_shared::logger::default_directive;
///
/// let directive = default_directive("tsunagari-server", "info");
/// assert!(directive.contains("tsunagari_server=info"));
/// ```
pub fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    let mut targets: Vec<&str> = WORKSPACE_CRATES.to_vec();
    if !targets.contains(&binary_target.as_str()) {
        targets.push(binary_target.as_str());
    }
    targets
        .into_iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "tsunagari-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use tsunagari_shared::logger::setup_logger;
///
/// setup_logger("tsunagari-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
