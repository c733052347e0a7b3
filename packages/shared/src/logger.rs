//! Logging setup for the meetroom binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Both the server library crate and the binary log at `default_log_level`,
/// HTTP request spans from `tower_http` log at `info`. The whole filter can be
/// overridden with the `RUST_LOG` environment variable.
///
/// # Examples
///
/// ```no_run
/// use meetroom_shared::logger::setup_logger;
///
/// setup_logger("meetroom-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                default_filter(binary_name, default_log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    let bin = binary_name.replace('-', "_");
    let mut directives = vec![format!("meetroom_server={}", default_log_level)];
    if bin != "meetroom_server" {
        directives.push(format!("{}={}", bin, default_log_level));
    }
    directives.push("tower_http=info".to_string());
    directives.join(",")
}
