//! Structured logging for the SkyLUT baker.
//!
//! Console output with uptime timestamps and module paths, an optional JSON
//! file sink, and `RUST_LOG`-aware filtering. Records emitted through the
//! `log` crate are bridged into the same subscriber.

use std::path::Path;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor a level override is given.
pub const DEFAULT_FILTER: &str = "info";

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level`. When `log_file` is given and
/// can be created, a second layer writes JSON records to it.
///
/// # Examples
///
/// ```no_run
/// skylut_log::init_logging(Some("debug"), None);
/// ```
pub fn init_logging(level: Option<&str>, log_file: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_string(level)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if let Some(path) = log_file
        && let Some(file) = create_log_file(path)
    {
        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// Filter string for an optional level override.
pub fn filter_string(level: Option<&str>) -> String {
    match level {
        Some(level) if !level.trim().is_empty() => level.trim().to_string(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

fn create_log_file(path: &Path) -> Option<std::fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && std::fs::create_dir_all(parent).is_err()
    {
        return None;
    }
    std::fs::File::create(path).ok()
}
