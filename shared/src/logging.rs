//! Shared logging utilities for consistent tracing across groups

use crate::types::GroupId;
use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Initialize tracing subscriber writing compact lines to stderr
///
/// `RUST_LOG` takes precedence over the supplied level when it is set.
pub fn init_tracing(log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let base_level = log_level.unwrap_or("info");
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("santa={base_level},shared={base_level},reqwest=warn")));

    // try_init so repeated initialisation in tests is harmless
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for group-aware info logging
#[macro_export]
macro_rules! group_info {
    ($group:expr, $($arg:tt)*) => {
        tracing::info!(
            group = %$group,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for group-aware warning logging
#[macro_export]
macro_rules! group_warn {
    ($group:expr, $($arg:tt)*) => {
        tracing::warn!(
            group = %$group,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for group-aware error logging
#[macro_export]
macro_rules! group_error {
    ($group:expr, $($arg:tt)*) => {
        tracing::error!(
            group = %$group,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for group-aware debug logging
#[macro_export]
macro_rules! group_debug {
    ($group:expr, $($arg:tt)*) => {
        tracing::debug!(
            group = %$group,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(details: &str) {
    info!(timestamp = format_timestamp(), "🚀 Starting {}", details);
}

/// Contextual logging helper for error conditions
pub fn log_error(context: &str, error: &dyn std::fmt::Display) {
    error!(
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions within a group
pub fn log_success(group: &GroupId, message: &str) {
    info!(
        group = %group,
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}

/// Contextual logging helper for progress updates within a group
pub fn log_progress(group: &GroupId, action: &str, details: &str) {
    info!(
        group = %group,
        timestamp = format_timestamp(),
        "📋 {}: {}",
        action,
        details
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp_shape() {
        let stamp = format_timestamp();
        // HH:MM:SS.mmm
        assert_eq!(stamp.len(), 12);
        assert_eq!(&stamp[2..3], ":");
        assert_eq!(&stamp[8..9], ".");
    }

    #[test]
    fn test_macros_accept_group_ids() {
        init_tracing(Some("debug"));
        let group = GroupId::new("family");
        group_info!(group, "assigned {} participants", 3);
        group_debug!(group, "debug line");
        group_warn!(group, "warning line");
        group_error!(group, "error line");
        log_progress(&group, "Persist", "ok");
        log_success(&group, "done");
    }
}
