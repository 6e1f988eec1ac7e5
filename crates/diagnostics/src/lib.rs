//! Logging shared by every crate in the metastore workspace.
//!
//! Usage:
//! - Set METASTORE_LOG=off (default) - no logs
//! - Set METASTORE_LOG=info - writes, clears and other mutations
//! - Set METASTORE_LOG=debug - resolution steps, lock traffic, inheritance walks

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable consulted by [`init_diagnostics`]
pub const LOG_ENV: &str = "METASTORE_LOG";

static INIT: Once = Once::new();

fn min_level(name: &str) -> Option<Option<emit::Level>> {
    match name {
        "off" => Some(None),
        "debug" => Some(Some(emit::Level::Debug)),
        "info" => Some(Some(emit::Level::Info)),
        "warn" => Some(Some(emit::Level::Warn)),
        "error" => Some(Some(emit::Level::Error)),
        _ => None,
    }
}

/// Initialize diagnostics based on the METASTORE_LOG environment variable
///
/// Call once at application startup. Later calls are ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let requested = std::env::var(LOG_ENV).unwrap_or_else(|_| "off".to_string());

        let (level, unknown) = match min_level(requested.as_str()) {
            Some(None) => return,
            Some(Some(level)) => (level, false),
            None => (emit::Level::Info, true),
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        if unknown {
            emit::warn!("Unknown {var} value {requested}, using info", var: LOG_ENV, requested: requested.as_str());
        }

        // The runtime lives for the rest of the process.
        std::mem::forget(rt);
    });
}

/// Log mutations users may want to see in normal usage.
///
/// Examples: "Wrote entry", "Cleared entry", "Purged history"
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (resolution steps, lock traffic, internal state).
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log conditions that don't prevent operation but should be noted.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log conditions that prevent normal operation, such as a corrupt index.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

// Short names

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

/// Re-export the init function for convenience
pub use init_diagnostics as init;
