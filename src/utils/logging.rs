//! Conditional logging macros that check a module-level `ENABLE_LOGS` flag.
//!
//! Detectors run once per sensor frame, so their chatter is switched off by
//! default and enabled per module while tuning thresholds.
//!
//! Usage:
//! ```rust,ignore
//! // In your module, define the flag first:
//! const ENABLE_LOGS: bool = true;
//!
//! // Then use the macros (they're exported at the crate root):
//! use crate::{log_debug, log_info, log_warn};
//!
//! log_info!("This will log if ENABLE_LOGS is true");
//! ```

/// Conditional info logging.
///
/// Each module that uses this macro must define:
/// ```rust,ignore
/// const ENABLE_LOGS: bool = true; // or false
/// ```
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Conditional warn logging. Requires `ENABLE_LOGS` in the calling module.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Conditional error logging. Requires `ENABLE_LOGS` in the calling module.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}

/// Conditional debug logging, used for per-frame detector state changes.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

/// Conditional trace logging, used for per-sample values.
#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::trace!($($arg)*);
        }
    };
}
