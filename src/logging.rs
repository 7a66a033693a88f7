//! Logging abstraction layer.
//!
//! The router logs through five macros that forward to either the
//! [`log`](https://docs.rs/log) or [`tracing`](https://docs.rs/tracing)
//! crate. Enable at most one of the two features.
//!
//! | Feature    | Backend         | Default |
//! |------------|-----------------|---------|
//! | `log`      | `log` crate     | yes     |
//! | `tracing`  | `tracing` crate | no      |
//!
//! Every record is emitted under the `spa_navigator` target so hosts can
//! filter router output (`RUST_LOG=spa_navigator=debug`).
//!
//! | Macro         | Used for                                           |
//! |---------------|----------------------------------------------------|
//! | `trace_log!`  | per-segment matching, cache hits                   |
//! | `debug_log!`  | matched routes, history writes, scroll decisions   |
//! | `info_log!`   | navigation start and completion                    |
//! | `warn_log!`   | rejected navigations, duplicate routes, bad state  |
//! | `error_log!`  | missing scroll targets, platform failures          |
//!
//! ```ignore
//! use spa_navigator::{debug_log, error_log};
//!
//! debug_log!("Matched '{}' to '{}'", clean_path, route.path);
//! error_log!("Scroll target missing: {}", err);
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! __nav_log {
    ($level:ident, $($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::$level!(target: "spa_navigator", $($arg)*);
        #[cfg(feature = "log")]
        ::log::$level!(target: "spa_navigator", $($arg)*);
    };
}

/// Emit a **trace**-level router message.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => { $crate::__nav_log!(trace, $($arg)*) };
}

/// Emit a **debug**-level router message.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => { $crate::__nav_log!(debug, $($arg)*) };
}

/// Emit an **info**-level router message.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => { $crate::__nav_log!(info, $($arg)*) };
}

/// Emit a **warn**-level router message.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => { $crate::__nav_log!(warn, $($arg)*) };
}

/// Emit an **error**-level router message.
///
/// Reserved for conditions that indicate a content or timing bug in the host
/// application, such as a `scroll_to_id` that names no element.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => { $crate::__nav_log!(error, $($arg)*) };
}
