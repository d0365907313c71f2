//! Status macros.
//!
//! Every status line of a run is one of four kinds: info, success, warning or
//! error. They are plain `tracing` events so any subscriber can consume them;
//! success is an `INFO` event under the [`SUCCESS_TARGET`] target.

/// Target used to tell success events apart from ordinary info events.
pub const SUCCESS_TARGET: &str = "subrecon::success";

/// Target used for raw console output that must be printed without a status symbol.
pub const PRINT_TARGET: &str = "subrecon::print";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: $crate::log::SUCCESS_TARGET, $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!($($arg)*)
    };
}
