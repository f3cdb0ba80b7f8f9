//! Call-site capture macros.
//!
//! # Usage
//!
//! ```rust
//! use hresult_escalation::{escalate, BuiltinLookup, Level, Reporter, StatusCode};
//!
//! let reporter = Reporter::builder().status_lookup(BuiltinLookup).build();
//!
//! fn open_tray_icon() -> StatusCode {
//!     StatusCode::S_OK
//! }
//!
//! // explicit reporter
//! let ok = escalate!(reporter => open_tray_icon(), Level::Error, "Failed to create tray icon");
//! assert!(ok);
//!
//! // format arguments
//! let name = "settings.json";
//! let ok = escalate!(reporter => StatusCode::S_OK, Level::Log, "Failed to open {}", name);
//! assert!(ok);
//! ```
//!
//! Without `reporter =>` the macros go through [`global()`](crate::global).

/// Path of the enclosing function, e.g. `my_crate::module::function`.
///
/// Inside closures the path ends in `{{closure}}`.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        let name = __type_name_of(__here);
        match name.strip_suffix("::__here") {
            Some(stripped) => stripped,
            None => name,
        }
    }};
}

/// [`CallSite`](crate::CallSite) for the current file, line and function.
#[macro_export]
macro_rules! callsite {
    () => {
        $crate::CallSite::new(
            ::core::file!(),
            ::core::line!(),
            $crate::function_name!().as_bytes(),
        )
    };
}

/// Check a status code at the current call site.
///
/// Evaluates to the `bool` returned by [`Reporter::handle`](crate::Reporter::handle).
/// The code may be anything convertible into [`StatusCode`](crate::StatusCode).
#[macro_export]
macro_rules! escalate {
    ($reporter:expr => $code:expr, $level:expr, $message:expr $(,)?) => {
        $reporter.handle(
            ::core::convert::Into::<$crate::StatusCode>::into($code),
            $level,
            ::core::convert::AsRef::<str>::as_ref(&$message),
            &$crate::callsite!(),
        )
    };
    ($reporter:expr => $code:expr, $level:expr, $fmt:literal, $($arg:tt)+) => {
        $reporter.handle(
            ::core::convert::Into::<$crate::StatusCode>::into($code),
            $level,
            &::std::format!($fmt, $($arg)+),
            &$crate::callsite!(),
        )
    };
    ($code:expr, $level:expr, $message:expr $(,)?) => {
        $crate::escalate!($crate::global() => $code, $level, $message)
    };
    ($code:expr, $level:expr, $fmt:literal, $($arg:tt)+) => {
        $crate::escalate!($crate::global() => $code, $level, $fmt, $($arg)+)
    };
}
