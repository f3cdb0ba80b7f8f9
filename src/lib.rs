//! # HRESULT Escalation
//!
//! A single choke point for failing system status codes. Every checked call
//! hands its status code to a [`Reporter`], which turns a failure into a
//! human-readable diagnostic and, depending on the [`Level`], writes it to a
//! debug channel or log, shows the user an alert, or terminates the process.
//!
//! ## Design Philosophy
//!
//! 1. **Success is free**: a non-negative code returns `true` and touches nothing
//! 2. **Severity is a closed set**: dispatch is an exhaustive match, and raw
//!    values outside the set are rejected as caller bugs
//! 3. **Reporting never fails itself**: a missing description or a malformed
//!    function name degrades to fixed placeholder text
//! 4. **Output is locale-independent**: descriptions are always requested in
//!    US English, and the code's hex value is always present
//! 5. **Fatal means now**: the default terminator aborts without unwinding
//!
//! ## Quick Start
//!
//! ```rust
//! use hresult_escalation::{escalate, BuiltinLookup, Level, Reporter, StatusCode};
//! use hresult_escalation::ring_buffer::RingBufferLog;
//!
//! let log = RingBufferLog::new(64, 2048);
//! let reporter = Reporter::builder()
//!     .app_name("TrayTool")
//!     .status_lookup(BuiltinLookup)
//!     .log_sink(log.clone())
//!     .build();
//!
//! fn register_hotkey() -> StatusCode {
//!     StatusCode::E_ACCESSDENIED
//! }
//!
//! if !escalate!(reporter => register_hotkey(), Level::Log, "Failed to register hotkey") {
//!     // carry on without the hotkey
//! }
//!
//! let lines = log.lines();
//! assert!(lines[0].starts_with(
//!     "Failed to register hotkey Exception from HRESULT: Access is denied. (0x80070005) ("
//! ));
//! ```
//!
//! ## Collaborators
//!
//! Sinks are narrow traits ([`LogSink`], [`DebugChannel`], [`AlertSurface`],
//! [`Terminator`]) plus the [`StatusLookup`] used by the translator. Each has
//! a platform default; Windows builds use the system message catalogue,
//! `MessageBoxW` and `OutputDebugStringW`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer;
pub mod callsite;
pub mod error;
pub mod level;
pub mod macros;
pub mod reporter;
pub mod ring_buffer;
pub mod sinks;
pub mod status;
pub mod translate;

pub use buffer::*;
pub use callsite::*;
pub use error::*;
pub use level::*;
pub use reporter::*;
pub use sinks::*;
pub use status::*;
pub use translate::*;
