//! Escalation router.
//!
//! [`Reporter::handle`] is the single choke point every checked status code
//! passes through. Success returns `true` with no side effects. Failure is
//! described, formatted, and dispatched by [`Level`]:
//!
//! | level   | actions, in order                                        |
//! |---------|----------------------------------------------------------|
//! | `Debug` | log line plus `\n` to the debug channel                  |
//! | `Log`   | log line to the log sink                                 |
//! | `Error` | log line to the log sink, then a warning alert           |
//! | `Fatal` | log line, then an always-on-top error alert, then terminate |
//!
//! There is no state carried between calls: two identical reports produce two
//! identical, independent writes.
//!
//! # Text Formats
//!
//! ```text
//! log line:    <message> <description> (<file>:<line> at function <function>)
//! box message: <message>\n\n[Program will exit.\n\n]<description>
//! alert title: <app name> - Error | <app name> - Fatal error
//! ```
//!
//! `<description>` is the translator output, see [`crate::translate`].
//!
//! # Fatal Termination
//!
//! The fatal path ends with [`Terminator::terminate`]. The default terminator
//! aborts: caller-held resources are not unwound and no destructors run.
//!
//! # Example
//!
//! ```rust
//! use hresult_escalation::{callsite, BuiltinLookup, Level, Reporter, StatusCode};
//! use hresult_escalation::ring_buffer::RingBufferLog;
//!
//! let log = RingBufferLog::new(16, 1024);
//! let reporter = Reporter::builder()
//!     .app_name("Demo")
//!     .status_lookup(BuiltinLookup)
//!     .log_sink(log.clone())
//!     .build();
//!
//! assert!(reporter.handle(StatusCode::S_OK, Level::Log, "never logged", &callsite!()));
//! assert!(!reporter.handle(StatusCode::E_FAIL, Level::Log, "Failed to load", &callsite!()));
//!
//! let lines = log.lines();
//! assert_eq!(lines.len(), 1);
//! assert!(lines[0].starts_with("Failed to load Exception from HRESULT: Unspecified error (0x80004005) ("));
//! ```

use crate::callsite::CallSite;
use crate::error::EscalationError;
use crate::level::Level;
use crate::sinks::{
    AbortTerminator, Alert, AlertSurface, DebugChannel, FacadeLogSink, LogSink, SystemAlert,
    SystemDebugChannel, Terminator,
};
use crate::status::StatusCode;
use crate::translate::{StatusLookup, SystemLookup, describe_with};
use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, OnceLock};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Inserted into fatal box messages.
pub const FATAL_NOTICE: &str = "Program will exit.\n\n";

/// Application name used in alert titles when none is configured.
pub const DEFAULT_APP_NAME: &str = "Application";

// ============================================================================
// Diagnostic
// ============================================================================

/// Text produced for a single failing report.
///
/// Built per call, handed to the sinks, then dropped. Owned text is zeroized
/// on drop so it does not linger in freed memory.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Diagnostic {
    box_message: Option<String>,
    log_line: String,
}

impl Diagnostic {
    /// Format the texts for `level`.
    ///
    /// The box message exists only for levels that show an alert. The log
    /// line is built for every level; at `Debug` it carries a trailing `\n`
    /// for debug-channel consumers.
    pub fn build(level: Level, message: &str, description: &str, site: &CallSite<'_>) -> Self {
        let box_message = level.shows_alert().then(|| {
            let notice = if level == Level::Fatal { FATAL_NOTICE } else { "" };
            let mut text =
                String::with_capacity(message.len() + 2 + notice.len() + description.len());
            text.push_str(message);
            text.push_str("\n\n");
            text.push_str(notice);
            text.push_str(description);
            text
        });

        let mut log_line = format!("{} {} ({})", message, description, site);
        if level == Level::Debug {
            log_line.push('\n');
        }

        Self {
            box_message,
            log_line,
        }
    }

    /// User-facing text, present for `Error` and `Fatal`.
    #[inline]
    pub fn box_message(&self) -> Option<&str> {
        self.box_message.as_deref()
    }

    /// Text written to the log sink or debug channel.
    #[inline]
    pub fn log_line(&self) -> &str {
        &self.log_line
    }
}

impl fmt::Debug for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostic")
            .field("box_message", &self.box_message)
            .field("log_line", &self.log_line)
            .finish()
    }
}

// ============================================================================
// Reporter
// ============================================================================

/// Routes failing status codes to sinks by severity.
///
/// Cheap to share: every collaborator sits behind an `Arc`, and `handle`
/// takes `&self`.
#[derive(Clone)]
pub struct Reporter {
    app_name: Cow<'static, str>,
    lookup: Arc<dyn StatusLookup>,
    log: Arc<dyn LogSink>,
    alert: Arc<dyn AlertSurface>,
    debug: Arc<dyn DebugChannel>,
    terminator: Arc<dyn Terminator>,
}

impl Reporter {
    /// Start configuring a reporter. See [`ReporterBuilder`].
    #[inline]
    pub fn builder() -> ReporterBuilder {
        ReporterBuilder::new()
    }

    /// Name shown in alert titles.
    #[inline]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Report `code` at `level`. Returns whether the operation succeeded.
    ///
    /// At [`Level::Fatal`] a failing code never returns.
    #[inline]
    pub fn handle(&self, code: StatusCode, level: Level, message: &str, site: &CallSite<'_>) -> bool {
        if code.is_success() {
            return true;
        }
        self.escalate(code, level, message, site);
        false
    }

    /// Like [`handle`](Self::handle), for severities arriving as raw integers.
    ///
    /// Success codes return `Ok(true)` without looking at `level`. A failure
    /// with an unknown level is a caller bug: it returns
    /// [`EscalationError::InvalidLevel`] and nothing is written anywhere.
    pub fn handle_raw(
        &self,
        code: StatusCode,
        level: u32,
        message: &str,
        site: &CallSite<'_>,
    ) -> Result<bool, EscalationError> {
        if code.is_success() {
            return Ok(true);
        }
        let level = Level::from_raw(level)?;
        self.escalate(code, level, message, site);
        Ok(false)
    }

    /// Report the error side of `result`, passing the success value through.
    pub fn check<T>(
        &self,
        result: Result<T, StatusCode>,
        level: Level,
        message: &str,
        site: &CallSite<'_>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(code) => {
                self.handle(code, level, message, site);
                None
            }
        }
    }

    /// Failure path, kept out of line so `handle` stays a single branch.
    #[cold]
    #[inline(never)]
    fn escalate(&self, code: StatusCode, level: Level, message: &str, site: &CallSite<'_>) {
        let description = describe_with(&*self.lookup, code);
        let diagnostic = Diagnostic::build(level, message, &description, site);
        self.dispatch(level, &diagnostic);
    }

    fn dispatch(&self, level: Level, diagnostic: &Diagnostic) {
        match level {
            Level::Debug => self.debug.emit(diagnostic.log_line()),
            Level::Log => self.log.write_line(diagnostic.log_line()),
            Level::Error => {
                self.log.write_line(diagnostic.log_line());
                self.show_alert(level, diagnostic);
            }
            Level::Fatal => {
                self.log.write_line(diagnostic.log_line());
                self.show_alert(level, diagnostic);
                self.terminator.terminate()
            }
        }
    }

    fn show_alert(&self, level: Level, diagnostic: &Diagnostic) {
        let (Some(style), Some(body)) = (level.alert_style(), diagnostic.box_message()) else {
            return;
        };
        let title = format!("{} - {}", self.app_name, level.title_suffix());
        self.alert.show(&Alert {
            title: &title,
            body,
            style,
        });
    }
}

impl Default for Reporter {
    fn default() -> Self {
        ReporterBuilder::new().build()
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("app_name", &self.app_name)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Fluent configuration for [`Reporter`].
///
/// Every collaborator not set explicitly falls back to the platform default:
/// [`SystemLookup`], [`FacadeLogSink`], [`SystemAlert`], [`SystemDebugChannel`]
/// and [`AbortTerminator`].
#[must_use = "builders do nothing unless built"]
#[derive(Default)]
pub struct ReporterBuilder {
    app_name: Option<Cow<'static, str>>,
    lookup: Option<Arc<dyn StatusLookup>>,
    log: Option<Arc<dyn LogSink>>,
    alert: Option<Arc<dyn AlertSurface>>,
    debug: Option<Arc<dyn DebugChannel>>,
    terminator: Option<Arc<dyn Terminator>>,
}

impl ReporterBuilder {
    /// Builder with every collaborator left at its default.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Name shown in alert titles.
    pub fn app_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Source of status descriptions.
    pub fn status_lookup(mut self, lookup: impl StatusLookup + 'static) -> Self {
        self.lookup = Some(Arc::new(lookup));
        self
    }

    /// Destination of log lines for `Log`, `Error` and `Fatal`.
    pub fn log_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.log = Some(Arc::new(sink));
        self
    }

    /// Where `Error` and `Fatal` alerts are shown.
    pub fn alert_surface(mut self, surface: impl AlertSurface + 'static) -> Self {
        self.alert = Some(Arc::new(surface));
        self
    }

    /// Receiver of `Debug` level lines.
    pub fn debug_channel(mut self, channel: impl DebugChannel + 'static) -> Self {
        self.debug = Some(Arc::new(channel));
        self
    }

    /// Called after a `Fatal` report. Tests substitute one that records the
    /// call and halts the thread.
    pub fn terminator(mut self, terminator: impl Terminator + 'static) -> Self {
        self.terminator = Some(Arc::new(terminator));
        self
    }

    /// Finish, filling unset collaborators with platform defaults.
    pub fn build(self) -> Reporter {
        Reporter {
            app_name: self.app_name.unwrap_or(Cow::Borrowed(DEFAULT_APP_NAME)),
            lookup: self.lookup.unwrap_or_else(|| Arc::new(SystemLookup)),
            log: self.log.unwrap_or_else(|| Arc::new(FacadeLogSink::new())),
            alert: self.alert.unwrap_or_else(|| Arc::new(SystemAlert)),
            debug: self.debug.unwrap_or_else(|| Arc::new(SystemDebugChannel)),
            terminator: self.terminator.unwrap_or_else(|| Arc::new(AbortTerminator)),
        }
    }
}

// ============================================================================
// Process-wide reporter
// ============================================================================

static GLOBAL: OnceLock<Reporter> = OnceLock::new();

/// Install the process-wide reporter used by [`escalate!`](crate::escalate).
///
/// Only the first call wins; later calls hand the reporter back.
pub fn install(reporter: Reporter) -> Result<(), Reporter> {
    GLOBAL.set(reporter)
}

/// The installed reporter, or a default one if nothing was installed yet.
pub fn global() -> &'static Reporter {
    GLOBAL.get_or_init(Reporter::default)
}
