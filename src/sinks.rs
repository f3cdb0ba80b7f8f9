//! Collaborators that receive diagnostics.
//!
//! The router only talks to these narrow traits. Each one is expected to be
//! internally thread-safe; the router adds no locking of its own.
//!
//! | trait            | default                     |
//! |------------------|-----------------------------|
//! | [`LogSink`]      | [`FacadeLogSink`] (`log` crate) |
//! | [`DebugChannel`] | [`SystemDebugChannel`]      |
//! | [`AlertSurface`] | [`SystemAlert`]             |
//! | [`Terminator`]   | [`AbortTerminator`]         |

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Durable, append-only store of log lines.
pub trait LogSink: Send + Sync {
    /// Append one line. Must not panic.
    fn write_line(&self, line: &str);
}

/// Ephemeral developer-visible output, such as an attached debugger.
pub trait DebugChannel: Send + Sync {
    /// Emit `text` verbatim, including any trailing newline.
    fn emit(&self, text: &str);
}

/// Interactive alert presentation. Blocks until dismissed.
pub trait AlertSurface: Send + Sync {
    /// Present `alert` and wait for the user to dismiss it.
    fn show(&self, alert: &Alert<'_>);
}

/// Ends the process immediately.
///
/// Implementations must not return. The production implementation must not
/// unwind or run destructors either; see [`AbortTerminator`].
pub trait Terminator: Send + Sync {
    /// End the process.
    fn terminate(&self) -> !;
}

/// Icon category of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertIcon {
    /// Used for `Error` level.
    Warning,
    /// Used for `Fatal` level.
    Error,
}

/// Presentation flags of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlertStyle {
    /// Icon shown next to the body.
    pub icon: AlertIcon,
    /// Ask to bring the alert to the foreground.
    pub foreground: bool,
    /// Ask to keep the alert above all other windows.
    pub topmost: bool,
}

/// A single alert request. The user's response is not inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert<'a> {
    /// Window caption
    pub title: &'a str,
    /// Message text
    pub body: &'a str,
    /// Icon and window flags
    pub style: AlertStyle,
}

// ============================================================================
// Forwarding impls
// ============================================================================

macro_rules! forward_smart_pointers {
    ($trait:ident, $method:ident($arg:ident: $ty:ty)) => {
        impl<T: $trait + ?Sized> $trait for Arc<T> {
            #[inline]
            fn $method(&self, $arg: $ty) {
                (**self).$method($arg)
            }
        }

        impl<T: $trait + ?Sized> $trait for Box<T> {
            #[inline]
            fn $method(&self, $arg: $ty) {
                (**self).$method($arg)
            }
        }
    };
}

forward_smart_pointers!(LogSink, write_line(line: &str));
forward_smart_pointers!(DebugChannel, emit(text: &str));
forward_smart_pointers!(AlertSurface, show(alert: &Alert<'_>));

impl<T: Terminator + ?Sized> Terminator for Arc<T> {
    fn terminate(&self) -> ! {
        (**self).terminate()
    }
}

impl<T: Terminator + ?Sized> Terminator for Box<T> {
    fn terminate(&self) -> ! {
        (**self).terminate()
    }
}

// ============================================================================
// Log sinks
// ============================================================================

/// Forwards every line to the `log` facade at `Error` level.
#[derive(Debug, Clone, Copy)]
pub struct FacadeLogSink {
    target: &'static str,
}

impl FacadeLogSink {
    /// Log target used by [`FacadeLogSink::new`].
    pub const DEFAULT_TARGET: &'static str = "hresult_escalation";

    /// Sink logging under [`Self::DEFAULT_TARGET`].
    pub const fn new() -> Self {
        Self {
            target: Self::DEFAULT_TARGET,
        }
    }

    /// Sink logging under a caller-chosen target.
    pub const fn with_target(target: &'static str) -> Self {
        Self { target }
    }

    /// Target passed to the `log` facade.
    pub const fn target(&self) -> &'static str {
        self.target
    }
}

impl Default for FacadeLogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for FacadeLogSink {
    fn write_line(&self, line: &str) {
        log::log!(target: self.target, log::Level::Error, "{}", line);
    }
}

/// Appends lines to a file, one write per line.
#[derive(Debug)]
pub struct FileLogSink {
    file: Mutex<File>,
}

impl FileLogSink {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileLogSink {
    fn write_line(&self, line: &str) {
        let mut file = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');
        // Write failures cannot be reported from inside the reporting path.
        let _ = file.write_all(record.as_bytes());
        let _ = file.flush();
    }
}

// ============================================================================
// Debug channel
// ============================================================================

/// `OutputDebugStringW` on Windows, standard error elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDebugChannel;

impl DebugChannel for SystemDebugChannel {
    #[cfg(windows)]
    fn emit(&self, text: &str) {
        use windows::Win32::System::Diagnostics::Debug::OutputDebugStringW;
        use windows::core::PCWSTR;

        let wide = win32::to_wide(text);
        // SAFETY: `wide` is NUL-terminated and outlives the call.
        unsafe { OutputDebugStringW(PCWSTR(wide.as_ptr())) };
    }

    #[cfg(not(windows))]
    fn emit(&self, text: &str) {
        let mut stderr = io::stderr().lock();
        let _ = stderr.write_all(text.as_bytes());
        let _ = stderr.flush();
    }
}

// ============================================================================
// Alert surface
// ============================================================================

/// `MessageBoxW` on Windows, standard error elsewhere.
///
/// The non-Windows rendition has no way to block for a user and returns as
/// soon as the text is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAlert;

impl AlertSurface for SystemAlert {
    #[cfg(windows)]
    fn show(&self, alert: &Alert<'_>) {
        use windows::Win32::Foundation::HWND;
        use windows::Win32::UI::WindowsAndMessaging::{
            MB_ICONERROR, MB_ICONWARNING, MB_OK, MB_SETFOREGROUND, MB_TOPMOST, MessageBoxW,
        };
        use windows::core::PCWSTR;

        let mut style = MB_OK;
        style |= match alert.style.icon {
            AlertIcon::Warning => MB_ICONWARNING,
            AlertIcon::Error => MB_ICONERROR,
        };
        if alert.style.foreground {
            style |= MB_SETFOREGROUND;
        }
        if alert.style.topmost {
            style |= MB_TOPMOST;
        }

        let body = win32::to_wide(alert.body);
        let title = win32::to_wide(alert.title);
        // SAFETY: both strings are NUL-terminated and outlive the call.
        unsafe {
            MessageBoxW(
                HWND::default(),
                PCWSTR(body.as_ptr()),
                PCWSTR(title.as_ptr()),
                style,
            )
        };
    }

    #[cfg(not(windows))]
    fn show(&self, alert: &Alert<'_>) {
        let kind = match alert.style.icon {
            AlertIcon::Warning => "warning",
            AlertIcon::Error => "error",
        };
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "[{}] {}\n{}", kind, alert.title, alert.body);
        let _ = stderr.flush();
    }
}

// ============================================================================
// Terminator
// ============================================================================

/// Terminates with [`std::process::abort`].
///
/// No unwinding happens, no destructors run, no exit handlers run, and
/// buffered output that was not flushed is lost. Resources held by callers up
/// the stack are not cleaned up.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortTerminator;

impl Terminator for AbortTerminator {
    fn terminate(&self) -> ! {
        std::process::abort()
    }
}

#[cfg(windows)]
mod win32 {
    use smallvec::SmallVec;

    /// NUL-terminated UTF-16, inline for typical message lengths.
    pub(super) fn to_wide(text: &str) -> SmallVec<[u16; 256]> {
        text.encode_utf16().chain(std::iter::once(0)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn file_sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");

        let sink = FileLogSink::open(&path).unwrap();
        sink.write_line("first");
        sink.write_line("second");
        drop(sink);

        // reopening appends rather than truncates
        FileLogSink::open(&path).unwrap().write_line("third");

        let mut contents = String::new();
        File::open(&path).unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "first\nsecond\nthird\n");
    }

    #[test]
    fn facade_sink_target() {
        assert_eq!(FacadeLogSink::default().target(), "hresult_escalation");
        assert_eq!(FacadeLogSink::with_target("app").target(), "app");
        // no logger installed: must be a silent no-op
        FacadeLogSink::new().write_line("dropped");
    }

    #[test]
    fn arc_forwards() {
        struct Count(Mutex<usize>);
        impl LogSink for Count {
            fn write_line(&self, _: &str) {
                *self.0.lock().unwrap() += 1;
            }
        }

        let inner = Arc::new(Count(Mutex::new(0)));
        let shared: Arc<dyn LogSink> = inner.clone();
        shared.write_line("a");
        Box::new(Arc::clone(&inner)).write_line("b");
        assert_eq!(*inner.0.lock().unwrap(), 2);
    }
}
