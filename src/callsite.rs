//! Call-site metadata captured where a status code is checked.
//!
//! The function name arrives as raw bytes. It is usually produced by the
//! compiler, but nothing guarantees it is valid UTF-8, so decoding is fallible
//! and the display form falls back to a fixed placeholder. A malformed name
//! must never stop a fatal error from being reported.

use std::borrow::Cow;
use std::fmt;

/// Shown in place of a function name that is not valid UTF-8.
pub const FUNCTION_NAME_PLACEHOLDER: &str = "[failed to convert function name to UTF-8]";

/// Source location of a checked call. Lives only for a single report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    /// Source file path
    pub file: &'a str,
    /// One-based source line
    pub line: u32,
    /// Function name bytes, expected but not guaranteed to be UTF-8
    pub function: &'a [u8],
}

impl<'a> CallSite<'a> {
    /// Usually built by [`callsite!`](crate::callsite!).
    #[inline]
    pub const fn new(file: &'a str, line: u32, function: &'a [u8]) -> Self {
        Self {
            file,
            line,
            function,
        }
    }

    /// Function name as text, or [`FUNCTION_NAME_PLACEHOLDER`].
    #[inline]
    pub fn function_display(&self) -> Cow<'a, str> {
        match decode_function_name(self.function) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Borrowed(FUNCTION_NAME_PLACEHOLDER),
        }
    }
}

impl fmt::Display for CallSite<'_> {
    /// `file:line at function name`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} at function {}",
            self.file,
            self.line,
            self.function_display()
        )
    }
}

/// Decode a function name. `None` on an invalid byte sequence.
#[inline]
pub fn decode_function_name(bytes: &[u8]) -> Option<&str> {
    std::str::from_utf8(bytes).ok()
}
