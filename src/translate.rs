//! Status translator: status code to descriptive text.
//!
//! # Output Contract
//!
//! ```text
//! Exception from HRESULT: <description> (0x<hex>)
//! ```
//!
//! - `<description>` comes from a [`StatusLookup`] queried in US English,
//!   whatever the locale of the running system, with surrounding whitespace
//!   and line terminators trimmed.
//! - When the lookup has nothing to say (no entry, empty text, or a panic
//!   inside the lookup), `<description>` is [`DESCRIPTION_PLACEHOLDER`].
//! - `<hex>` is the code's bit pattern, lowercase, zero-padded to
//!   [`HEX_WIDTH`](crate::status::HEX_WIDTH) digits, so every diagnostic carries
//!   a searchable identifier even when the description is the placeholder.
//!
//! A panicking lookup is caught, but only as a last resort: the panic hook
//! still runs first (printing to stderr under the default hook), and a build
//! with `panic = "abort"` aborts instead. Lookups must not panic.
//!
//! This wording is part of the public contract. Downstream logs and golden
//! tests depend on it staying stable.
//!
//! # Example
//!
//! ```rust
//! use hresult_escalation::{describe_with, BuiltinLookup, StatusCode};
//!
//! assert_eq!(
//!     describe_with(&BuiltinLookup, StatusCode::E_FAIL),
//!     "Exception from HRESULT: Unspecified error (0x80004005)"
//! );
//! ```

use crate::status::{FACILITY_WIN32, StatusCode};
use std::panic::{self, AssertUnwindSafe};

/// Fixed prefix of every description.
pub const DESCRIPTION_PREFIX: &str = "Exception from HRESULT: ";

/// Used when no description is available for a code.
pub const DESCRIPTION_PLACEHOLDER: &str = "[Failed to get error message for HRESULT]";

/// 16-bit language identifier: `(sublanguage << 10) | primary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LanguageId(u16);

impl LanguageId {
    /// Primary language: English.
    pub const LANG_ENGLISH: u16 = 0x09;
    /// Sublanguage: United States.
    pub const SUBLANG_ENGLISH_US: u16 = 0x01;

    /// English (United States), the only language descriptions are requested in.
    pub const EN_US: Self = Self::make(Self::LANG_ENGLISH, Self::SUBLANG_ENGLISH_US);

    /// Combine a primary language and a sublanguage.
    #[inline]
    pub const fn make(primary: u16, sublanguage: u16) -> Self {
        Self((sublanguage << 10) | primary)
    }

    /// Packed identifier as passed to the system.
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

/// Source of textual descriptions for status codes.
///
/// Implementations own whatever buffers the underlying service hands out and
/// must release them before returning.
///
/// A lookup reports "no description" by returning `None` and must not panic.
/// Panics are contained by [`describe_with`], but the panic hook still prints
/// a report, and under `panic = "abort"` the process ends.
pub trait StatusLookup: Send + Sync {
    /// Description of `code` in `language`, if one exists.
    fn lookup(&self, code: StatusCode, language: LanguageId) -> Option<String>;
}

impl<L: StatusLookup + ?Sized> StatusLookup for &L {
    fn lookup(&self, code: StatusCode, language: LanguageId) -> Option<String> {
        (**self).lookup(code, language)
    }
}

impl<L: StatusLookup + ?Sized> StatusLookup for Box<L> {
    fn lookup(&self, code: StatusCode, language: LanguageId) -> Option<String> {
        (**self).lookup(code, language)
    }
}

impl<L: StatusLookup + ?Sized> StatusLookup for std::sync::Arc<L> {
    fn lookup(&self, code: StatusCode, language: LanguageId) -> Option<String> {
        (**self).lookup(code, language)
    }
}

/// Describe `code` using the platform's [`SystemLookup`].
pub fn describe(code: StatusCode) -> String {
    describe_with(&SystemLookup, code)
}

/// Describe `code` using the given lookup. Never fails.
pub fn describe_with<L: StatusLookup + ?Sized>(lookup: &L, code: StatusCode) -> String {
    let found = panic::catch_unwind(AssertUnwindSafe(|| lookup.lookup(code, LanguageId::EN_US)))
        .ok()
        .flatten();

    let description = found
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(DESCRIPTION_PLACEHOLDER);

    format!("{}{} ({})", DESCRIPTION_PREFIX, description, code)
}

// ============================================================================
// Built-in Catalogue
// ============================================================================

/// Deterministic US-English catalogue of well-known codes.
///
/// Texts match what the Windows system catalogue returns for the same codes,
/// so logs read the same on every platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLookup;

impl BuiltinLookup {
    fn generic(bits: u32) -> Option<&'static str> {
        Some(match bits {
            0x0000_0000 => "The operation completed successfully.",
            0x8000_4001 => "Not implemented",
            0x8000_4002 => "No such interface supported",
            0x8000_4003 => "Invalid pointer",
            0x8000_4004 => "Operation aborted",
            0x8000_4005 => "Unspecified error",
            0x8000_FFFF => "Catastrophic failure",
            0x8001_0106 => "Cannot change thread mode after it is set.",
            0x8004_0154 => "Class not registered",
            _ => return None,
        })
    }

    fn win32(code: u16) -> Option<&'static str> {
        Some(match code {
            2 => "The system cannot find the file specified.",
            3 => "The system cannot find the path specified.",
            5 => "Access is denied.",
            6 => "The handle is invalid.",
            8 => "Not enough memory resources are available to process this command.",
            14 => "Not enough memory resources are available to complete this operation.",
            32 => "The process cannot access the file because it is being used by another process.",
            87 => "The parameter is incorrect.",
            122 => "The data area passed to a system call is too small.",
            183 => "Cannot create a file when that file already exists.",
            1168 => "Element not found.",
            1223 => "The operation was canceled by the user.",
            1400 => "Invalid window handle.",
            _ => return None,
        })
    }
}

impl StatusLookup for BuiltinLookup {
    fn lookup(&self, code: StatusCode, language: LanguageId) -> Option<String> {
        if language != LanguageId::EN_US {
            return None;
        }
        let text = match Self::generic(code.bits()) {
            Some(text) => text,
            None if code.is_failure() && code.facility() == FACILITY_WIN32 => Self::win32(code.code())?,
            None => return None,
        };
        Some(text.to_owned())
    }
}

// ============================================================================
// System Catalogue
// ============================================================================

/// The platform's own message catalogue.
///
/// On Windows this asks `FormatMessageW` and releases the returned buffer with
/// `LocalFree`. Elsewhere it falls back to [`BuiltinLookup`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLookup;

impl StatusLookup for SystemLookup {
    #[cfg(windows)]
    fn lookup(&self, code: StatusCode, language: LanguageId) -> Option<String> {
        system::format_message(code, language)
    }

    #[cfg(not(windows))]
    fn lookup(&self, code: StatusCode, language: LanguageId) -> Option<String> {
        BuiltinLookup.lookup(code, language)
    }
}

#[cfg(windows)]
mod system {
    use super::LanguageId;
    use crate::buffer::ScopedBuffer;
    use crate::status::StatusCode;
    use windows::Win32::Foundation::{HLOCAL, LocalFree};
    use windows::Win32::System::Diagnostics::Debug::{
        FORMAT_MESSAGE_ALLOCATE_BUFFER, FORMAT_MESSAGE_FROM_SYSTEM, FORMAT_MESSAGE_IGNORE_INSERTS,
        FORMAT_MESSAGE_MAX_WIDTH_MASK, FormatMessageW,
    };
    use windows::core::PWSTR;

    unsafe fn local_free(ptr: *mut u16) {
        // SAFETY: `ptr` came from FormatMessageW with ALLOCATE_BUFFER.
        let _ = unsafe { LocalFree(HLOCAL(ptr.cast())) };
    }

    pub(super) fn format_message(code: StatusCode, language: LanguageId) -> Option<String> {
        let mut raw: *mut u16 = std::ptr::null_mut();
        let flags = FORMAT_MESSAGE_ALLOCATE_BUFFER
            | FORMAT_MESSAGE_FROM_SYSTEM
            | FORMAT_MESSAGE_IGNORE_INSERTS
            | FORMAT_MESSAGE_MAX_WIDTH_MASK;

        // SAFETY: with ALLOCATE_BUFFER the buffer argument is reinterpreted as
        // a pointer to the pointer that receives the allocation.
        let count = unsafe {
            FormatMessageW(
                flags,
                None,
                code.bits(),
                u32::from(language.raw()),
                PWSTR((&mut raw as *mut *mut u16).cast()),
                0,
                None,
            )
        };
        if count == 0 {
            return None;
        }

        // SAFETY: FormatMessageW wrote `count` UTF-16 units to a LocalAlloc'd buffer.
        let buffer = unsafe { ScopedBuffer::from_raw(raw, count as usize, local_free) }?;
        Some(String::from_utf16_lossy(buffer.as_slice()))
    }
}
