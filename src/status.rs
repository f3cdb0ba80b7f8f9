//! Status codes returned by system-level operations.
//!
//! A [`StatusCode`] is an opaque signed 32-bit value. The sign bit decides the
//! outcome: non-negative values denote success, negative values denote failure.
//! This matches the `HRESULT` convention, where bit 31 is the severity bit.
//!
//! # Layout
//!
//! ```text
//!  31  30..29  28..16     15..0
//! +---+------+----------+--------+
//! | S | R/C  | facility |  code  |
//! +---+------+----------+--------+
//! ```
//!
//! # Example
//!
//! ```rust
//! use hresult_escalation::StatusCode;
//!
//! let code = StatusCode::new(-2147467259);
//! assert!(code.is_failure());
//! assert_eq!(code.to_string(), "0x80004005");
//! assert_eq!(code, StatusCode::E_FAIL);
//! ```

use std::fmt;

/// Facility used when wrapping Win32 error codes.
pub const FACILITY_WIN32: u16 = 7;

/// Number of hex digits used when rendering a status code.
pub const HEX_WIDTH: usize = std::mem::size_of::<i32>() * 2;

/// Opaque status code from a system call.
///
/// Passed by value; carries no ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct StatusCode(i32);

impl StatusCode {
    /// Operation successful.
    pub const S_OK: Self = Self(0);
    /// Unspecified failure.
    pub const E_FAIL: Self = Self::from_bits(0x8000_4005);
    /// Not implemented.
    pub const E_NOTIMPL: Self = Self::from_bits(0x8000_4001);
    /// Pointer that is not valid.
    pub const E_POINTER: Self = Self::from_bits(0x8000_4003);
    /// Operation aborted.
    pub const E_ABORT: Self = Self::from_bits(0x8000_4004);
    /// Unexpected failure.
    pub const E_UNEXPECTED: Self = Self::from_bits(0x8000_FFFF);
    /// General access denied error.
    pub const E_ACCESSDENIED: Self = Self::from_bits(0x8007_0005);
    /// Handle that is not valid.
    pub const E_HANDLE: Self = Self::from_bits(0x8007_0006);
    /// Failed to allocate necessary memory.
    pub const E_OUTOFMEMORY: Self = Self::from_bits(0x8007_000E);
    /// One or more arguments are not valid.
    pub const E_INVALIDARG: Self = Self::from_bits(0x8007_0057);

    /// Wrap a raw signed status value.
    #[inline]
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// Wrap a status value given as its unsigned bit pattern.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits as i32)
    }

    /// Map a Win32 error code into the status code space.
    ///
    /// Zero stays zero. Values that already read as negative pass through
    /// unchanged; everything else lands in [`FACILITY_WIN32`] with the
    /// failure bit set.
    #[inline]
    pub const fn from_win32(error: u32) -> Self {
        if (error as i32) <= 0 {
            Self(error as i32)
        } else {
            Self::from_bits((error & 0x0000_FFFF) | ((FACILITY_WIN32 as u32) << 16) | 0x8000_0000)
        }
    }

    /// Raw signed value.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Unsigned bit pattern.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0 as u32
    }

    /// Non-negative values denote success.
    #[inline(always)]
    pub const fn is_success(self) -> bool {
        self.0 >= 0
    }

    /// Negative values denote failure.
    #[inline(always)]
    pub const fn is_failure(self) -> bool {
        self.0 < 0
    }

    /// Facility field (bits 16..29).
    #[inline]
    pub const fn facility(self) -> u16 {
        ((self.bits() >> 16) & 0x1FFF) as u16
    }

    /// Low 16 bits.
    #[inline]
    pub const fn code(self) -> u16 {
        (self.bits() & 0xFFFF) as u16
    }
}

impl From<i32> for StatusCode {
    #[inline]
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

impl From<StatusCode> for i32 {
    #[inline]
    fn from(code: StatusCode) -> Self {
        code.0
    }
}

#[cfg(windows)]
impl From<windows::core::HRESULT> for StatusCode {
    #[inline]
    fn from(hr: windows::core::HRESULT) -> Self {
        Self(hr.0)
    }
}

impl fmt::Display for StatusCode {
    /// `0x` followed by the two's complement value in zero-padded lowercase hex.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:0width$x}", self.bits(), width = HEX_WIDTH)
    }
}

impl fmt::LowerHex for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.bits(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_decides_outcome() {
        assert!(StatusCode::S_OK.is_success());
        assert!(StatusCode::new(1).is_success());
        assert!(StatusCode::new(i32::MAX).is_success());
        assert!(StatusCode::new(-1).is_failure());
        assert!(StatusCode::E_FAIL.is_failure());
    }

    #[test]
    fn display_is_fixed_width_lowercase() {
        assert_eq!(HEX_WIDTH, 8);
        assert_eq!(StatusCode::S_OK.to_string(), "0x00000000");
        assert_eq!(StatusCode::new(1).to_string(), "0x00000001");
        assert_eq!(StatusCode::new(-2147467259).to_string(), "0x80004005");
        assert_eq!(StatusCode::E_UNEXPECTED.to_string(), "0x8000ffff");
        assert_eq!(StatusCode::new(-1).to_string(), "0xffffffff");
    }

    #[test]
    fn win32_mapping() {
        assert_eq!(StatusCode::from_win32(0), StatusCode::S_OK);
        assert_eq!(StatusCode::from_win32(5), StatusCode::E_ACCESSDENIED);
        assert_eq!(StatusCode::from_win32(87), StatusCode::E_INVALIDARG);
        // already an HRESULT
        assert_eq!(StatusCode::from_win32(0x8000_4005), StatusCode::E_FAIL);
    }

    #[test]
    fn field_accessors() {
        let code = StatusCode::E_OUTOFMEMORY;
        assert_eq!(code.facility(), FACILITY_WIN32);
        assert_eq!(code.code(), 0x000E);
        assert_eq!(StatusCode::E_FAIL.facility(), 0);
        assert_eq!(StatusCode::E_FAIL.code(), 0x4005);
    }

    #[test]
    fn raw_round_trips_through_i32() {
        let code: StatusCode = (-2147024891).into();
        assert_eq!(code, StatusCode::E_ACCESSDENIED);
        assert_eq!(i32::from(code), -2147024891);
    }
}
