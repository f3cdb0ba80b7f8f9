//! Severity levels, ordered by escalation intensity.
//!
//! | level   | debug channel | log | alert                 | terminate |
//! |---------|---------------|-----|-----------------------|-----------|
//! | `Debug` | yes           |     |                       |           |
//! | `Log`   |               | yes |                       |           |
//! | `Error` |               | yes | warning               |           |
//! | `Fatal` |               | yes | error, always-on-top  | yes       |

use crate::error::EscalationError;
use crate::sinks::{AlertIcon, AlertStyle};
use std::fmt;

/// Caller-chosen escalation tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum Level {
    /// Developer channel only.
    Debug = 0,
    /// Persistent log only.
    Log = 1,
    /// Log plus a dismissible warning alert.
    Error = 2,
    /// Log, blocking error alert, then process termination.
    Fatal = 3,
}

impl Level {
    /// All levels in escalation order.
    pub const ALL: [Level; 4] = [Level::Debug, Level::Log, Level::Error, Level::Fatal];

    /// Convert a raw severity value, rejecting anything outside the known set.
    #[inline]
    pub const fn from_raw(value: u32) -> Result<Self, EscalationError> {
        match value {
            0 => Ok(Self::Debug),
            1 => Ok(Self::Log),
            2 => Ok(Self::Error),
            3 => Ok(Self::Fatal),
            _ => Err(EscalationError::InvalidLevel { value }),
        }
    }

    /// Wire value of this level.
    #[inline]
    pub const fn as_raw(self) -> u32 {
        self as u32
    }

    /// Whether this level shows an interactive alert.
    #[inline]
    pub const fn shows_alert(self) -> bool {
        matches!(self, Self::Error | Self::Fatal)
    }

    /// Whether this level writes to the persistent log.
    #[inline]
    pub const fn writes_log(self) -> bool {
        !matches!(self, Self::Debug)
    }

    /// Alert presentation for levels that show one.
    pub const fn alert_style(self) -> Option<AlertStyle> {
        match self {
            Self::Debug | Self::Log => None,
            Self::Error => Some(AlertStyle {
                icon: AlertIcon::Warning,
                foreground: true,
                topmost: false,
            }),
            Self::Fatal => Some(AlertStyle {
                icon: AlertIcon::Error,
                foreground: true,
                topmost: true,
            }),
        }
    }

    /// Suffix appended to the application name in alert titles.
    pub const fn title_suffix(self) -> &'static str {
        match self {
            Self::Fatal => "Fatal error",
            _ => "Error",
        }
    }
}

impl TryFrom<u32> for Level {
    type Error = EscalationError;

    fn try_from(value: u32) -> Result<Self, EscalationError> {
        Self::from_raw(value)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "debug",
            Self::Log => "log",
            Self::Error => "error",
            Self::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values_round_trip() {
        for level in Level::ALL {
            assert_eq!(Level::from_raw(level.as_raw()), Ok(level));
        }
    }

    #[test]
    fn unknown_raw_value_is_rejected() {
        assert_eq!(
            Level::from_raw(4),
            Err(EscalationError::InvalidLevel { value: 4 })
        );
        assert!(Level::try_from(u32::MAX).is_err());
    }

    #[test]
    fn ordered_by_intensity() {
        assert!(Level::Debug < Level::Log);
        assert!(Level::Log < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn alert_styles() {
        assert_eq!(Level::Debug.alert_style(), None);
        assert_eq!(Level::Log.alert_style(), None);

        let warning = Level::Error.alert_style().unwrap();
        assert_eq!(warning.icon, AlertIcon::Warning);
        assert!(warning.foreground);
        assert!(!warning.topmost);

        let fatal = Level::Fatal.alert_style().unwrap();
        assert_eq!(fatal.icon, AlertIcon::Error);
        assert!(fatal.foreground);
        assert!(fatal.topmost);
    }

    #[test]
    fn sink_participation() {
        assert!(!Level::Debug.writes_log());
        assert!(Level::Log.writes_log());
        assert!(!Level::Log.shows_alert());
        assert!(Level::Error.shows_alert());
        assert!(Level::Fatal.shows_alert());
    }
}
