//! Programming errors surfaced by the escalation facility.
//!
//! Failures while *building* a diagnostic never show up here: they degrade to
//! placeholder text. The only thing that is not swallowed is a caller handing
//! the router a severity it does not know.

use std::fmt;

/// Integration bug detected by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscalationError {
    /// Severity value outside the known set.
    InvalidLevel {
        /// The rejected raw value
        value: u32,
    },
}

impl fmt::Display for EscalationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLevel { value } => {
                write!(f, "level was not one of known values (got {})", value)
            }
        }
    }
}

impl std::error::Error for EscalationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_value() {
        let err = EscalationError::InvalidLevel { value: 9 };
        assert_eq!(err.to_string(), "level was not one of known values (got 9)");
    }
}
