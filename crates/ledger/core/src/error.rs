//! Common error infrastructure for ledger-core.
//!
//! The rules in this crate only fail at construction time: malformed bounds or
//! item definitions are rejected immediately. Attempted transitions that violate
//! a precondition (consuming with nothing available, for instance) are reported
//! as ordinary no-op outcomes and never surface here.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input, should not retry without changes.
    ///
    /// Examples: inverted counter bounds, negative usage capacity
    Validation,

    /// Unexpected state inconsistency.
    ///
    /// These indicate bugs and should be investigated.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all ledger-core errors.
///
/// Provides a uniform interface for error classification across the crate and
/// the crates that wrap its errors.
pub trait LedgerError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for error categorization and testing.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised while constructing counters, ledgers or item definitions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Counter bounds are inverted.
    #[error("invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: i32, max: i32 },

    /// A usage capacity or item limit is out of range.
    #[error("invalid configuration: {field} = {value} ({reason})")]
    InvalidConfiguration {
        field: &'static str,
        value: i32,
        reason: &'static str,
    },

    /// Social standing deltas are restricted to -1, 0 or +1.
    #[error("invalid social standing delta {0} (expected -1, 0 or 1)")]
    InvalidStandingDelta(i32),
}

impl ConfigError {
    pub(crate) const fn negative_max_usage(value: i32) -> Self {
        Self::InvalidConfiguration {
            field: "max_usage",
            value,
            reason: "must not be negative",
        }
    }
}

impl LedgerError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRange { .. } => "CONFIG_INVALID_RANGE",
            Self::InvalidConfiguration { .. } => "CONFIG_INVALID_CONFIGURATION",
            Self::InvalidStandingDelta(_) => "CONFIG_INVALID_STANDING_DELTA",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_validation_errors() {
        let error = ConfigError::InvalidRange { min: 5, max: 1 };
        assert_eq!(error.severity(), ErrorSeverity::Validation);
        assert!(!error.severity().is_internal());
        assert_eq!(error.error_code(), "CONFIG_INVALID_RANGE");
    }

    #[test]
    fn messages_name_the_offending_values() {
        let error = ConfigError::negative_max_usage(-2);
        assert_eq!(
            error.to_string(),
            "invalid configuration: max_usage = -2 (must not be negative)"
        );
        assert_eq!(
            ConfigError::InvalidStandingDelta(3).to_string(),
            "invalid social standing delta 3 (expected -1, 0 or 1)"
        );
    }
}
