//! Common error infrastructure for mechanics-core.
//!
//! Domain errors (`ComponentError`, `CombatError`, `GraphError`, ...) live next
//! to the module that raises them; this module holds what they share.
//!
//! None of these errors reach a player. They end up in the tracing log where
//! content authors and engineers read them, so every variant carries a stable
//! code and a severity.

/// Severity level of an error, used for categorization and log levels.
///
/// - **Recoverable**: the operation can be retried later (e.g. a unit not placed yet)
/// - **Validation**: bad input, usually malformed content
/// - **Internal**: engine state disagrees with itself and needs investigation
/// - **Fatal**: the simulation cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; a later attempt may succeed.
    Recoverable,

    /// Invalid input, should not retry without changes.
    ///
    /// Examples: unknown stat name in content, repeat count over the limit
    Validation,

    /// Unexpected state inconsistency.
    ///
    /// Examples: missing stat block on a damage target, parameter index out of range
    Internal,

    /// Unrecoverable.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an engine bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all mechanics-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Codes are `SCREAMING_SNAKE` and prefixed with the owning module
pub trait MechanicsError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_classification() {
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert!(!ErrorSeverity::Validation.is_recoverable());
        assert!(ErrorSeverity::Internal.is_internal());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert!(!ErrorSeverity::Validation.is_internal());
        assert_eq!(ErrorSeverity::Validation.as_str(), "validation");
    }
}
