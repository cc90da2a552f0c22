//! Common error infrastructure for economy-core.
//!
//! Domain-specific errors (e.g. [`FormulaError`](crate::formula::FormulaError))
//! are defined in their respective modules alongside the operations they
//! validate. This module provides the shared classification layer.
//!
//! # Propagation policy
//!
//! Arithmetic and lookup operations never fail across the aggregator
//! boundary: missing currencies read as zero, missing contributors as the
//! neutral transform, and degenerate divisions resolve to zero. Only
//! construction-time validation (malformed formulas, bad log bases) surfaces
//! errors, and those are reported at content-load time.

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the caller can retry with different inputs.
    Recoverable,

    /// Validation error - malformed content definition, reject at load time.
    Validation,

    /// Internal error - unexpected inconsistency, indicates a bug.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all economy-core errors.
///
/// Error enums implement this alongside `#[derive(thiserror::Error)]` so
/// hosts can route content-load failures uniformly.
pub trait EconomyError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error type.
    ///
    /// Useful for error categorization, metrics, and testing.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
