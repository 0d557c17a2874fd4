//! Error types for msorm-types

use thiserror::Error;

use crate::value::HostType;

/// Result type alias for type-mapping operations
pub type TypeResult<T> = Result<T, TypeError>;

/// How a host type resolved against the scalar registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The host type is registered (or is the generic placeholder).
    Match,
    /// The host type is not registered at all.
    Unsupported,
    /// The host type is a recognized non-scalar construct (row/record or
    /// result-set type) that needs a different API, not a literal.
    StructuralMismatch,
}

/// Error types for type mapping and literal serialization
#[derive(Debug, Error)]
pub enum TypeError {
    /// Host type is not registered for literal serialization.
    ///
    /// Carries the full list of supported host types as guidance.
    #[error(
        "Host type {host} has no SQL mapping and cannot be rendered as a literal. \
         Supported host types: {supported}"
    )]
    Unsupported {
        host: HostType,
        supported: &'static str,
    },

    /// Host type is a recognized non-scalar construct (record, row set).
    #[error(
        "Host type {host} is a non-scalar construct; pass it through the tabular \
         parameter API instead of a literal"
    )]
    StructuralMismatch { host: HostType },

    /// Host type is incompatible with an explicitly declared SQL type.
    #[error("Host type {host} is not compatible with declared type {declared}")]
    DeclaredTypeMismatch { host: HostType, declared: String },

    /// Host type is invalid for a non-parameterized inline substitution point.
    #[error("Host type {host} is not allowed at an inline {category} position")]
    InlineCategoryMismatch {
        host: HostType,
        category: &'static str,
    },

    /// Value cannot be coerced to the target SQL primitive.
    #[error("Cannot convert value `{value}` to {target}")]
    ConversionFailed {
        value: String,
        target: &'static str,
    },

    /// Value is outside the range the dialect can represent.
    #[error("Value `{value}` is out of range for {target}")]
    OutOfRange {
        value: String,
        target: &'static str,
    },
}

impl TypeError {
    /// Create a conversion error for a value and a target SQL type name.
    pub fn conversion(value: impl std::fmt::Display, target: &'static str) -> Self {
        Self::ConversionFailed {
            value: value.to_string(),
            target,
        }
    }

    /// Create an out-of-range error for a value and a target SQL type name.
    pub fn out_of_range(value: impl std::fmt::Display, target: &'static str) -> Self {
        Self::OutOfRange {
            value: value.to_string(),
            target,
        }
    }

    /// The [`MatchKind`] this error corresponds to, for callers that branch
    /// on how a host type resolved rather than on the error itself.
    pub fn match_kind(&self) -> MatchKind {
        match self {
            Self::Unsupported { .. } => MatchKind::Unsupported,
            Self::StructuralMismatch { .. } => MatchKind::StructuralMismatch,
            _ => MatchKind::Match,
        }
    }

    /// Check if this is an unsupported-host-type error
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// Check if this is a structural (non-scalar) mismatch
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::StructuralMismatch { .. })
    }

    /// Check if this is an out-of-range error
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }

    /// Check if this is a conversion failure
    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::ConversionFailed { .. })
    }
}
