//! Errors raised by the unit engine
//!
//! Every failure is a local precondition violation surfaced synchronously to
//! the caller. Each kind is its own variant so front ends can report
//! "unknown unit 'fl.oz(US)' for quantity Volume" instead of a generic failure.

use thiserror::Error;

use crate::DimensionVector;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_FACTOR: &str = "INVALID_FACTOR";
    pub const DUPLICATE_QUANTITY: &str = "DUPLICATE_QUANTITY";
    pub const DUPLICATE_NAME: &str = "DUPLICATE_NAME";
    pub const DUPLICATE_ABBREVIATION: &str = "DUPLICATE_ABBREVIATION";
    pub const UNIT_NOT_FOUND: &str = "UNIT_NOT_FOUND";
    pub const QUANTITY_NOT_FOUND: &str = "QUANTITY_NOT_FOUND";
    pub const DIMENSION_MISMATCH: &str = "DIMENSION_MISMATCH";
    pub const INVALID_OPERAND: &str = "INVALID_OPERAND";
    pub const CATALOGUE_VALIDATION: &str = "CATALOGUE_VALIDATION";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const DIMENSION_SYNTAX: &str = "DIMENSION_SYNTAX";
}

/// Error type for registry, derivation and algebra operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    #[error("invalid scale {what} {value}: {reason}")]
    InvalidFactor {
        what: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("dimension {dimension} is already claimed by quantity {existing}, cannot register {attempted}")]
    DuplicateQuantity {
        dimension: DimensionVector,
        existing: String,
        attempted: String,
    },

    #[error("quantity name {name} is already registered")]
    DuplicateName { name: String },

    #[error("abbreviation '{abbreviation}' of quantity {quantity} is already used by unit '{existing_key}'")]
    DuplicateAbbreviation {
        quantity: String,
        abbreviation: String,
        existing_key: String,
    },

    #[error("unknown unit '{token}' for quantity {quantity}")]
    UnitNotFound { token: String, quantity: String },

    #[error("unknown quantity {name}")]
    QuantityNotFound { name: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("invalid operand: {reason}")]
    InvalidOperand { reason: String },

    #[error("locale catalogue entry '{key}' is invalid: {reason}")]
    CatalogueValidation { key: String, reason: String },

    #[error("cannot parse '{input}' as {quantity}: invalid token '{token}'")]
    Parse {
        input: String,
        quantity: String,
        token: String,
    },

    #[error("invalid dimension string '{input}': {reason}")]
    DimensionSyntax { input: String, reason: String },
}

impl UnitError {
    /// Machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            UnitError::InvalidFactor { .. } => codes::INVALID_FACTOR,
            UnitError::DuplicateQuantity { .. } => codes::DUPLICATE_QUANTITY,
            UnitError::DuplicateName { .. } => codes::DUPLICATE_NAME,
            UnitError::DuplicateAbbreviation { .. } => codes::DUPLICATE_ABBREVIATION,
            UnitError::UnitNotFound { .. } => codes::UNIT_NOT_FOUND,
            UnitError::QuantityNotFound { .. } => codes::QUANTITY_NOT_FOUND,
            UnitError::DimensionMismatch { .. } => codes::DIMENSION_MISMATCH,
            UnitError::InvalidOperand { .. } => codes::INVALID_OPERAND,
            UnitError::CatalogueValidation { .. } => codes::CATALOGUE_VALIDATION,
            UnitError::Parse { .. } => codes::PARSE_ERROR,
            UnitError::DimensionSyntax { .. } => codes::DIMENSION_SYNTAX,
        }
    }

    // ========== Common Error Constructors ==========

    pub fn unit_not_found(token: impl Into<String>, quantity: impl Into<String>) -> Self {
        UnitError::UnitNotFound {
            token: token.into(),
            quantity: quantity.into(),
        }
    }

    pub fn quantity_not_found(name: impl Into<String>) -> Self {
        UnitError::QuantityNotFound { name: name.into() }
    }

    pub fn invalid_operand(reason: impl Into<String>) -> Self {
        UnitError::InvalidOperand {
            reason: reason.into(),
        }
    }

    pub fn mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        UnitError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
