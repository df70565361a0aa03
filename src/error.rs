// Copyright 2025 N. Dornseif
//
// Dual-licensed under Apache 2.0 and MIT terms.

//! Error types for parameter validation and generation.

use thiserror::Error;

use crate::params::PeriodWarning;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LcgError {
    /// Malformed or out of domain input. Never coerced.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    /// Only raised in strict mode.
    #[error("full period conditions violated: {0}")]
    PeriodConstraintViolation(PeriodWarning),
}

impl LcgError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        LcgError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LcgError>;
