//! # Procedural Error Types
//!
//! Generation itself never fails; only configuration can be rejected.

use thiserror::Error;

/// Errors raised while validating generation settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProceduralError {
    /// A setting is out of its allowed range or inconsistent with another.
    #[error("invalid setting `{field}`: {reason}")]
    InvalidConfig {
        /// Dotted path of the offending setting.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type for procedural configuration.
pub type ProceduralResult<T> = Result<T, ProceduralError>;

pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> ProceduralError {
    ProceduralError::InvalidConfig {
        field,
        reason: reason.into(),
    }
}
