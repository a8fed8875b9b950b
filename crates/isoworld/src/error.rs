//! # World Error Types
//!
//! Only configuration loading can fail. Everything at runtime degrades to an
//! empty result or a logged skip instead of an error.

use isoworld_procedural::ProceduralError;
use thiserror::Error;

/// Errors raised while building a world.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// The config file could not be read.
    #[error("cannot read config {path}: {reason}")]
    ConfigIo {
        /// File that was requested.
        path: String,
        /// Underlying I/O error text.
        reason: String,
    },

    /// The config text is not valid TOML for [`WorldConfig`](crate::WorldConfig).
    #[error("malformed config: {0}")]
    ConfigParse(String),

    /// A generation setting was rejected.
    #[error(transparent)]
    Procedural(#[from] ProceduralError),

    /// A simulation setting was rejected.
    #[error("invalid setting `{field}`: {reason}")]
    InvalidConfig {
        /// Dotted path of the offending setting.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type for world construction.
pub type WorldResult<T> = Result<T, WorldError>;
