//! # Level Generation Error Types
//!
//! All errors that can occur in the generation pipeline.

use thiserror::Error;

/// Errors that can occur while configuring or running level generation.
#[derive(Error, Debug)]
pub enum LevelGenError {
    /// A settings field failed validation.
    ///
    /// Raised before any generation loop runs, so an invalid configuration
    /// can never be observed mid-level.
    #[error("invalid setting `{field}`: {reason}")]
    InvalidSetting {
        /// The offending settings field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A settings file could not be read.
    #[error("failed to read settings file: {0}")]
    SettingsIo(#[from] std::io::Error),

    /// A settings file could not be parsed as TOML.
    #[error("failed to parse settings file: {0}")]
    SettingsParse(#[from] toml::de::Error),
}

/// Result type for level generation operations.
pub type LevelGenResult<T> = Result<T, LevelGenError>;
