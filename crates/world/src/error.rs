use cavegen_core::FieldError;
use thiserror::Error;

/// Errors produced by cave generation steps.
#[derive(Debug, Error)]
pub enum CaveError {
    /// A field was missing, too small or accessed out of bounds.
    #[error(transparent)]
    Field(#[from] FieldError),
    /// A configuration value was rejected at startup.
    #[error("invalid cave configuration `{field}`: {reason}")]
    InvalidConfig {
        /// Name of the offending setting.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}
