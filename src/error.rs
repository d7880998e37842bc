//! Error types for the bridge.
//!
//! Nothing in the per-tick path is fatal: malformed spawn rows come back as
//! `SimError` values that the caller logs and counts.

use thiserror::Error;

/// Errors produced while parsing host input or loading configuration.
#[derive(Error, Debug)]
pub enum SimError {
    /// A required input channel is absent or shorter than the row index.
    #[error("row {row}: missing field {field} (input has {channels} channels)")]
    MissingField {
        row: usize,
        field: usize,
        channels: usize,
    },

    /// A field held NaN or an infinity.
    #[error("row {row}: field `{field}` is not finite ({value})")]
    NonFinite {
        row: usize,
        field: &'static str,
        value: f32,
    },

    /// The identity channel cannot be represented as an `i32`.
    #[error("row {row}: identity {value} is outside the i32 range")]
    IdentityOutOfRange { row: usize, value: f32 },

    /// `pulse_pressed` was called with a name that is not a known pulse.
    #[error("unknown pulse `{0}`")]
    UnknownPulse(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl SimError {
    /// Row index for per-row input errors.
    pub fn row(&self) -> Option<usize> {
        match self {
            SimError::MissingField { row, .. }
            | SimError::NonFinite { row, .. }
            | SimError::IdentityOutOfRange { row, .. } => Some(*row),
            _ => None,
        }
    }
}
