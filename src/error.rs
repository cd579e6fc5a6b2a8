//! Error types
//!
//! The physics itself has no error surface; only loading tuning overrides can fail.

use thiserror::Error;

/// Errors that can occur when loading or validating [`crate::Tuning`].
#[derive(Debug, Error)]
pub enum TuningError {
    /// The JSON could not be parsed.
    #[error("invalid tuning json: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside the range the physics step can handle.
    #[error("tuning value `{field}` out of range: {value}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was rejected.
        value: f64,
    },

    /// Pocket radii are inconsistent (influence must enclose capture).
    #[error("pocket influence radius {influence} must exceed capture radius {capture}")]
    InvalidPocketRadii {
        /// Capture radius.
        capture: f32,
        /// Influence radius.
        influence: f32,
    },

    /// The table is too small to hold a ball between the cushions.
    #[error("table {width}x{height} with cushion {cushion} has no room for ball radius {radius}")]
    TableTooSmall {
        /// Table width.
        width: f32,
        /// Table height.
        height: f32,
        /// Cushion thickness.
        cushion: f32,
        /// Ball radius.
        radius: f32,
    },
}

impl TuningError {
    /// Creates an out-of-range error.
    pub fn out_of_range(field: &'static str, value: impl Into<f64>) -> Self {
        Self::OutOfRange {
            field,
            value: value.into(),
        }
    }
}
