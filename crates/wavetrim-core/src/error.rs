//! Error types for pyramid construction

use thiserror::Error;

/// Malformed input handed to pyramid construction
///
/// These are caller precondition violations; nothing inside the engine
/// recovers from them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    /// The declared frame count is negative
    #[error("Negative frame count: {0}")]
    NegativeFrameCount(i64),

    /// The gain sequence length disagrees with the declared frame count
    #[error("Frame gain count mismatch: declared {declared} frames, got {actual} gains")]
    FrameCountMismatch { declared: i64, actual: usize },

    /// A frame gain is below zero
    #[error("Negative gain {gain} at frame {frame}")]
    NegativeGain { frame: usize, gain: i32 },

    /// Sample rate must be positive for any time conversion
    #[error("Sample rate must be positive")]
    ZeroSampleRate,

    /// Frames must contain at least one sample
    #[error("Samples per frame must be positive")]
    ZeroSamplesPerFrame,
}

/// Result type for pyramid construction
pub type PyramidResult<T> = Result<T, InvalidInput>;
