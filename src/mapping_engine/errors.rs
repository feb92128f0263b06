//! Mapping-engine error types.

use thiserror::Error;

/// Reasons a single hand frame is rejected before processing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    /// The tracker delivered the wrong number of landmarks.
    #[error("expected {expected} landmarks, got {actual}")]
    WrongLandmarkCount {
        /// Number of landmarks required.
        expected: usize,
        /// Number of landmarks received.
        actual: usize,
    },

    /// A landmark coordinate was NaN or infinite.
    #[error("landmark {index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Index of the offending landmark.
        index: usize,
    },

    /// The handedness label was neither left nor right.
    #[error("unknown handedness label: {0:?}")]
    UnknownHandedness(String),

    /// A landmark array had an unusable shape.
    #[error("landmark array must be 21x3 or 21x2, got {rows}x{cols}")]
    BadShape {
        /// Rows in the array.
        rows: usize,
        /// Columns in the array.
        cols: usize,
    },
}

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("root note must be in 0..=11, got {0}")]
    RootNoteOutOfRange(u8),

    #[error("unknown scale: {0:?}")]
    UnknownScale(String),

    #[error("unknown secondary mode: {0:?}")]
    UnknownSecondaryMode(String),

    #[error("unknown note naming: {0:?}")]
    UnknownNoteNaming(String),

    #[error("secondary volume must be finite, got {0}")]
    NonFiniteVolume(f32),
}

/// Errors raised by the control surface when submitting an update.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The engine has not drained enough pending updates.
    #[error("control queue is full")]
    QueueFull,
}
