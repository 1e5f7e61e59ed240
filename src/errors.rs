// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the calibration tool

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Messaging layer errors
    Transport(TransportError),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Messaging layer errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Could not reach the bus
    ConnectFailed(String),
    /// Connection to the bus was lost
    Disconnected,
    /// Payload could not be encoded or decoded
    Codec(String),
    /// Service call did not answer in time
    Timeout,
    /// Remote side answered a call with an error
    Remote(String),
}

/// Reasons a mirror configuration is refused before sending
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorError {
    /// Distance count does not match `max_distance / step`
    WrongNumber { expected: usize, provided: usize },
    /// Distances are not non-decreasing; `index` is the first offending position
    WrongSequence { index: usize },
    /// A token in the distance list is not a pixel distance
    InvalidValue { index: usize, token: String },
    /// Step of zero cannot divide the maximum distance
    ZeroStep,
    /// Step does not divide the maximum distance exactly
    InexactStep { max_distance: u16, step: u16 },
}

/// Frame decoding errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Encoding tag is not one we can display
    UnsupportedEncoding(String),
    /// Raw buffer length does not match the declared geometry
    SizeMismatch { expected: usize, actual: usize },
    /// Declared geometry does not fit in memory
    TooLarge { width: u32, height: u32 },
    /// Compressed payload failed to decode
    Corrupt(String),
}

/// Label chooser index out of range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelIndexError(pub usize);

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Transport(e) => write!(f, "Transport error: {}", e),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::ConnectFailed(msg) => write!(f, "Failed to connect to bus: {}", msg),
            TransportError::Disconnected => write!(f, "Bus connection closed"),
            TransportError::Codec(msg) => write!(f, "Message codec error: {}", msg),
            TransportError::Timeout => write!(f, "Service call timed out"),
            TransportError::Remote(msg) => write!(f, "Remote error: {}", msg),
        }
    }
}

impl fmt::Display for MirrorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirrorError::WrongNumber { expected, provided } => write!(
                f,
                "Wrong number of distance values.\n{} arguments needed but {} were provided",
                expected, provided
            ),
            MirrorError::WrongSequence { .. } => write!(f, "Wrong sequence of distance values."),
            MirrorError::InvalidValue { index, token } => {
                write!(f, "Distance value {} ('{}') is not a pixel distance.", index + 1, token)
            }
            MirrorError::ZeroStep => write!(f, "Step must be greater than zero."),
            MirrorError::InexactStep { max_distance, step } => write!(
                f,
                "Maximum distance {} is not a multiple of step {}.",
                max_distance, step
            ),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnsupportedEncoding(enc) => write!(f, "Unsupported encoding: {}", enc),
            DecodeError::SizeMismatch { expected, actual } => {
                write!(f, "Expected {} bytes but frame carries {}", expected, actual)
            }
            DecodeError::TooLarge { width, height } => {
                write!(f, "Frame of {}x{} pixels is too large", width, height)
            }
            DecodeError::Corrupt(msg) => write!(f, "Corrupt image data: {}", msg),
        }
    }
}

impl fmt::Display for LabelIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Label index {} is out of range", self.0)
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for TransportError {}
impl std::error::Error for MirrorError {}
impl std::error::Error for DecodeError {}
impl std::error::Error for LabelIndexError {}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        AppError::Transport(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Codec(err.to_string())
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError::ConnectFailed(err.to_string())
    }
}
