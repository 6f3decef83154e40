//! Error types shared across Runtimer crates.

use std::path::PathBuf;

/// Top-level error type for Runtimer operations.
///
/// Arithmetic in the timing core never produces one of these: degenerate
/// ranges clamp to zero and invalid frame rates are programming errors.
#[derive(Debug, thiserror::Error)]
pub enum RuntimerError {
    #[error("Invalid video: {message}")]
    InvalidVideo { message: String },

    #[error("Failed to decode frame {frame}: {message}")]
    DecodeFrame { frame: u64, message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Font error: {message}")]
    Font { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using RuntimerError.
pub type RuntimerResult<T> = Result<T, RuntimerError>;

impl RuntimerError {
    pub fn invalid_video(msg: impl Into<String>) -> Self {
        Self::InvalidVideo {
            message: msg.into(),
        }
    }

    pub fn decode_frame(frame: u64, msg: impl Into<String>) -> Self {
        Self::DecodeFrame {
            frame,
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
