//! Errors raised while building model values from untrusted input.

use std::path::PathBuf;

/// Errors that can occur when constructing model values.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid video: {message}")]
    InvalidVideo { message: String },

    #[error("Invalid {kind}: {value:?}")]
    Parse { kind: &'static str, value: String },

    #[error("Unusable font {name}: {message}")]
    Font { name: String, message: String },

    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ModelError {
    pub(crate) fn invalid_video(msg: impl Into<String>) -> Self {
        Self::InvalidVideo {
            message: msg.into(),
        }
    }

    pub(crate) fn parse(kind: &'static str, value: impl Into<String>) -> Self {
        Self::Parse {
            kind,
            value: value.into(),
        }
    }
}

impl From<ModelError> for runtimer_common::error::RuntimerError {
    fn from(err: ModelError) -> Self {
        use runtimer_common::error::RuntimerError;
        match err {
            ModelError::InvalidVideo { message } => RuntimerError::InvalidVideo { message },
            ModelError::Font { .. } => RuntimerError::font(err.to_string()),
            ModelError::IoError { path, source }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                RuntimerError::FileNotFound { path }
            }
            ModelError::IoError { source, .. } => RuntimerError::Io(source),
            ModelError::Parse { .. } => RuntimerError::config(err.to_string()),
        }
    }
}
