/*!
    Error types for the ffmpeg crate ecosystem.
*/

use thiserror::Error;

use crate::CodecKind;

/**
    Error type for the ffmpeg crate ecosystem.

    Native FFmpeg error codes are translated into messages once, at the
    boundary where they are returned, so every variant here carries
    human-readable text rather than raw codes.
*/
#[derive(Debug, Error)]
pub enum Error {
    /// The demuxer could not open or probe the resource.
    #[error("failed to open {path}: {message}")]
    Open { path: String, message: String },
    /// No codec with the given name is registered.
    #[error("unable to find {kind} {name}")]
    CodecNotFound { kind: CodecKind, name: String },
    /// A stream index outside of the opened container.
    #[error("no stream with index {index}")]
    StreamNotFound { index: usize },
    /// Codec error (decode failure)
    #[error("codec error: {message}")]
    Codec { message: String },
    /// Invalid data (malformed input)
    #[error("invalid data: {message}")]
    InvalidData { message: String },
    /// Unsupported format (valid but not handled)
    #[error("unsupported format: {message}")]
    UnsupportedFormat { message: String },
}

impl Error {
    /**
        Create an open error for the given resource.
    */
    pub fn open(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Open {
            path: path.into(),
            message: message.into(),
        }
    }

    /**
        Create a codec error with the given message.
    */
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /**
        Create an invalid data error with the given message.
    */
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /**
        Create an unsupported format error with the given message.
    */
    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            message: message.into(),
        }
    }
}

/**
    Result type alias for the ffmpeg crate ecosystem.
*/
pub type Result<T> = std::result::Result<T, Error>;

/// Error returned by `FromStr` implementations on enum types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
}
