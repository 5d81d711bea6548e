//! Error types for signal construction, decoding and output.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, decoding or rendering signals.
#[derive(Debug, Error)]
pub enum Error {
    /// A signal could not be constructed from its arguments.
    #[error("invalid signal: {0}")]
    InvalidSignal(String),

    /// A malformed specification was passed to a combinator or generator.
    #[error("invalid spec: {0}")]
    InvalidSpec(String),

    /// Signals with incompatible channel counts were combined.
    #[error("channel mismatch: expected {expected} channels, found {found}")]
    ChannelMismatch {
        /// Channel count the operation required.
        expected: usize,
        /// Channel count that was supplied.
        found: usize,
    },

    /// Stereo coercion was requested for a signal that is neither mono nor stereo.
    #[error("unsupported channel count: {0}")]
    UnsupportedChannelCount(usize),

    /// The underlying container could not be opened or decoded.
    #[error("decode failure: {0}")]
    DecodeFailure(String),

    /// A forward read or discard on a decode stream came up short.
    #[error("stream exhausted: requested {requested} frames, got {available}")]
    StreamExhausted {
        /// Frames the window wanted to read or skip.
        requested: u64,
        /// Frames the stream actually produced.
        available: u64,
    },

    /// The audio output device reported an error.
    #[error("audio device error: {0}")]
    Device(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// WAV container error.
    #[cfg(feature = "wav")]
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

impl Error {
    /// Creates a channel mismatch error.
    pub fn channel_mismatch(expected: usize, found: usize) -> Self {
        Self::ChannelMismatch { expected, found }
    }

    /// Creates an invalid spec error.
    pub fn invalid_spec(message: impl Into<String>) -> Self {
        Self::InvalidSpec(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_mismatch_message() {
        let err = Error::channel_mismatch(2, 1);
        assert_eq!(
            err.to_string(),
            "channel mismatch: expected 2 channels, found 1"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
