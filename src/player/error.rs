use rodio::decoder::DecoderError;
use thiserror::Error;

use crate::http::FetchError;

/// Media failures classified for diagnostics. The player never retries on
/// its own; the error sits in the widget state until the next load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("playback aborted")]
    Aborted,

    #[error("network failure: {0}")]
    Network(String),

    #[error("decode failure: {0}")]
    Decode(String),

    #[error("unsupported format: {0}")]
    Unsupported(String),
}

impl PlaybackError {
    pub fn kind(&self) -> &'static str {
        match self {
            PlaybackError::Aborted => "aborted",
            PlaybackError::Network(_) => "network",
            PlaybackError::Decode(_) => "decode",
            PlaybackError::Unsupported(_) => "unsupported",
        }
    }
}

impl From<FetchError> for PlaybackError {
    fn from(err: FetchError) -> Self {
        PlaybackError::Network(err.to_string())
    }
}

impl From<DecoderError> for PlaybackError {
    fn from(err: DecoderError) -> Self {
        match err {
            DecoderError::UnrecognizedFormat => {
                PlaybackError::Unsupported(err.to_string())
            }
            other => PlaybackError::Decode(other.to_string()),
        }
    }
}
