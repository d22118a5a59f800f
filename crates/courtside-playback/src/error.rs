//! Playback error types.

use thiserror::Error;

pub type PlaybackResult<T> = Result<T, PlaybackError>;

#[derive(Debug, Error, PartialEq)]
pub enum PlaybackError {
    #[error("No shot at index {index} (session has {count} shots)")]
    UnknownShot { index: usize, count: usize },

    #[error("Playback session is closed")]
    SessionClosed,
}
