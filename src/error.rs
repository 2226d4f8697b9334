//! Error taxonomy for compander sessions.

use thiserror::Error;
use turnx_codec::CodecError;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by session, queue and boundary operations.
#[derive(Debug, Error)]
pub enum Error {
    /// `start` while a session is live.
    #[error("session already initialized")]
    AlreadyInitialized,

    /// `stop`, `push`, `pop` or `size` without a live session.
    #[error("session not initialized")]
    NotInitialized,

    /// The session configuration is unusable.
    #[error("invalid session configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to create decoder")]
    DecoderCreateFailed(#[source] CodecError),

    #[error("failed to initialize decoder")]
    DecoderInitFailed(#[source] CodecError),

    #[error("failed to create encoder")]
    EncoderCreateFailed(#[source] CodecError),

    #[error("failed to initialize encoder")]
    EncoderInitFailed(#[source] CodecError),

    /// Only encoded frames may enter the pipeline.
    #[error("expected an encoded frame")]
    ExpectedEncodedFrame,

    /// `pop` with nothing queued.
    #[error("frame queue is empty")]
    QueueEmpty,

    /// A raw frame was found in the queue.
    #[error("frame queue holds a raw frame")]
    CorruptQueueState,

    /// The decoder rejected a frame. The frame is dropped.
    #[error("failed to decode frame")]
    DecodeFailed(#[source] CodecError),

    /// The encoder rejected a frame. The frame is dropped.
    #[error("failed to encode frame")]
    EncodeFailed(#[source] CodecError),

    /// The encoder refused a bitrate change.
    #[error("failed to reconfigure encoder")]
    ReconfigureFailed(#[source] CodecError),

    /// A null pointer crossed the boundary.
    #[error("null pointer passed for {0}")]
    NullPointer(&'static str),

    /// A descriptor's fields contradict each other.
    #[error("invalid frame descriptor: {0}")]
    InvalidDescriptor(String),

    /// A panic was caught before it could unwind across the boundary.
    #[error("panic caught at boundary: {0}")]
    Panicked(String),
}

impl Error {
    /// Create an InvalidDescriptor error with a message.
    pub fn invalid_descriptor(msg: impl Into<String>) -> Self {
        Self::InvalidDescriptor(msg.into())
    }

    /// Returns true for per-frame failures that leave the session usable.
    #[must_use]
    pub fn is_frame_error(&self) -> bool {
        matches!(self, Self::DecodeFailed(_) | Self::EncodeFailed(_))
    }
}
