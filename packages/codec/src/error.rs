//! Error types for codec library operations.

use thiserror::Error;

/// Errors reported by a codec library or one of its handles.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The library could not create a handle.
    #[error("failed to create {handle} handle: {reason}")]
    CreateFailed {
        handle: &'static str,
        reason: String,
    },

    /// The library rejected the initialization parameters.
    #[error("failed to initialize {handle}: {reason}")]
    InitializeFailed {
        handle: &'static str,
        reason: String,
    },

    /// A handle was used before `initialize` or after `uninitialize`.
    #[error("{0} not initialized")]
    NotInitialized(&'static str),

    /// The decoder consumed the input without producing a picture.
    #[error("decoder needs more input")]
    NeedMoreInput,

    /// Picture dimensions disagree with the configured geometry.
    #[error("invalid picture dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Invalid parameter passed to the library.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Only Annex B framing is accepted.
    #[error("unsupported bitstream type")]
    UnsupportedBitstream,

    /// Error reported by the native library.
    #[error("native codec error: {0}")]
    Native(String),
}

impl CodecError {
    /// Create a CreateFailed error for the given handle kind.
    pub fn create_failed(handle: &'static str, reason: impl Into<String>) -> Self {
        Self::CreateFailed {
            handle,
            reason: reason.into(),
        }
    }

    /// Create an InitializeFailed error for the given handle kind.
    pub fn initialize_failed(handle: &'static str, reason: impl Into<String>) -> Self {
        Self::InitializeFailed {
            handle,
            reason: reason.into(),
        }
    }

    /// Create an InvalidParam error with a message.
    pub fn invalid_param(msg: impl Into<String>) -> Self {
        Self::InvalidParam(msg.into())
    }

    /// Create a Native error with a message.
    pub fn native(msg: impl Into<String>) -> Self {
        Self::Native(msg.into())
    }
}
