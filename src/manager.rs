//! Single-session lifecycle manager.
//!
//! [`CodecSession`] is an ordinary owned value, so any number of sessions
//! can coexist. The C boundary, however, has no handle to pass around; the
//! manager gives it exactly one session slot and enforces the
//! start/stop ordering on it.

use turnx_codec::{BitRate, CodecLibrary};

use crate::{CodecSession, Error, Frame, Result, SessionConfig, SessionStats};

/// Owns a codec library and at most one live session built from it.
pub struct SessionManager<L: CodecLibrary> {
    library: L,
    session: Option<CodecSession<L>>,
}

impl<L: CodecLibrary> SessionManager<L> {
    /// Create a manager with no live session.
    pub const fn new(library: L) -> Self {
        Self {
            library,
            session: None,
        }
    }

    /// Start a session with default bitrate and frame rate.
    pub fn start(&mut self, width: u16, height: u16) -> Result<()> {
        self.start_with(SessionConfig::new(width, height))
    }

    /// Start a session with an explicit configuration.
    ///
    /// # Errors
    ///
    /// `AlreadyInitialized` if a session is live. Construction failures
    /// leave the manager without a session.
    pub fn start_with(&mut self, config: SessionConfig) -> Result<()> {
        if self.session.is_some() {
            return Err(Error::AlreadyInitialized);
        }
        self.session = Some(CodecSession::start(&self.library, config)?);
        Ok(())
    }

    /// Stop the live session, releasing both codec handles.
    pub fn stop(&mut self) -> Result<()> {
        self.session.take().ok_or(Error::NotInitialized)?.stop();
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn push(&mut self, frame: Frame) -> Result<()> {
        self.session_mut()?.push(frame)
    }

    pub fn pop(&mut self) -> Result<Frame> {
        self.session_mut()?.pop()
    }

    pub fn size(&self) -> Result<usize> {
        Ok(self.session()?.size())
    }

    pub fn set_bitrate(&mut self, bitrate: BitRate) -> Result<()> {
        self.session_mut()?.set_bitrate(bitrate)
    }

    pub fn bitrate(&self) -> Result<BitRate> {
        Ok(self.session()?.bitrate())
    }

    pub fn stats(&self) -> Result<SessionStats> {
        Ok(self.session()?.stats())
    }

    /// Borrow the live session.
    pub fn session(&self) -> Result<&CodecSession<L>> {
        self.session.as_ref().ok_or(Error::NotInitialized)
    }

    /// Mutably borrow the live session.
    pub fn session_mut(&mut self) -> Result<&mut CodecSession<L>> {
        self.session.as_mut().ok_or(Error::NotInitialized)
    }
}
