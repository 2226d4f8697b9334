//! turnx - H.264 compander session.
//!
//! A session owns a paired decoder/encoder. Encoded frames are pushed in,
//! and each `pop` decodes the oldest one to I420 planes and immediately
//! re-encodes those planes at the session's bitrate. Callers only ever see
//! encoded frames; raw planes never leave the session.
//!
//! # Quick Start
//!
//! ```ignore
//! use turnx::{CodecSession, Frame, SessionConfig};
//! use turnx_codec::{BitRate, OpenH264Library};
//!
//! let config = SessionConfig::new(176, 144).bitrate(BitRate::from_kbps(300));
//! let mut session = CodecSession::start(&OpenH264Library::new(), config)?;
//!
//! session.push(Frame::encoded(access_unit))?;
//! let reencoded = session.pop()?;
//! assert!(reencoded.is_encoded());
//!
//! session.stop();
//! ```
//!
//! # C boundary
//!
//! The [`ffi`] module exports `turnx_h264_start`, `turnx_h264_stop`,
//! `turnx_h264_push`, `turnx_h264_pop`, `turnx_h264_size` and a few
//! companions over a single process-wide session. The symbols are built
//! with the `openh264` feature.
//!
//! # Feature Flags
//!
//! - `openh264` - Use OpenH264 as the codec library and export the C symbols

mod config;
mod error;
pub mod ffi;
mod frame;
mod manager;
mod queue;
mod session;

pub use config::SessionConfig;
pub use error::{Error, Result};
pub use frame::{Frame, FramePayload};
pub use manager::SessionManager;
pub use queue::FrameQueue;
pub use session::{CodecSession, SessionStats};

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Returns false if a global subscriber was already installed.
pub fn init_logging() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .is_ok()
}
