//! C-compatible boundary.
//!
//! Everything here uses flat numeric types and raw buffer pointers only.
//! Every entry point catches panics and maps every failure to a [`Status`]
//! so nothing unwinds into the caller.
//!
//! # Ownership
//!
//! - `push` copies the encoded bytes. The caller keeps its descriptor and
//!   buffer and may free them as soon as `push` returns.
//! - `pop` hands out a descriptor allocated here. The caller owns it and
//!   must give it back with `turnx_h264_frame_release`.
//!
//! # Threading
//!
//! The exported functions share one session slot behind a lock, but the
//! session itself is a single-stream pipeline. Callers wanting concurrency
//! should dedicate one worker to it.

use std::any::Any;
use std::mem::{align_of, size_of};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::sync::{Mutex, MutexGuard};

use turnx_codec::{BitRate, CodecLibrary};

use crate::{Error, Frame, FramePayload, Result, SessionManager};

/// Payload of a boundary descriptor. `RawFrame::is_encoded` selects the arm.
#[repr(C)]
#[derive(Clone, Copy)]
pub union RawPayload {
    /// Encoded access unit; `item_count` bytes long.
    pub buf: *mut u8,
    /// Y, U and V planes; strides follow the session geometry.
    pub data: [*mut u8; 3],
}

/// Flat frame descriptor exchanged across the boundary.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RawFrame {
    pub payload: RawPayload,
    /// Discriminant for `payload`.
    pub is_encoded: bool,
    /// Byte length of `payload.buf`. Unused for raw frames.
    pub item_count: i32,
}

// The record must stay plain and match the C declaration.
const _: () = {
    assert!(size_of::<RawPayload>() == size_of::<[*mut u8; 3]>());
    assert!(size_of::<RawFrame>() == size_of::<[*mut u8; 3]>() + 2 * size_of::<i32>());
    assert!(align_of::<RawFrame>() == align_of::<*mut u8>());
};

impl RawFrame {
    /// An encoded descriptor borrowing `buf`.
    pub fn encoded(buf: *mut u8, item_count: i32) -> Self {
        Self {
            payload: RawPayload { buf },
            is_encoded: true,
            item_count,
        }
    }

    /// A raw-planes descriptor borrowing `data`.
    pub fn raw(data: [*mut u8; 3]) -> Self {
        Self {
            payload: RawPayload { data },
            is_encoded: false,
            item_count: 0,
        }
    }

    /// Copy an encoded descriptor into an owned [`Frame`].
    ///
    /// The discriminant is checked before the union is read.
    ///
    /// # Safety
    ///
    /// `frame` must be null or point to a readable `RawFrame`. If it is
    /// encoded, `payload.buf` must be null or valid for `item_count` bytes.
    pub unsafe fn to_frame(frame: *const RawFrame) -> Result<Frame> {
        let frame = frame.as_ref().ok_or(Error::NullPointer("frame"))?;
        if !frame.is_encoded {
            return Err(Error::ExpectedEncodedFrame);
        }
        let len = usize::try_from(frame.item_count)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                Error::invalid_descriptor(format!("item_count {} is not positive", frame.item_count))
            })?;
        let buf = frame.payload.buf;
        if buf.is_null() {
            return Err(Error::NullPointer("frame buffer"));
        }
        Ok(Frame::encoded(std::slice::from_raw_parts(buf, len).to_vec()))
    }

    /// Move an encoded [`Frame`] into a heap descriptor owned by the caller.
    pub fn from_frame(frame: Frame) -> Result<*mut RawFrame> {
        let data = match frame.into_payload() {
            FramePayload::Encoded(data) => data,
            FramePayload::Raw(_) => return Err(Error::ExpectedEncodedFrame),
        };
        let item_count = i32::try_from(data.len()).map_err(|_| {
            Error::invalid_descriptor(format!("{} bytes do not fit item_count", data.len()))
        })?;
        let buf = Box::into_raw(data.into_boxed_slice()).cast::<u8>();
        Ok(Box::into_raw(Box::new(RawFrame::encoded(buf, item_count))))
    }

    /// Free a descriptor produced by [`RawFrame::from_frame`].
    ///
    /// # Safety
    ///
    /// `frame` must be null or a pointer returned by `from_frame` that has
    /// not been released yet.
    pub unsafe fn release(frame: *mut RawFrame) {
        if frame.is_null() {
            return;
        }
        let frame = Box::from_raw(frame);
        if frame.is_encoded && !frame.payload.buf.is_null() {
            let len = frame.item_count as usize;
            drop(Box::from_raw(ptr::slice_from_raw_parts_mut(
                frame.payload.buf,
                len,
            )));
        }
    }
}

/// Result code of every boundary operation.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok = 0,
    AlreadyInitialized = -1,
    NotInitialized = -2,
    DecoderCreateFailed = -3,
    DecoderInitFailed = -4,
    EncoderCreateFailed = -5,
    EncoderInitFailed = -6,
    ExpectedEncodedFrame = -7,
    QueueEmpty = -8,
    CorruptQueueState = -9,
    DecodeFailed = -10,
    EncodeFailed = -11,
    InvalidConfig = -12,
    ReconfigureFailed = -13,
    NullPointer = -14,
    InvalidDescriptor = -15,
    Panicked = -16,
}

impl From<&Error> for Status {
    fn from(err: &Error) -> Self {
        match err {
            Error::AlreadyInitialized => Self::AlreadyInitialized,
            Error::NotInitialized => Self::NotInitialized,
            Error::InvalidConfig(_) => Self::InvalidConfig,
            Error::DecoderCreateFailed(_) => Self::DecoderCreateFailed,
            Error::DecoderInitFailed(_) => Self::DecoderInitFailed,
            Error::EncoderCreateFailed(_) => Self::EncoderCreateFailed,
            Error::EncoderInitFailed(_) => Self::EncoderInitFailed,
            Error::ExpectedEncodedFrame => Self::ExpectedEncodedFrame,
            Error::QueueEmpty => Self::QueueEmpty,
            Error::CorruptQueueState => Self::CorruptQueueState,
            Error::DecodeFailed(_) => Self::DecodeFailed,
            Error::EncodeFailed(_) => Self::EncodeFailed,
            Error::ReconfigureFailed(_) => Self::ReconfigureFailed,
            Error::NullPointer(_) => Self::NullPointer,
            Error::InvalidDescriptor(_) => Self::InvalidDescriptor,
            Error::Panicked(_) => Self::Panicked,
        }
    }
}

/// Snapshot of the live session, filled by `turnx_h264_status`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStatus {
    /// Target bitrate in bits per second.
    pub bitrate: u32,
    /// Frames waiting in the queue.
    pub queued: usize,
    pub frames_in: u64,
    pub frames_out: u64,
    pub frames_dropped: u64,
}

/// One session slot guarded for use from `extern "C"` functions.
pub struct Boundary<L: CodecLibrary> {
    manager: Mutex<SessionManager<L>>,
}

impl<L: CodecLibrary> Boundary<L> {
    pub const fn new(library: L) -> Self {
        Self {
            manager: Mutex::new(SessionManager::new(library)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionManager<L>> {
        // A caught panic poisons the lock; the manager is still consistent.
        self.manager.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `op` against the manager, converting errors and panics to a status.
    fn call<F>(&self, name: &'static str, op: F) -> Status
    where
        F: FnOnce(&mut SessionManager<L>) -> Result<()>,
    {
        let result = panic::catch_unwind(AssertUnwindSafe(|| op(&mut self.lock())))
            .unwrap_or_else(|payload| Err(Error::Panicked(panic_message(payload))));

        match result {
            Ok(()) => Status::Ok,
            Err(e) => {
                let status = Status::from(&e);
                if matches!(e, Error::Panicked(_)) {
                    tracing::error!(op = name, error = %e, "boundary call panicked");
                } else {
                    tracing::debug!(op = name, error = %e, ?status, "boundary call failed");
                }
                status
            }
        }
    }

    pub fn start(&self, width: u16, height: u16) -> Status {
        self.call("start", |m| m.start(width, height))
    }

    pub fn stop(&self) -> Status {
        self.call("stop", |m| m.stop())
    }

    /// # Safety
    ///
    /// See [`RawFrame::to_frame`].
    pub unsafe fn push(&self, frame: *const RawFrame) -> Status {
        self.call("push", |m| {
            m.session()?;
            m.push(RawFrame::to_frame(frame)?)
        })
    }

    /// # Safety
    ///
    /// `out` must be null or valid for a pointer write.
    pub unsafe fn pop(&self, out: *mut *mut RawFrame) -> Status {
        self.call("pop", |m| {
            if out.is_null() {
                return Err(Error::NullPointer("out"));
            }
            let frame = RawFrame::from_frame(m.pop()?)?;
            out.write(frame);
            Ok(())
        })
    }

    /// Queued frame count; 0 when no session is live.
    pub fn size(&self) -> usize {
        let mut size = 0;
        self.call("size", |m| {
            size = m.size()?;
            Ok(())
        });
        size
    }

    pub fn set_bitrate(&self, bps: u32) -> Status {
        self.call("set_bitrate", |m| m.set_bitrate(BitRate::from_bps(bps)))
    }

    /// # Safety
    ///
    /// `out` must be null or valid for a `SessionStatus` write.
    pub unsafe fn status(&self, out: *mut SessionStatus) -> Status {
        self.call("status", |m| {
            if out.is_null() {
                return Err(Error::NullPointer("out"));
            }
            let session = m.session()?;
            let stats = session.stats();
            out.write(SessionStatus {
                bitrate: session.bitrate().as_bps(),
                queued: session.size(),
                frames_in: stats.frames_in,
                frames_out: stats.frames_out,
                frames_dropped: stats.frames_dropped,
            });
            Ok(())
        })
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Install the `RUST_LOG`-driven log subscriber. Returns 0 on first install,
/// 1 if a subscriber was already set.
#[no_mangle]
pub extern "C" fn turnx_h264_init_logging() -> i32 {
    i32::from(!crate::init_logging())
}

#[cfg(feature = "openh264")]
mod exports {
    use turnx_codec::OpenH264Library;

    use super::{Boundary, RawFrame, SessionStatus, Status};

    static BOUNDARY: Boundary<OpenH264Library> = Boundary::new(OpenH264Library::new());

    #[no_mangle]
    pub extern "C" fn turnx_h264_start(width: u16, height: u16) -> Status {
        BOUNDARY.start(width, height)
    }

    #[no_mangle]
    pub extern "C" fn turnx_h264_stop() -> Status {
        BOUNDARY.stop()
    }

    /// # Safety
    ///
    /// `frame` must be null or point to a readable descriptor whose encoded
    /// buffer holds `item_count` bytes.
    #[no_mangle]
    pub unsafe extern "C" fn turnx_h264_push(frame: *const RawFrame) -> Status {
        BOUNDARY.push(frame)
    }

    /// # Safety
    ///
    /// `out` must be null or valid for a pointer write.
    #[no_mangle]
    pub unsafe extern "C" fn turnx_h264_pop(out: *mut *mut RawFrame) -> Status {
        BOUNDARY.pop(out)
    }

    #[no_mangle]
    pub extern "C" fn turnx_h264_size() -> usize {
        BOUNDARY.size()
    }

    /// Change the target bitrate, in bits per second.
    #[no_mangle]
    pub extern "C" fn turnx_h264_set_bitrate(bps: u32) -> Status {
        BOUNDARY.set_bitrate(bps)
    }

    /// # Safety
    ///
    /// `out` must be null or valid for a `SessionStatus` write.
    #[no_mangle]
    pub unsafe extern "C" fn turnx_h264_status(out: *mut SessionStatus) -> Status {
        BOUNDARY.status(out)
    }

    /// # Safety
    ///
    /// `frame` must be null or a descriptor returned by `turnx_h264_pop`
    /// that has not been released yet.
    #[no_mangle]
    pub unsafe extern "C" fn turnx_h264_frame_release(frame: *mut RawFrame) {
        RawFrame::release(frame)
    }
}
