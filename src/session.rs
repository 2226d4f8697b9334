//! Codec session: a paired decoder/encoder driving the compander transform.
//!
//! A session owns one decoder handle, one encoder handle and the frame
//! queue. Handles are acquired all-or-nothing in [`CodecSession::start`] and
//! released unconditionally when the session is dropped: the encoder is
//! uninitialized and destroyed first, the decoder last.
//!
//! Sessions are not synchronized. Callers that share one between threads
//! must serialize every call themselves.

use turnx_codec::{
    BitRate, CodecError, CodecLibrary, Geometry, SourcePicture, VideoDecoder, VideoEncoder,
};

use crate::{Error, Frame, FramePayload, FrameQueue, Result, SessionConfig};

/// Frame counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Frames accepted by `push`.
    pub frames_in: u64,
    /// Frames returned by `pop`.
    pub frames_out: u64,
    /// Frames dequeued but dropped by a failed transform.
    pub frames_dropped: u64,
}

/// Initialized decoder; uninitializes on drop, then the handle is destroyed.
struct DecoderGuard<D: VideoDecoder>(D);

impl<D: VideoDecoder> Drop for DecoderGuard<D> {
    fn drop(&mut self) {
        self.0.uninitialize();
    }
}

/// Initialized encoder; uninitializes on drop, then the handle is destroyed.
struct EncoderGuard<E: VideoEncoder>(E);

impl<E: VideoEncoder> Drop for EncoderGuard<E> {
    fn drop(&mut self) {
        self.0.uninitialize();
    }
}

/// A live compander session.
///
/// ```ignore
/// let mut session = CodecSession::start(&library, SessionConfig::new(176, 144))?;
/// session.push(Frame::encoded(access_unit))?;
/// let reencoded = session.pop()?;
/// session.stop();
/// ```
pub struct CodecSession<L: CodecLibrary> {
    // Field order is teardown order: encoder before decoder.
    encoder: EncoderGuard<L::Encoder>,
    decoder: DecoderGuard<L::Decoder>,
    queue: FrameQueue,
    geometry: Geometry,
    bitrate: BitRate,
    stats: SessionStats,
}

impl<L: CodecLibrary> CodecSession<L> {
    /// Create and initialize both handles.
    ///
    /// The decoder is created and initialized first, then the encoder. If
    /// any step fails, every handle acquired so far is released before the
    /// error is returned.
    pub fn start(library: &L, config: SessionConfig) -> Result<Self> {
        config.validate()?;

        let mut decoder = library.create_decoder().map_err(Error::DecoderCreateFailed)?;
        decoder
            .initialize(&config.decoder_config())
            .map_err(Error::DecoderInitFailed)?;
        let decoder = DecoderGuard(decoder);

        let mut encoder = library.create_encoder().map_err(Error::EncoderCreateFailed)?;
        encoder
            .initialize(&config.encoder_config())
            .map_err(Error::EncoderInitFailed)?;
        let encoder = EncoderGuard(encoder);

        let geometry = config.geometry();
        tracing::info!(
            width = geometry.width(),
            height = geometry.height(),
            bitrate_bps = config.bitrate_bps(),
            fps = config.frame_rate_fps(),
            "compander session started"
        );

        Ok(Self {
            encoder,
            decoder,
            queue: FrameQueue::new(),
            geometry,
            bitrate: config.encoder_config().bitrate,
            stats: SessionStats::default(),
        })
    }

    /// Tear the session down. Equivalent to dropping it.
    pub fn stop(self) {}

    /// Queue an encoded frame for transformation.
    pub fn push(&mut self, frame: Frame) -> Result<()> {
        let bytes = frame.item_count();
        self.queue.push(frame)?;
        self.stats.frames_in += 1;
        tracing::debug!(bytes, queued = self.queue.len(), "frame pushed");
        Ok(())
    }

    /// Dequeue the oldest frame, decode it and re-encode it.
    ///
    /// The dequeued frame is consumed whether or not the transform succeeds;
    /// failed frames are dropped, never requeued.
    pub fn pop(&mut self) -> Result<Frame> {
        let frame = self.queue.pop()?;
        // Counted as dropped until the transform hands back a frame.
        self.stats.frames_dropped += 1;

        match self.transform(frame) {
            Ok(out) => {
                self.stats.frames_dropped -= 1;
                self.stats.frames_out += 1;
                tracing::debug!(
                    bytes = out.item_count(),
                    queued = self.queue.len(),
                    "frame popped"
                );
                Ok(out)
            }
            Err(e) => {
                tracing::warn!(error = %e, queued = self.queue.len(), "frame dropped");
                Err(e)
            }
        }
    }

    fn transform(&mut self, frame: Frame) -> Result<Frame> {
        let bitstream = match frame.into_payload() {
            FramePayload::Encoded(data) => data,
            FramePayload::Raw(_) => return Err(Error::CorruptQueueState),
        };

        let picture = self
            .decoder
            .0
            .decode(&bitstream)
            .map_err(Error::DecodeFailed)?;
        if !self.geometry.matches(picture.width, picture.height) {
            return Err(Error::DecodeFailed(CodecError::InvalidDimensions {
                width: picture.width,
                height: picture.height,
            }));
        }

        let source =
            SourcePicture::i420(self.geometry, &picture.planes).map_err(Error::DecodeFailed)?;

        let packet = self.encoder.0.encode(&source).map_err(Error::EncodeFailed)?;
        if packet.is_empty() {
            return Err(Error::EncodeFailed(CodecError::native(
                "encoder produced no output",
            )));
        }
        tracing::trace!(
            frame_index = packet.frame_index,
            bytes = packet.len(),
            "frame re-encoded"
        );

        Ok(Frame::encoded(packet.data))
    }

    /// Number of frames waiting in the queue.
    pub fn size(&self) -> usize {
        self.queue.len()
    }

    /// Change the encoder's target bitrate.
    ///
    /// On failure the previous bitrate stays in effect.
    pub fn set_bitrate(&mut self, bitrate: BitRate) -> Result<()> {
        if bitrate.as_bps() == 0 {
            return Err(Error::InvalidConfig("bitrate must be non-zero".into()));
        }
        self.encoder
            .0
            .set_bitrate(bitrate)
            .map_err(Error::ReconfigureFailed)?;
        tracing::debug!(
            from_bps = self.bitrate.as_bps(),
            to_bps = bitrate.as_bps(),
            "bitrate changed"
        );
        self.bitrate = bitrate;
        Ok(())
    }

    pub fn bitrate(&self) -> BitRate {
        self.bitrate
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }
}

impl<L: CodecLibrary> Drop for CodecSession<L> {
    fn drop(&mut self) {
        let discarded = self.queue.clear();
        tracing::info!(
            discarded,
            frames_in = self.stats.frames_in,
            frames_out = self.stats.frames_out,
            frames_dropped = self.stats.frames_dropped,
            "compander session stopped"
        );
    }
}
