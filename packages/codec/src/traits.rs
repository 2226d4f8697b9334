//! Core traits for the external codec library.

use crate::{BitRate, CodecError, DecodedPicture, DecoderConfig, EncoderConfig, SourcePicture};

/// Result of encoding a picture.
#[derive(Debug, Clone)]
pub struct EncodedPacket {
    /// Encoded bitstream data (Annex B NAL units).
    pub data: Vec<u8>,
    /// Frame index (monotonically increasing per encoder).
    pub frame_index: u64,
}

impl EncodedPacket {
    /// Create a new encoded packet.
    #[must_use]
    pub fn new(data: Vec<u8>, frame_index: u64) -> Self {
        Self { data, frame_index }
    }

    /// Length of the bitstream in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the encoder produced no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A codec library able to hand out decoder and encoder handles.
///
/// Handles are created uninitialized. Dropping a handle destroys it.
pub trait CodecLibrary {
    /// Decoder handle type.
    type Decoder: VideoDecoder;
    /// Encoder handle type.
    type Encoder: VideoEncoder;

    /// Create a decoder handle.
    fn create_decoder(&self) -> Result<Self::Decoder, CodecError>;

    /// Create an encoder handle.
    fn create_encoder(&self) -> Result<Self::Encoder, CodecError>;
}

/// Trait for video decoders.
///
/// # Example
///
/// ```ignore
/// let mut decoder = library.create_decoder()?;
/// decoder.initialize(&DecoderConfig::new(Geometry::new(176, 144)))?;
///
/// let picture = decoder.decode(&access_unit)?;
/// decoder.uninitialize();
/// ```
pub trait VideoDecoder: Send {
    /// Initialize the handle. Must be called exactly once before `decode`.
    fn initialize(&mut self, config: &DecoderConfig) -> Result<(), CodecError>;

    /// Decode one encoded access unit into I420 planes.
    ///
    /// Returns `CodecError::NeedMoreInput` if the unit was consumed without
    /// producing a picture (e.g. parameter sets only).
    fn decode(&mut self, bitstream: &[u8]) -> Result<DecodedPicture, CodecError>;

    /// Release the native decoding state. Safe to call more than once.
    fn uninitialize(&mut self);
}

/// Trait for video encoders.
///
/// # Example
///
/// ```ignore
/// let mut encoder = library.create_encoder()?;
/// encoder.initialize(&EncoderConfig::new(geometry).bitrate(BitRate::from_kbps(500)))?;
///
/// let packet = encoder.encode(&SourcePicture::i420(geometry, &planes)?)?;
/// // packet.data contains H.264 NAL units
/// ```
pub trait VideoEncoder: Send {
    /// Initialize the handle. Must be called exactly once before `encode`.
    fn initialize(&mut self, config: &EncoderConfig) -> Result<(), CodecError>;

    /// Encode one picture.
    fn encode(&mut self, picture: &SourcePicture<'_>) -> Result<EncodedPacket, CodecError>;

    /// Change the target bitrate of an initialized encoder.
    fn set_bitrate(&mut self, bitrate: BitRate) -> Result<(), CodecError>;

    /// Release the native encoding state. Safe to call more than once.
    fn uninitialize(&mut self);
}
