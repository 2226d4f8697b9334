//! OpenH264 software codec implementation.
//!
//! This module backs the codec seam with Cisco's OpenH264, built from
//! source by the `openh264` crate. It runs everywhere and needs no GPU.
//!
//! # Example
//!
//! ```ignore
//! use turnx_codec::{CodecLibrary, DecoderConfig, Geometry, OpenH264Library, VideoDecoder};
//!
//! let library = OpenH264Library::new();
//! let mut decoder = library.create_decoder()?;
//! decoder.initialize(&DecoderConfig::new(Geometry::new(176, 144)))?;
//!
//! let picture = decoder.decode(&access_unit)?;
//! ```

mod decoder;
mod encoder;

pub use decoder::OpenH264Decoder;
pub use encoder::OpenH264Encoder;

use crate::{CodecError, CodecLibrary};

/// Codec library backed by OpenH264.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenH264Library;

impl OpenH264Library {
    /// Create a new library handle.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CodecLibrary for OpenH264Library {
    type Decoder = OpenH264Decoder;
    type Encoder = OpenH264Encoder;

    fn create_decoder(&self) -> Result<Self::Decoder, CodecError> {
        Ok(OpenH264Decoder::new())
    }

    fn create_encoder(&self) -> Result<Self::Encoder, CodecError> {
        Ok(OpenH264Encoder::new())
    }
}
