//! Codec library seam for the turnx compander.
//!
//! The compander never touches bitstream math itself. Everything it needs
//! from a codec library is expressed by three traits:
//!
//! - [`CodecLibrary`] creates decoder and encoder handles
//! - [`VideoDecoder`] turns one Annex B access unit into I420 planes
//! - [`VideoEncoder`] turns I420 planes back into an Annex B access unit
//!
//! Handles follow the native lifecycle of create, initialize, use,
//! uninitialize and destroy. Destroy is `Drop`.
//!
//! # Quick Start
//!
//! ```ignore
//! use turnx_codec::{CodecLibrary, DecoderConfig, EncoderConfig, Geometry, SourcePicture};
//! use turnx_codec::{VideoDecoder, VideoEncoder};
//!
//! let geometry = Geometry::new(176, 144);
//! let library = turnx_codec::openh264::OpenH264Library::new();
//!
//! let mut decoder = library.create_decoder()?;
//! decoder.initialize(&DecoderConfig::new(geometry))?;
//!
//! let mut encoder = library.create_encoder()?;
//! encoder.initialize(&EncoderConfig::new(geometry))?;
//!
//! let picture = decoder.decode(&access_unit)?;
//! let source = SourcePicture::i420(geometry, &picture.planes)?;
//! let packet = encoder.encode(&source)?;
//! ```
//!
//! # Feature Flags
//!
//! - `openh264` - Enable the OpenH264 software backend

mod error;
mod frame;
mod traits;
mod types;

pub use error::CodecError;
pub use frame::{DecodedPicture, Planes, SourcePicture};
pub use traits::{CodecLibrary, EncodedPacket, VideoDecoder, VideoEncoder};
pub use types::{BitRate, BitstreamType, DecoderConfig, EncoderConfig, FrameRate, Geometry};

// OpenH264 backend
#[cfg(feature = "openh264")]
pub mod openh264;

#[cfg(feature = "openh264")]
pub use crate::openh264::OpenH264Library;
