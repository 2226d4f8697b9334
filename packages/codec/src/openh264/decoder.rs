//! OpenH264 decoder implementation.

use openh264::decoder::{Decoder, DecoderConfig as NativeConfig};
use openh264::formats::YUVSource;
use openh264::OpenH264API;

use crate::{
    BitstreamType, CodecError, DecodedPicture, DecoderConfig, Geometry, Planes, VideoDecoder,
};

/// OpenH264 decoder handle.
///
/// Created holding the loaded API; the native decoder exists only between
/// `initialize` and `uninitialize`.
pub struct OpenH264Decoder {
    /// API waiting to be consumed by `initialize`.
    api: Option<OpenH264API>,
    /// Native decoder, present while initialized.
    inner: Option<Decoder>,
    /// Expected picture geometry.
    geometry: Geometry,
}

// SAFETY: the native decoder is only reached through `&mut self`, so it is
// never used from two threads at once.
unsafe impl Send for OpenH264Decoder {}

impl OpenH264Decoder {
    pub(crate) fn new() -> Self {
        Self {
            api: Some(OpenH264API::from_source()),
            inner: None,
            geometry: Geometry::default(),
        }
    }
}

impl VideoDecoder for OpenH264Decoder {
    fn initialize(&mut self, config: &DecoderConfig) -> Result<(), CodecError> {
        if config.bitstream != BitstreamType::AnnexB {
            return Err(CodecError::UnsupportedBitstream);
        }
        let api = self
            .api
            .take()
            .ok_or_else(|| CodecError::initialize_failed("decoder", "already initialized"))?;

        let decoder = Decoder::with_api_config(api, NativeConfig::new())
            .map_err(|e| CodecError::initialize_failed("decoder", e.to_string()))?;

        self.inner = Some(decoder);
        self.geometry = config.geometry;
        tracing::debug!(geometry = %self.geometry, "openh264 decoder initialized");
        Ok(())
    }

    fn decode(&mut self, bitstream: &[u8]) -> Result<DecodedPicture, CodecError> {
        let decoder = self
            .inner
            .as_mut()
            .ok_or(CodecError::NotInitialized("decoder"))?;

        let yuv = decoder
            .decode(bitstream)
            .map_err(|e| CodecError::native(e.to_string()))?
            .ok_or(CodecError::NeedMoreInput)?;

        let (width, height) = yuv.dimensions();
        if !self.geometry.matches(width as u32, height as u32) {
            return Err(CodecError::InvalidDimensions {
                width: width as u32,
                height: height as u32,
            });
        }

        // OpenH264 pads rows; repack to geometry-derived strides.
        let (y_stride, u_stride, v_stride) = yuv.strides();
        let planes = Planes::from_strided(
            self.geometry,
            [yuv.y(), yuv.u(), yuv.v()],
            [y_stride, u_stride, v_stride],
        )?;

        Ok(DecodedPicture::new(width as u32, height as u32, planes))
    }

    fn uninitialize(&mut self) {
        if self.inner.take().is_some() {
            tracing::debug!("openh264 decoder uninitialized");
        }
    }
}
