//! OpenH264 encoder implementation.

use std::ffi::c_int;

use openh264::encoder::{Encoder, EncoderConfig as NativeConfig, RateControlMode};
use openh264::formats::YUVSlices;
use openh264::OpenH264API;
use openh264_sys2::{SBitrateInfo, ENCODER_OPTION_BITRATE, SPATIAL_LAYER_ALL};

use crate::{
    BitRate, CodecError, EncodedPacket, EncoderConfig, Geometry, SourcePicture, VideoEncoder,
};

/// OpenH264 encoder handle.
pub struct OpenH264Encoder {
    /// API waiting to be consumed by `initialize`.
    api: Option<OpenH264API>,
    /// Native encoder, present while initialized.
    inner: Option<Encoder>,
    /// Configured geometry.
    geometry: Geometry,
    /// Current frame index.
    frame_index: u64,
    /// Bitrate requested before the native encoder was set up.
    ///
    /// OpenH264 builds its encoder on the first `encode`, so options can
    /// only be applied after that.
    pending_bitrate: Option<BitRate>,
}

// SAFETY: the native encoder is only reached through `&mut self`, so it is
// never used from two threads at once.
unsafe impl Send for OpenH264Encoder {}

impl OpenH264Encoder {
    pub(crate) fn new() -> Self {
        Self {
            api: Some(OpenH264API::from_source()),
            inner: None,
            geometry: Geometry::default(),
            frame_index: 0,
            pending_bitrate: None,
        }
    }

    fn apply_bitrate(encoder: &mut Encoder, bitrate: BitRate) -> Result<(), CodecError> {
        let bps = c_int::try_from(bitrate.as_bps())
            .map_err(|_| CodecError::invalid_param(format!("bitrate {} out of range", bitrate)))?;
        let mut info = SBitrateInfo {
            iLayer: SPATIAL_LAYER_ALL,
            iBitrate: bps,
        };

        // SAFETY: the native encoder has encoded at least one frame, so it is
        // initialized, and `info` outlives the call.
        let status = unsafe {
            encoder
                .raw_api()
                .set_option(ENCODER_OPTION_BITRATE, std::ptr::addr_of_mut!(info).cast())
        };
        if status != 0 {
            return Err(CodecError::native(format!(
                "set bitrate option returned {}",
                status
            )));
        }
        Ok(())
    }
}

impl VideoEncoder for OpenH264Encoder {
    fn initialize(&mut self, config: &EncoderConfig) -> Result<(), CodecError> {
        if config.geometry.is_empty() {
            return Err(CodecError::InvalidDimensions {
                width: config.geometry.width().into(),
                height: config.geometry.height().into(),
            });
        }
        let api = self
            .api
            .take()
            .ok_or_else(|| CodecError::initialize_failed("encoder", "already initialized"))?;

        let native = NativeConfig::new()
            .set_bitrate_bps(config.bitrate.as_bps())
            .max_frame_rate(config.frame_rate.as_fps() as f32)
            .rate_control_mode(RateControlMode::Bitrate);

        let encoder = Encoder::with_api_config(api, native)
            .map_err(|e| CodecError::initialize_failed("encoder", e.to_string()))?;

        self.inner = Some(encoder);
        self.geometry = config.geometry;
        self.frame_index = 0;
        self.pending_bitrate = None;
        tracing::debug!(
            geometry = %self.geometry,
            bitrate_bps = config.bitrate.as_bps(),
            fps = config.frame_rate.as_fps(),
            "openh264 encoder initialized"
        );
        Ok(())
    }

    fn encode(&mut self, picture: &SourcePicture<'_>) -> Result<EncodedPacket, CodecError> {
        let encoder = self
            .inner
            .as_mut()
            .ok_or(CodecError::NotInitialized("encoder"))?;

        let geometry = picture.geometry();
        if geometry != self.geometry {
            return Err(CodecError::InvalidDimensions {
                width: geometry.width().into(),
                height: geometry.height().into(),
            });
        }

        let [y_stride, u_stride, v_stride] = picture.strides();
        let yuv = YUVSlices::new(
            (picture.y(), picture.u(), picture.v()),
            (geometry.width() as usize, geometry.height() as usize),
            (y_stride, u_stride, v_stride),
        );

        let bitstream = encoder
            .encode(&yuv)
            .map_err(|e| CodecError::native(e.to_string()))?;
        let data = bitstream.to_vec();

        if let Some(bitrate) = self.pending_bitrate.take() {
            match Self::apply_bitrate(encoder, bitrate) {
                Ok(()) => tracing::debug!(bitrate_bps = bitrate.as_bps(), "pending bitrate applied"),
                Err(e) => tracing::warn!(error = %e, "pending bitrate rejected"),
            }
        }

        let frame_index = self.frame_index;
        self.frame_index += 1;
        Ok(EncodedPacket::new(data, frame_index))
    }

    fn set_bitrate(&mut self, bitrate: BitRate) -> Result<(), CodecError> {
        let encoder = self
            .inner
            .as_mut()
            .ok_or(CodecError::NotInitialized("encoder"))?;

        if self.frame_index == 0 {
            c_int::try_from(bitrate.as_bps()).map_err(|_| {
                CodecError::invalid_param(format!("bitrate {} out of range", bitrate))
            })?;
            self.pending_bitrate = Some(bitrate);
            return Ok(());
        }
        Self::apply_bitrate(encoder, bitrate)
    }

    fn uninitialize(&mut self) {
        if self.inner.take().is_some() {
            tracing::debug!(frames = self.frame_index, "openh264 encoder uninitialized");
        }
    }
}
