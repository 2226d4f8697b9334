//! Session configuration.

use turnx_codec::{BitRate, DecoderConfig, EncoderConfig, FrameRate, Geometry};

use crate::{Error, Result};

/// Builder-style configuration for a compander session.
///
/// Geometry is fixed for the lifetime of the session; the bitrate can be
/// changed later with [`CodecSession::set_bitrate`](crate::CodecSession::set_bitrate).
///
/// ```
/// use turnx::SessionConfig;
/// use turnx_codec::BitRate;
///
/// let config = SessionConfig::new(176, 144).bitrate(BitRate::from_kbps(300));
/// assert_eq!(config.bitrate_bps(), 300_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    geometry: Geometry,
    bitrate: BitRate,
    frame_rate: FrameRate,
}

impl SessionConfig {
    /// Create a configuration with default bitrate (500 kbps) and 30 fps.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            geometry: Geometry::new(width, height),
            bitrate: BitRate::default(),
            frame_rate: FrameRate::default(),
        }
    }

    /// Set the target bitrate.
    pub fn bitrate(mut self, bitrate: BitRate) -> Self {
        self.bitrate = bitrate;
        self
    }

    /// Set the frame rate.
    pub fn frame_rate(mut self, frame_rate: FrameRate) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn bitrate_bps(&self) -> u32 {
        self.bitrate.as_bps()
    }

    pub fn frame_rate_fps(&self) -> u32 {
        self.frame_rate.as_fps()
    }

    /// Reject configurations no codec can be initialized with.
    pub fn validate(&self) -> Result<()> {
        if self.geometry.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "picture geometry {} has a zero dimension",
                self.geometry
            )));
        }
        if self.bitrate.as_bps() == 0 {
            return Err(Error::InvalidConfig("bitrate must be non-zero".into()));
        }
        if self.frame_rate.as_fps() == 0 {
            return Err(Error::InvalidConfig("frame rate must be non-zero".into()));
        }
        Ok(())
    }

    /// Decoder parameters: Annex B input at the session geometry.
    pub fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig::new(self.geometry)
    }

    /// Encoder parameters. Width maps to picture width, height to picture height.
    pub fn encoder_config(&self) -> EncoderConfig {
        EncoderConfig::new(self.geometry)
            .bitrate(self.bitrate)
            .frame_rate(self.frame_rate)
    }
}
