//! Core types for decoder and encoder configuration.

use std::fmt;

/// Default target bitrate: 500 kbps.
pub const DEFAULT_BITRATE: BitRate = BitRate::from_kbps(500);

/// Default frame rate.
pub const DEFAULT_FRAME_RATE: FrameRate = FrameRate::from_fps(30);

/// Encoded bitstream framing accepted by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BitstreamType {
    /// H.264/AVC with Annex B start codes.
    #[default]
    AnnexB,
}

/// Picture geometry shared by the decoder and the encoder of one session.
///
/// Pictures are planar 4:2:0. Chroma dimensions truncate, so an odd width
/// of 177 gives a chroma stride of 88.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
    width: u16,
    height: u16,
}

impl Geometry {
    /// Create a new geometry.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Picture width in pixels.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Picture height in pixels.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Returns true if either dimension is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Stride of the luma plane in bytes.
    #[must_use]
    pub const fn luma_stride(&self) -> usize {
        self.width as usize
    }

    /// Stride of each chroma plane in bytes.
    #[must_use]
    pub const fn chroma_stride(&self) -> usize {
        self.width as usize / 2
    }

    /// Number of rows in each chroma plane.
    #[must_use]
    pub const fn chroma_height(&self) -> usize {
        self.height as usize / 2
    }

    /// Strides of the Y, U and V planes.
    #[must_use]
    pub const fn strides(&self) -> [usize; 3] {
        [self.luma_stride(), self.chroma_stride(), self.chroma_stride()]
    }

    /// Byte sizes of the Y, U and V planes.
    #[must_use]
    pub const fn plane_sizes(&self) -> [usize; 3] {
        let luma = self.luma_stride() * self.height as usize;
        let chroma = self.chroma_stride() * self.chroma_height();
        [luma, chroma, chroma]
    }

    /// Returns true if the given dimensions match this geometry.
    #[must_use]
    pub fn matches(&self, width: u32, height: u32) -> bool {
        u32::from(self.width) == width && u32::from(self.height) == height
    }
}

impl Default for Geometry {
    fn default() -> Self {
        // QCIF
        Self::new(176, 144)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Target bitrate, stored in bits per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitRate(u32);

impl BitRate {
    /// Create a bitrate from bits per second.
    #[must_use]
    pub const fn from_bps(bps: u32) -> Self {
        Self(bps)
    }

    /// Create a bitrate from kilobits per second (1 kbps = 1000 bps).
    #[must_use]
    pub const fn from_kbps(kbps: u32) -> Self {
        Self(kbps.saturating_mul(1000))
    }

    /// Bits per second.
    #[must_use]
    pub const fn as_bps(&self) -> u32 {
        self.0
    }

    /// Kilobits per second, truncated.
    #[must_use]
    pub const fn as_kbps(&self) -> u32 {
        self.0 / 1000
    }
}

impl Default for BitRate {
    fn default() -> Self {
        DEFAULT_BITRATE
    }
}

impl fmt::Display for BitRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bps", self.0)
    }
}

/// Frame rate in frames per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRate(u32);

impl FrameRate {
    /// Create a frame rate from frames per second.
    #[must_use]
    pub const fn from_fps(fps: u32) -> Self {
        Self(fps)
    }

    /// Frames per second.
    #[must_use]
    pub const fn as_fps(&self) -> u32 {
        self.0
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        DEFAULT_FRAME_RATE
    }
}

/// Configuration for initializing a video encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Picture geometry. `width` is the encoder picture width.
    pub geometry: Geometry,
    /// Target bitrate.
    pub bitrate: BitRate,
    /// Maximum frame rate.
    pub frame_rate: FrameRate,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            geometry: Geometry::default(),
            bitrate: DEFAULT_BITRATE,
            frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

impl EncoderConfig {
    /// Create a new encoder configuration with the given geometry.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            ..Default::default()
        }
    }

    /// Set the target bitrate.
    #[must_use]
    pub fn bitrate(mut self, bitrate: BitRate) -> Self {
        self.bitrate = bitrate;
        self
    }

    /// Set the frame rate.
    #[must_use]
    pub fn frame_rate(mut self, frame_rate: FrameRate) -> Self {
        self.frame_rate = frame_rate;
        self
    }
}

/// Configuration for initializing a video decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecoderConfig {
    /// Bitstream framing of the input.
    pub bitstream: BitstreamType,
    /// Geometry every decoded picture must have.
    pub geometry: Geometry,
}

impl DecoderConfig {
    /// Create a new Annex B decoder configuration for the given geometry.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            bitstream: BitstreamType::AnnexB,
            geometry,
        }
    }
}
