//! Scripted in-memory codec library for exercising sessions without a
//! native codec.
//!
//! Access units carry a one-byte tag after the NAL header. The decoder fills
//! the luma plane with that tag and the encoder writes the first luma byte
//! back out, so a popped frame can be matched to the frame that was pushed.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use turnx::Frame;
use turnx_codec::{
    BitRate, CodecError, CodecLibrary, DecodedPicture, DecoderConfig, EncodedPacket,
    EncoderConfig, Geometry, Planes, SourcePicture, VideoDecoder, VideoEncoder,
};

/// Offset of the tag byte in an access unit.
const TAG_OFFSET: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    DecoderCreated,
    DecoderInitialized,
    DecoderUninitialized,
    DecoderDestroyed,
    EncoderCreated,
    EncoderInitialized,
    EncoderUninitialized,
    EncoderDestroyed,
}

#[derive(Debug, Default)]
pub struct Script {
    pub fail_decoder_create: bool,
    pub fail_decoder_init: bool,
    pub fail_encoder_create: bool,
    pub fail_encoder_init: bool,
    pub fail_set_bitrate: bool,
    /// Tags whose decode fails.
    pub fail_decode: Vec<u8>,
    /// Tags whose encode fails.
    pub fail_encode: Vec<u8>,
    /// Tags whose encode yields no bytes.
    pub empty_encode: Vec<u8>,
    /// Tags whose decode panics.
    pub panic_decode: Vec<u8>,
    /// Decoded pictures carry one byte of trailing padding on the luma plane.
    pub pad_planes: bool,
    /// Decoded pictures report this geometry instead of the configured one.
    pub decode_geometry: Option<Geometry>,
    pub events: Vec<Event>,
    pub encoder_config: Option<EncoderConfig>,
    pub decoder_config: Option<DecoderConfig>,
    pub strides_seen: Vec<[usize; 3]>,
    pub bitrates_set: Vec<BitRate>,
    pub live_decoders: usize,
    pub live_encoders: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedLibrary {
    script: Arc<Mutex<Script>>,
}

impl ScriptedLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn events(&self) -> Vec<Event> {
        self.script().events.clone()
    }

    pub fn live_handles(&self) -> usize {
        let script = self.script();
        script.live_decoders + script.live_encoders
    }
}

impl CodecLibrary for ScriptedLibrary {
    type Decoder = ScriptedDecoder;
    type Encoder = ScriptedEncoder;

    fn create_decoder(&self) -> Result<ScriptedDecoder, CodecError> {
        let mut script = self.script();
        if script.fail_decoder_create {
            return Err(CodecError::create_failed("decoder", "scripted failure"));
        }
        script.events.push(Event::DecoderCreated);
        script.live_decoders += 1;
        Ok(ScriptedDecoder {
            script: self.script.clone(),
            geometry: None,
        })
    }

    fn create_encoder(&self) -> Result<ScriptedEncoder, CodecError> {
        let mut script = self.script();
        if script.fail_encoder_create {
            return Err(CodecError::create_failed("encoder", "scripted failure"));
        }
        script.events.push(Event::EncoderCreated);
        script.live_encoders += 1;
        Ok(ScriptedEncoder {
            script: self.script.clone(),
            geometry: None,
            frame_index: 0,
        })
    }
}

pub struct ScriptedDecoder {
    script: Arc<Mutex<Script>>,
    geometry: Option<Geometry>,
}

impl ScriptedDecoder {
    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl VideoDecoder for ScriptedDecoder {
    fn initialize(&mut self, config: &DecoderConfig) -> Result<(), CodecError> {
        let mut script = self.script();
        if script.fail_decoder_init {
            return Err(CodecError::initialize_failed("decoder", "scripted failure"));
        }
        script.events.push(Event::DecoderInitialized);
        script.decoder_config = Some(*config);
        drop(script);
        self.geometry = Some(config.geometry);
        Ok(())
    }

    fn decode(&mut self, bitstream: &[u8]) -> Result<DecodedPicture, CodecError> {
        let geometry = self.geometry.ok_or(CodecError::NotInitialized("decoder"))?;
        if bitstream.len() <= TAG_OFFSET || bitstream[..4] != [0, 0, 0, 1] {
            return Err(CodecError::native("not an Annex B access unit"));
        }
        let tag = bitstream[TAG_OFFSET];

        let script = self.script();
        if script.panic_decode.contains(&tag) {
            drop(script);
            panic!("scripted decoder panic on tag {}", tag);
        }
        if script.fail_decode.contains(&tag) {
            return Err(CodecError::native(format!("scripted decode failure on tag {}", tag)));
        }
        let reported = script.decode_geometry.unwrap_or(geometry);
        let pad = script.pad_planes;
        drop(script);

        let mut planes = Planes::zeroed(geometry);
        planes.y.fill(tag);
        planes.u.fill(128);
        planes.v.fill(128);
        if pad {
            planes.y.push(0);
        }
        Ok(DecodedPicture::new(
            reported.width().into(),
            reported.height().into(),
            planes,
        ))
    }

    fn uninitialize(&mut self) {
        if self.geometry.take().is_some() {
            self.script().events.push(Event::DecoderUninitialized);
        }
    }
}

impl Drop for ScriptedDecoder {
    fn drop(&mut self) {
        let mut script = self.script();
        script.events.push(Event::DecoderDestroyed);
        script.live_decoders -= 1;
    }
}

pub struct ScriptedEncoder {
    script: Arc<Mutex<Script>>,
    geometry: Option<Geometry>,
    frame_index: u64,
}

impl ScriptedEncoder {
    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl VideoEncoder for ScriptedEncoder {
    fn initialize(&mut self, config: &EncoderConfig) -> Result<(), CodecError> {
        let mut script = self.script();
        if script.fail_encoder_init {
            return Err(CodecError::initialize_failed("encoder", "scripted failure"));
        }
        script.events.push(Event::EncoderInitialized);
        script.encoder_config = Some(config.clone());
        drop(script);
        self.geometry = Some(config.geometry);
        Ok(())
    }

    fn encode(&mut self, picture: &SourcePicture<'_>) -> Result<EncodedPacket, CodecError> {
        let geometry = self.geometry.ok_or(CodecError::NotInitialized("encoder"))?;
        if picture.geometry() != geometry {
            return Err(CodecError::InvalidDimensions {
                width: picture.geometry().width().into(),
                height: picture.geometry().height().into(),
            });
        }
        let tag = picture.y()[0];

        let mut script = self.script();
        script.strides_seen.push(picture.strides());
        if script.fail_encode.contains(&tag) {
            return Err(CodecError::native(format!("scripted encode failure on tag {}", tag)));
        }
        let data = if script.empty_encode.contains(&tag) {
            Vec::new()
        } else {
            vec![0, 0, 0, 1, 0x65, tag, 0x80]
        };
        drop(script);

        let index = self.frame_index;
        self.frame_index += 1;
        Ok(EncodedPacket::new(data, index))
    }

    fn set_bitrate(&mut self, bitrate: BitRate) -> Result<(), CodecError> {
        let mut script = self.script();
        if script.fail_set_bitrate {
            return Err(CodecError::native("scripted reconfigure failure"));
        }
        script.bitrates_set.push(bitrate);
        Ok(())
    }

    fn uninitialize(&mut self) {
        if self.geometry.take().is_some() {
            self.script().events.push(Event::EncoderUninitialized);
        }
    }
}

impl Drop for ScriptedEncoder {
    fn drop(&mut self) {
        let mut script = self.script();
        script.events.push(Event::EncoderDestroyed);
        script.live_encoders -= 1;
    }
}

/// An encoded access unit of `len` bytes carrying `tag`.
pub fn access_unit(tag: u8, len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len.max(TAG_OFFSET + 1)];
    data[..5].copy_from_slice(&[0, 0, 0, 1, 0x65]);
    data[TAG_OFFSET] = tag;
    data
}

/// Tag carried by an encoded frame.
pub fn tag_of(frame: &Frame) -> u8 {
    frame.as_encoded().expect("encoded frame")[TAG_OFFSET]
}

pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .with_test_writer()
        .try_init();
}
