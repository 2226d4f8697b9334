//! Frame descriptors as seen inside the crate.
//!
//! The boundary record ([`RawFrame`](crate::ffi::RawFrame)) tags its payload
//! with a single boolean. Internally that becomes a real sum type so the
//! wrong arm can never be read.

use turnx_codec::Planes;

/// Payload of a frame descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramePayload {
    /// Up to three raw I420 planes; strides come from the session geometry.
    Raw(Planes),
    /// One contiguous encoded access unit.
    Encoded(Vec<u8>),
}

/// One unit of pixel or bitstream data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    payload: FramePayload,
}

impl Frame {
    /// An encoded frame holding the given bitstream bytes.
    pub fn encoded(data: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: FramePayload::Encoded(data.into()),
        }
    }

    /// A raw frame holding decoded planes.
    pub fn raw(planes: Planes) -> Self {
        Self {
            payload: FramePayload::Raw(planes),
        }
    }

    pub fn is_encoded(&self) -> bool {
        matches!(self.payload, FramePayload::Encoded(_))
    }

    /// Byte length of the encoded buffer, or `None` for raw frames.
    pub fn item_count(&self) -> Option<usize> {
        match &self.payload {
            FramePayload::Encoded(data) => Some(data.len()),
            FramePayload::Raw(_) => None,
        }
    }

    pub fn payload(&self) -> &FramePayload {
        &self.payload
    }

    /// Encoded bytes, if this is an encoded frame.
    pub fn as_encoded(&self) -> Option<&[u8]> {
        match &self.payload {
            FramePayload::Encoded(data) => Some(data),
            FramePayload::Raw(_) => None,
        }
    }

    pub fn into_payload(self) -> FramePayload {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turnx_codec::Geometry;

    #[test]
    fn test_encoded_frame() {
        let frame = Frame::encoded(vec![0, 0, 0, 1, 0x65]);
        assert!(frame.is_encoded());
        assert_eq!(frame.item_count(), Some(5));
        assert_eq!(frame.as_encoded(), Some(&[0, 0, 0, 1, 0x65][..]));
    }

    #[test]
    fn test_raw_frame_has_no_item_count() {
        let frame = Frame::raw(Planes::zeroed(Geometry::new(4, 4)));
        assert!(!frame.is_encoded());
        assert_eq!(frame.item_count(), None);
        assert!(frame.as_encoded().is_none());
    }
}
