//! Raw picture types exchanged between the decoder and the encoder.

use crate::{CodecError, Geometry};

/// Three tightly packed I420 planes (Y, U, V).
///
/// Strides are not stored; they are always derived from the session
/// [`Geometry`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Planes {
    /// Luma plane.
    pub y: Vec<u8>,
    /// Blue-difference chroma plane.
    pub u: Vec<u8>,
    /// Red-difference chroma plane.
    pub v: Vec<u8>,
}

impl Planes {
    /// Create planes from owned buffers.
    #[must_use]
    pub fn new(y: Vec<u8>, u: Vec<u8>, v: Vec<u8>) -> Self {
        Self { y, u, v }
    }

    /// Zero-filled planes sized for the given geometry.
    #[must_use]
    pub fn zeroed(geometry: Geometry) -> Self {
        let [y, u, v] = geometry.plane_sizes();
        Self::new(vec![0; y], vec![0; u], vec![0; v])
    }

    /// Copy planes out of strided buffers, dropping any row padding.
    ///
    /// `strides` are the source strides, which may be wider than the
    /// geometry-derived ones.
    pub fn from_strided(
        geometry: Geometry,
        planes: [&[u8]; 3],
        strides: [usize; 3],
    ) -> Result<Self, CodecError> {
        let rows = [
            geometry.height() as usize,
            geometry.chroma_height(),
            geometry.chroma_height(),
        ];
        let widths = geometry.strides();
        let mut packed: [Vec<u8>; 3] = Default::default();

        for i in 0..3 {
            if strides[i] < widths[i] {
                return Err(CodecError::invalid_param(format!(
                    "plane {} stride {} narrower than {}",
                    i, strides[i], widths[i]
                )));
            }
            if rows[i] > 0 && planes[i].len() < (rows[i] - 1) * strides[i] + widths[i] {
                return Err(CodecError::invalid_param(format!(
                    "plane {} holds {} bytes, too small for {} rows",
                    i,
                    planes[i].len(),
                    rows[i]
                )));
            }
            let mut out = Vec::with_capacity(widths[i] * rows[i]);
            for row in 0..rows[i] {
                let start = row * strides[i];
                out.extend_from_slice(&planes[i][start..start + widths[i]]);
            }
            packed[i] = out;
        }

        let [y, u, v] = packed;
        Ok(Self::new(y, u, v))
    }

    /// Returns true if the plane sizes match the given geometry.
    #[must_use]
    pub fn fits(&self, geometry: Geometry) -> bool {
        geometry.plane_sizes() == [self.y.len(), self.u.len(), self.v.len()]
    }

    /// Borrow the planes in Y, U, V order.
    #[must_use]
    pub fn as_slices(&self) -> [&[u8]; 3] {
        [&self.y, &self.u, &self.v]
    }
}

/// A picture produced by a decoder.
#[derive(Debug, Clone)]
pub struct DecodedPicture {
    /// Picture width in pixels.
    pub width: u32,
    /// Picture height in pixels.
    pub height: u32,
    /// Tightly packed I420 planes.
    pub planes: Planes,
}

impl DecodedPicture {
    /// Create a new decoded picture.
    #[must_use]
    pub fn new(width: u32, height: u32, planes: Planes) -> Self {
        Self {
            width,
            height,
            planes,
        }
    }
}

/// Source picture description handed to an encoder.
///
/// Borrows the planes; strides come from the geometry: luma stride is the
/// width and each chroma stride is half the width.
#[derive(Debug, Clone, Copy)]
pub struct SourcePicture<'a> {
    geometry: Geometry,
    planes: [&'a [u8]; 3],
}

impl<'a> SourcePicture<'a> {
    /// Describe planar 4:2:0 planes at the given geometry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParam` unless every plane is exactly the size the
    /// geometry needs. Padded planes must be repacked with
    /// [`Planes::from_strided`] first.
    pub fn i420(geometry: Geometry, planes: &'a Planes) -> Result<Self, CodecError> {
        let sizes = geometry.plane_sizes();
        let slices = planes.as_slices();
        for (i, (plane, size)) in slices.iter().zip(sizes).enumerate() {
            if plane.len() != size {
                return Err(CodecError::invalid_param(format!(
                    "plane {} holds {} bytes, {} needs exactly {}",
                    i,
                    plane.len(),
                    geometry,
                    size
                )));
            }
        }
        Ok(Self {
            geometry,
            planes: slices,
        })
    }

    /// Geometry of the picture.
    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Strides of the Y, U and V planes.
    #[must_use]
    pub fn strides(&self) -> [usize; 3] {
        self.geometry.strides()
    }

    /// Luma plane.
    #[must_use]
    pub fn y(&self) -> &'a [u8] {
        self.planes[0]
    }

    /// Blue-difference chroma plane.
    #[must_use]
    pub fn u(&self) -> &'a [u8] {
        self.planes[1]
    }

    /// Red-difference chroma plane.
    #[must_use]
    pub fn v(&self) -> &'a [u8] {
        self.planes[2]
    }
}
