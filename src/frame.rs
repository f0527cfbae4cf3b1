//! Frame buffer and its transmission byte layout.

use core::ops::{Deref, DerefMut};

use crate::color::{BLACK, Rgb};

/// Bytes per pixel in the transmission layout
pub const BYTES_PER_PIXEL: usize = 3;

/// Colors for every pixel of the strip, index `i` is physical pixel `i`
///
/// The length is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Box<[Rgb]>,
}

impl FrameBuffer {
    /// Allocate a black frame of `len` pixels
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![BLACK; len].into_boxed_slice(),
        }
    }

    /// Pack the frame into a new transmission buffer
    pub fn to_bytes(&self) -> TransmissionBuffer {
        let mut out = TransmissionBuffer::for_pixels(self.len());
        self.write_bytes(&mut out);
        out
    }

    /// Pack the frame into `out`, reusing its allocation
    ///
    /// Bytes are R, G, B per pixel in ascending pixel order. `out` is resized
    /// to exactly 3 bytes per pixel.
    pub fn write_bytes(&self, out: &mut TransmissionBuffer) {
        out.bytes.clear();
        out.bytes.reserve(self.len() * BYTES_PER_PIXEL);
        for pixel in self.pixels.iter() {
            out.bytes.extend_from_slice(&[pixel.r, pixel.g, pixel.b]);
        }
    }
}

impl Deref for FrameBuffer {
    type Target = [Rgb];

    fn deref(&self) -> &Self::Target {
        &self.pixels
    }
}

impl DerefMut for FrameBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.pixels
    }
}

/// Byte-packed frame ready to hand to a sink
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransmissionBuffer {
    bytes: Vec<u8>,
}

impl TransmissionBuffer {
    pub fn for_pixels(pixels: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(pixels * BYTES_PER_PIXEL),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Iterate the packed bytes as colors
    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        pixels_of(&self.bytes)
    }
}

impl AsRef<[u8]> for TransmissionBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Iterate `R,G,B` triplets of a packed buffer as colors
///
/// A trailing partial triplet is ignored.
pub fn pixels_of(bytes: &[u8]) -> impl Iterator<Item = Rgb> + '_ {
    bytes
        .chunks_exact(BYTES_PER_PIXEL)
        .map(|c| Rgb::new(c[0], c[1], c[2]))
}
