//! APA102 strip over an SPI bus
//!
//! Wire format: a 4-byte zero start frame, then one 4-byte frame per pixel
//! (`0b111` marker plus 5-bit global brightness, blue, green, red), then an
//! end frame of `0xFF` bytes long enough to clock the data through every
//! pixel (one bit per two pixels).

use embedded_hal::spi::SpiBus;
use log::debug;

use super::{Sink, SinkError, expect_frame_len};
use crate::{
    color::{BLACK, Rgb, format_hex},
    correction::ColorCorrection,
    frame::pixels_of,
};

const START_FRAME: [u8; 4] = [0; 4];
const PIXEL_MARKER: u8 = 0b1110_0000;
const MAX_GLOBAL_BRIGHTNESS: u8 = 0b0001_1111;
const END_FRAME_BYTE: u8 = 0xFF;

/// Strip settings for [`Apa102Sink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Apa102Config {
    pub pixel_count: usize,
    /// Overall intensity, 1-255
    pub intensity: u8,
    /// White point in Kelvin, 0 disables white point correction
    pub temperature: u16,
}

/// Sink encoding frames for APA102 LEDs
///
/// Bus errors are converted into [`SinkError`], so the bus error type must
/// provide that conversion.
pub struct Apa102Sink<B: SpiBus> {
    bus: B,
    pixel_count: usize,
    correction: ColorCorrection,
    wire: Vec<u8>,
    closed: bool,
}

impl<B: SpiBus> Apa102Sink<B> {
    pub fn new(bus: B, config: &Apa102Config) -> Self {
        let correction = ColorCorrection::new(config.intensity, config.temperature);
        if correction.is_identity() {
            debug!("apa102: {} pixels, no correction", config.pixel_count);
        } else {
            debug!(
                "apa102: {} pixels, correction {}",
                config.pixel_count,
                format_hex(correction.factors())
            );
        }
        Self {
            bus,
            pixel_count: config.pixel_count,
            correction,
            wire: Vec::with_capacity(wire_len(config.pixel_count)),
            closed: false,
        }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Consume the sink and return the bus
    pub fn into_bus(self) -> B {
        self.bus
    }

    fn encode(&mut self, pixels: impl Iterator<Item = Rgb>) {
        self.wire.clear();
        self.wire.extend_from_slice(&START_FRAME);
        let identity = self.correction.is_identity();
        for pixel in pixels {
            let pixel = if identity {
                pixel
            } else {
                self.correction.apply(pixel)
            };
            self.wire.extend_from_slice(&[
                PIXEL_MARKER | MAX_GLOBAL_BRIGHTNESS,
                pixel.b,
                pixel.g,
                pixel.r,
            ]);
        }
        let end = end_frame_len(self.pixel_count);
        self.wire.resize(self.wire.len() + end, END_FRAME_BYTE);
    }
}

impl<B> Apa102Sink<B>
where
    B: SpiBus,
    B::Error: Into<SinkError>,
{
    fn transmit(&mut self) -> Result<(), SinkError> {
        self.bus.write(&self.wire).map_err(Into::into)?;
        self.bus.flush().map_err(Into::into)
    }
}

impl<B> Sink for Apa102Sink<B>
where
    B: SpiBus,
    B::Error: Into<SinkError>,
{
    fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed);
        }
        expect_frame_len(bytes, self.pixel_count)?;
        self.encode(pixels_of(bytes));
        self.transmit()
    }

    /// Blank the strip and flush the bus
    fn close(&mut self) -> Result<(), SinkError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let count = self.pixel_count;
        self.encode(core::iter::repeat_n(BLACK, count));
        self.transmit()
    }
}

const fn end_frame_len(pixel_count: usize) -> usize {
    let len = pixel_count.div_ceil(16);
    if len == 0 { 1 } else { len }
}

const fn wire_len(pixel_count: usize) -> usize {
    START_FRAME.len() + 4 * pixel_count + end_frame_len(pixel_count)
}
