//! Run configuration.
//!
//! Everything a run needs, collected from the command line and validated
//! before any device is opened.

use core::ops::RangeInclusive;
use core::time::Duration;

use log::warn;

use crate::{
    document::PatternSource,
    error::StartupError,
    frame_scheduler::DEFAULT_FPS,
    render_loop::LoopConfig,
    sink::Apa102Config,
};

pub const FPS_RANGE: RangeInclusive<u32> = 1..=200;
pub const PIXEL_COUNT_RANGE: RangeInclusive<u32> = 1..=10_000;
pub const INTENSITY_RANGE: RangeInclusive<u32> = 1..=255;
pub const TEMPERATURE_RANGE: RangeInclusive<u32> = 0..=65_535;

pub const DEFAULT_PIXEL_COUNT: u32 = 44;
pub const DEFAULT_INTENSITY: u32 = 127;
pub const DEFAULT_TEMPERATURE: u32 = 5000;

/// Where frames are sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// Preview on the controlling terminal
    Terminal,
    /// APA102 strip on the named SPI bus
    Spi(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub fps: u32,
    pub pixel_count: u32,
    pub intensity: u32,
    /// White point in Kelvin, 0 disables correction
    pub temperature: u32,
    /// SPI bus name, e.g. `0.0` for `/dev/spidev0.0`
    pub bus: Option<String>,
    /// Requested bus speed, 0 keeps the device default
    pub bus_hz: u32,
    pub source: PatternSource,
    pub terminal: bool,
    /// Stop after this long, run until failure otherwise
    pub duration: Option<Duration>,
}

impl RunConfig {
    /// Configuration with default settings for `source`
    pub fn new(source: PatternSource) -> Self {
        Self {
            fps: DEFAULT_FPS,
            pixel_count: DEFAULT_PIXEL_COUNT,
            intensity: DEFAULT_INTENSITY,
            temperature: DEFAULT_TEMPERATURE,
            bus: None,
            bus_hz: 0,
            source,
            terminal: false,
            duration: None,
        }
    }

    /// Check every numeric setting against its allowed range
    pub fn validate(&self) -> Result<(), StartupError> {
        check("fps", &FPS_RANGE, self.fps)?;
        check("pixel count", &PIXEL_COUNT_RANGE, self.pixel_count)?;
        check("intensity", &INTENSITY_RANGE, self.intensity)?;
        check("temperature", &TEMPERATURE_RANGE, self.temperature)?;
        Ok(())
    }

    /// Pick the output, the terminal preview wins over a bus
    pub fn output(&self) -> Result<Output, StartupError> {
        match (&self.bus, self.terminal) {
            (Some(bus), true) => {
                warn!("--terminal given, ignoring SPI bus {bus}");
                Ok(Output::Terminal)
            }
            (None, true) => Ok(Output::Terminal),
            (Some(bus), false) => Ok(Output::Spi(bus.clone())),
            (None, false) => Err(StartupError::device(
                "no output selected, pass --spi <bus> or use --terminal to preview",
            )),
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.pixel_count as usize
    }

    /// Bus clock limit to program into the device, if any
    pub const fn bus_speed(&self) -> Option<u32> {
        if self.bus_hz == 0 {
            None
        } else {
            Some(self.bus_hz)
        }
    }

    pub const fn loop_config(&self) -> LoopConfig {
        LoopConfig { fps: self.fps }
    }

    pub fn apa102_config(&self) -> Apa102Config {
        Apa102Config {
            pixel_count: self.pixel_count(),
            intensity: u8::try_from(self.intensity).unwrap_or(u8::MAX),
            temperature: u16::try_from(self.temperature).unwrap_or(u16::MAX),
        }
    }
}

fn check(name: &'static str, range: &RangeInclusive<u32>, value: u32) -> Result<(), StartupError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(StartupError::OutOfRange {
            name,
            min: *range.start(),
            max: *range.end(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RunConfig {
        RunConfig::new(PatternSource::Inline("\"#ffffff\"".into()))
    }

    #[test]
    fn defaults_are_valid() {
        let config = config();
        config.validate().unwrap();
        assert_eq!(config.fps, 30);
        assert_eq!(config.pixel_count, 44);
        assert_eq!(
            config.apa102_config(),
            Apa102Config {
                pixel_count: 44,
                intensity: 127,
                temperature: 5000
            }
        );
    }

    #[test]
    fn rejects_values_outside_their_range() {
        let cases: [(fn(&mut RunConfig), &str); 6] = [
            (|c| c.fps = 0, "fps must be between 1 and 200, got 0"),
            (|c| c.fps = 201, "fps must be between 1 and 200, got 201"),
            (|c| c.pixel_count = 0, "pixel count must be between 1 and 10000, got 0"),
            (|c| c.pixel_count = 10_001, "pixel count must be between 1 and 10000, got 10001"),
            (|c| c.intensity = 256, "intensity must be between 1 and 255, got 256"),
            (|c| c.temperature = 65_536, "temperature must be between 0 and 65535, got 65536"),
        ];
        for (edit, message) in cases {
            let mut config = config();
            edit(&mut config);
            assert_eq!(config.validate().unwrap_err().to_string(), message);
        }
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let mut config = config();
        config.fps = 200;
        config.pixel_count = 1;
        config.intensity = 255;
        config.temperature = 0;
        config.validate().unwrap();
    }

    #[test]
    fn zero_bus_speed_keeps_the_device_default() {
        let mut config = config();
        assert_eq!(config.bus_speed(), None);
        config.bus_hz = 8_000_000;
        assert_eq!(config.bus_speed(), Some(8_000_000));
    }

    #[test]
    fn output_selection() {
        let mut config = config();
        assert!(matches!(config.output(), Err(StartupError::Device(_))));
        config.bus = Some("0.0".into());
        assert_eq!(config.output().unwrap(), Output::Spi("0.0".into()));
        config.terminal = true;
        assert_eq!(config.output().unwrap(), Output::Terminal);
    }
}
