//! Write-only SPI bus over a Linux `spidev` character device

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use embedded_hal::spi::{self, ErrorKind, ErrorType, SpiBus};
use log::debug;
use spidev::{Spidev, SpidevOptions};

use super::SinkError;
use crate::error::StartupError;

/// Largest single transfer the kernel driver accepts unless told otherwise
pub const DEFAULT_MAX_TRANSFER: usize = 4096;

const BUFSIZ_PARAM: &str = "/sys/module/spidev/parameters/bufsiz";

/// I/O failure on a [`SpidevBus`]
#[derive(thiserror::Error, Debug)]
#[error("spidev: {0}")]
pub struct SpidevError(#[from] pub io::Error);

impl spi::Error for SpidevError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl From<SpidevError> for SinkError {
    fn from(err: SpidevError) -> Self {
        Self::Io(err.0)
    }
}

/// SPI bus that streams every write to a byte sink
///
/// The kernel driver performs one transfer per `write(2)` and rejects
/// transfers larger than its buffer, so each [`SpiBus::write`] is split into
/// chunks of at most `max_transfer` bytes. Reads are not supported.
pub struct SpidevBus<W: Write> {
    dev: W,
    max_transfer: usize,
}

impl<W: Write> SpidevBus<W> {
    pub const fn new(dev: W) -> Self {
        Self {
            dev,
            max_transfer: DEFAULT_MAX_TRANSFER,
        }
    }

    #[must_use]
    pub fn with_max_transfer(mut self, max_transfer: usize) -> Self {
        self.max_transfer = max_transfer.max(1);
        self
    }

    pub const fn max_transfer(&self) -> usize {
        self.max_transfer
    }

    pub fn into_inner(self) -> W {
        self.dev
    }
}

impl<W: Write> ErrorType for SpidevBus<W> {
    type Error = SpidevError;
}

impl<W: Write> SpiBus for SpidevBus<W> {
    fn read(&mut self, _words: &mut [u8]) -> Result<(), SpidevError> {
        Err(unsupported())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), SpidevError> {
        for chunk in words.chunks(self.max_transfer) {
            self.dev.write_all(chunk)?;
        }
        Ok(())
    }

    fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), SpidevError> {
        Err(unsupported())
    }

    fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), SpidevError> {
        Err(unsupported())
    }

    fn flush(&mut self) -> Result<(), SpidevError> {
        self.dev.flush()?;
        Ok(())
    }
}

fn unsupported() -> SpidevError {
    SpidevError(io::Error::new(
        io::ErrorKind::Unsupported,
        "spidev bus is write-only",
    ))
}

/// Resolve a bus name to its device path
///
/// `"0.1"` maps to `/dev/spidev0.1`, absolute paths are used as is.
pub fn spidev_path(name: &str) -> PathBuf {
    if name.starts_with('/') {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("/dev/spidev{name}"))
    }
}

/// Transfer size limit reported by the loaded driver
fn driver_bufsiz() -> usize {
    fs::read_to_string(BUFSIZ_PARAM)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .filter(|&size| size > 0)
        .unwrap_or(DEFAULT_MAX_TRANSFER)
}

/// Open the named SPI bus, optionally capping its clock at `speed_hz`
pub fn open_spidev(name: &str, speed_hz: Option<u32>) -> Result<SpidevBus<Spidev>, StartupError> {
    let path = spidev_path(name);
    let mut dev = Spidev::open(&path)
        .map_err(|err| StartupError::device(format!("opening {}: {err}", path.display())))?;

    if let Some(hz) = speed_hz {
        let options = SpidevOptions::new().max_speed_hz(hz).build();
        dev.configure(&options).map_err(|err| {
            StartupError::device(format!("setting {} to {hz} Hz: {err}", path.display()))
        })?;
        debug!("{}: bus speed limited to {hz} Hz", path.display());
    }

    let max_transfer = driver_bufsiz();
    debug!("{}: {max_transfer} bytes per transfer", path.display());
    Ok(SpidevBus::new(dev).with_max_transfer(max_transfer))
}
