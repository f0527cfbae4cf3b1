//! Terminal preview sink
//!
//! Draws the strip as a single line of true-color blocks, one character
//! cell per pixel, redrawn in place every frame.

use std::io::Write;

use crossterm::{
    cursor::{Hide, MoveToColumn, Show},
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor},
};

use super::{Sink, SinkError, expect_frame_len};
use crate::frame::pixels_of;

/// Sink that previews frames on a terminal
pub struct TerminalSink<W: Write> {
    out: W,
    pixel_count: usize,
    cursor_hidden: bool,
    closed: bool,
}

impl<W: Write> TerminalSink<W> {
    pub const fn new(out: W, pixel_count: usize) -> Self {
        Self {
            out,
            pixel_count,
            cursor_hidden: false,
            closed: false,
        }
    }

    /// Consume the sink and return the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for TerminalSink<W> {
    fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed);
        }
        expect_frame_len(bytes, self.pixel_count)?;

        if !self.cursor_hidden {
            queue!(self.out, Hide)?;
            self.cursor_hidden = true;
        }
        queue!(self.out, MoveToColumn(0))?;
        for pixel in pixels_of(bytes) {
            queue!(
                self.out,
                SetBackgroundColor(Color::Rgb {
                    r: pixel.r,
                    g: pixel.g,
                    b: pixel.b,
                }),
                Print(' ')
            )?;
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        queue!(self.out, ResetColor, Show, Print("\r\n"))?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(sink: TerminalSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn draws_one_block_per_pixel() {
        let mut sink = TerminalSink::new(Vec::new(), 2);
        sink.write(&[255, 0, 0, 0, 0, 255]).unwrap();
        let out = rendered(sink);
        assert!(out.contains("\x1b[?25l"));
        assert!(out.contains("48;2;255;0;0m "));
        assert!(out.contains("48;2;0;0;255m "));
    }

    #[test]
    fn close_restores_the_cursor_once() {
        let mut sink = TerminalSink::new(Vec::new(), 1);
        sink.write(&[1, 2, 3]).unwrap();
        sink.close().unwrap();
        sink.close().unwrap();
        assert!(matches!(sink.write(&[1, 2, 3]), Err(SinkError::Closed)));
        let out = rendered(sink);
        assert_eq!(out.matches("\x1b[?25h").count(), 1);
        assert!(out.ends_with("\r\n"));
    }

    #[test]
    fn rejects_wrong_sized_frames() {
        let mut sink = TerminalSink::new(Vec::new(), 2);
        assert!(matches!(
            sink.write(&[0; 3]),
            Err(SinkError::LengthMismatch { .. })
        ));
    }
}
