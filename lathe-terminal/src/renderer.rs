/// Character-cell framebuffer for terminal output
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use lathe_core::Framebuffer;
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Grayscale framebuffer with one pixel per terminal cell
pub struct AsciiFramebuffer {
    width: usize,
    height: usize,
    luminance: Vec<u8>,
}

impl AsciiFramebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            luminance: vec![0; width * height],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.luminance = vec![0; width * height];
    }

    /// Ramp character for a luminance value
    pub fn glyph(luminance: u8) -> char {
        let index = luminance as usize * (LUMINOSITY_RAMP.len() - 1) / 255;
        LUMINOSITY_RAMP[index]
    }

    /// Terminal colour for a luminance band
    pub fn tint(luminance: u8) -> Color {
        match luminance {
            0..=63 => Color::DarkGrey,
            64..=127 => Color::Grey,
            128..=191 => Color::White,
            _ => Color::Cyan,
        }
    }

    /// Queue the whole buffer, one row per terminal line.
    ///
    /// The foreground colour is only re-sent where the band changes.
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (y, row) in self.luminance.chunks(self.width.max(1)).enumerate() {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            let mut tint = None;
            for &luminance in row {
                let next = Self::tint(luminance);
                if tint != Some(next) {
                    writer.queue(SetForegroundColor(next))?;
                    tint = Some(next);
                }
                writer.queue(Print(Self::glyph(luminance)))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Framebuffer for AsciiFramebuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn plot(&mut self, x: usize, y: usize, luminance: u8) {
        if x < self.width && y < self.height {
            self.luminance[y * self.width + x] = luminance;
        }
    }

    fn clear(&mut self, luminance: u8) {
        self.luminance.fill(luminance);
    }
}
