//! 1bpp frame buffer in panel byte order

use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

pub const WIDTH: u32 = 200;
pub const HEIGHT: u32 = 200;

const ROW_BYTES: usize = (WIDTH as usize).div_ceil(8);
pub const BUFFER_LEN: usize = ROW_BYTES * HEIGHT as usize;

/// Row-major, MSB first
///
/// A set bit is a white pixel, which is what the SSD1681 black/white RAM
/// expects. `BinaryColor::On` is ink.
pub struct FrameBuffer {
    buf: [u8; BUFFER_LEN],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    /// All white
    pub const fn new() -> Self {
        Self {
            buf: [0xFF; BUFFER_LEN],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Ink at `(x, y)`, `None` outside the frame
    pub fn pixel(&self, x: u32, y: u32) -> Option<bool> {
        let (idx, mask) = Self::locate(x, y)?;
        Some(self.buf[idx] & mask == 0)
    }

    /// Paint a rectangle white
    pub fn erase(&mut self, area: Rectangle) {
        let _ = self.fill_solid(&area, BinaryColor::Off);
    }

    fn locate(x: u32, y: u32) -> Option<(usize, u8)> {
        if x >= WIDTH || y >= HEIGHT {
            return None;
        }
        let idx = y as usize * ROW_BYTES + x as usize / 8;
        Some((idx, 0x80 >> (x % 8)))
    }

    fn set(&mut self, x: u32, y: u32, color: BinaryColor) {
        if let Some((idx, mask)) = Self::locate(x, y) {
            match color {
                BinaryColor::On => self.buf[idx] &= !mask,
                BinaryColor::Off => self.buf[idx] |= mask,
            }
        }
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            self.set(point.x as u32, point.y as u32, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let byte = match color {
            BinaryColor::On => 0x00,
            BinaryColor::Off => 0xFF,
        };
        self.buf.fill(byte);
        Ok(())
    }
}
