//! Fixed-size output raster in the packed `0x00RRGGBB` layout that minifb
//! presents directly.

use crate::terrain::Rgb;

pub fn pack(color: Rgb) -> u32 {
    ((color[0] as u32) << 16) | ((color[1] as u32) << 8) | color[2] as u32
}

pub fn unpack(pixel: u32) -> Rgb {
    [(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8]
}

/// One frame of output. Created once at the logical render resolution and
/// fully overwritten every frame; never read back by the renderer.
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pub width: usize,
    pub height: usize,
    pixels: Vec<u32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    /// Overwrite every pixel with one color.
    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(pack(color));
    }

    /// Paint rows `top..=bottom` of one column. Rows outside the buffer are
    /// silently skipped, as is the whole call if the column is out of range.
    pub fn fill_column(&mut self, x: usize, top: i64, bottom: i64, color: Rgb) {
        if x >= self.width {
            return;
        }
        let lo = top.max(0) as usize;
        let hi = bottom.min(self.height as i64 - 1);
        if hi < 0 {
            return;
        }
        let packed = pack(color);
        for y in lo..=hi as usize {
            self.pixels[y * self.width + x] = packed;
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        unpack(self.pixels[y * self.width + x])
    }

    /// The raw packed buffer, row-major, ready for `Window::update_with_buffer`.
    pub fn data(&self) -> &[u32] {
        &self.pixels
    }
}
