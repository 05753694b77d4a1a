//! Caller-owned RGBA pixel buffer with in-place alpha compositing.
//!
//! The rasterizer never allocates or resizes a buffer; it only blends into
//! one handed to it. Pixels are straight-alpha [`Rgba`] values; compositing
//! runs through [`Rgba::over`].

use crate::color::Rgba;

/// A `width x height` array of straight-alpha RGBA pixels, row-major.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<Rgba>,
}

impl PixelBuffer {
    /// Create a fully transparent buffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![Rgba::TRANSPARENT; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Overwrite every pixel (e.g. to pre-fill a background).
    pub fn clear(&mut self, color: Rgba) {
        self.data.fill(color);
    }

    /// Pixel at (x, y), or `None` outside the buffer.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.data[y as usize * self.width + x as usize])
    }

    /// Composite `color` over the pixel at (x, y). Out-of-bounds
    /// coordinates are ignored.
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.data[idx] = color.over(self.data[idx]);
    }

    /// Raw row-major pixel data.
    pub fn data(&self) -> &[Rgba] {
        &self.data
    }
}
