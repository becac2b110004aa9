//! The full-color compositing surface content is drawn onto before
//! quantization.

use crate::color::Color;
use crate::error::{Error, Result};
use crate::surface::Surface;

/// An RGBA pixel store: `width * height * 4` bytes, row-major, one
/// `[r, g, b, a]` group per pixel.
///
/// The buffer length is fixed at construction and exclusively owned;
/// cloning deep-copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    buf: Vec<u8>,
}

impl Canvas {
    /// Allocates a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Color) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid(format!(
                "canvas dimensions must be positive, got {width}x{height}"
            )));
        }
        let stamp = background.to_rgba_bytes();
        let mut buf = vec![0u8; width as usize * height as usize * 4];
        for px in buf.chunks_exact_mut(4) {
            px.copy_from_slice(&stamp);
        }
        Ok(Canvas { width, height, buf })
    }

    /// The raw RGBA bytes, row-major.
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    fn offset(&self, x: i32, y: i32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Canvas-to-canvas blit with per-pixel alpha compositing, clipped to
    /// both surfaces. Fully transparent source pixels are skipped, opaque
    /// pixels overwrite, anything else blends over the destination; the
    /// destination alpha always ends at 255.
    ///
    /// Shadows [`Surface::blit`] for the canvas/canvas case.
    pub fn blit(&mut self, source: &Canvas, x: i32, y: i32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + source.width as i32).min(self.width as i32);
        let y1 = (y + source.height as i32).min(self.height as i32);
        for dy in y0..y1 {
            for dx in x0..x1 {
                let src = source.offset(dx - x, dy - y);
                let sp = Color::from_rgba_bytes([
                    source.buf[src],
                    source.buf[src + 1],
                    source.buf[src + 2],
                    source.buf[src + 3],
                ]);
                match sp.a {
                    0 => {}
                    255 => {
                        let dst = self.offset(dx, dy);
                        self.buf[dst..dst + 4].copy_from_slice(&sp.to_rgba_bytes());
                    }
                    _ => {
                        let dst = self.offset(dx, dy);
                        let dp = Color::from_rgba_bytes([
                            self.buf[dst],
                            self.buf[dst + 1],
                            self.buf[dst + 2],
                            self.buf[dst + 3],
                        ]);
                        let out = sp.over(dp);
                        self.buf[dst..dst + 4].copy_from_slice(&out.to_rgba_bytes());
                    }
                }
            }
        }
    }

    /// Copies raw RGBA bytes describing a `width` x `height` rectangle to
    /// `(x, y)`, clipped row by row. `bytes` must be exactly
    /// `width * height * 4` long.
    pub fn load_rgba(&mut self, bytes: &[u8], width: u32, height: u32, x: i32, y: i32) -> Result<()> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(Error::invalid(format!(
                "RGBA buffer is {} bytes, expected {expected} for {width}x{height}",
                bytes.len()
            )));
        }
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width as i32).min(self.width as i32);
        let y1 = (y + height as i32).min(self.height as i32);
        if x1 <= x0 || y1 <= y0 {
            return Ok(());
        }
        let run = (x1 - x0) as usize * 4;
        for dy in y0..y1 {
            let src_row = ((dy - y) as usize * width as usize + (x0 - x) as usize) * 4;
            let dst = self.offset(x0, dy);
            self.buf[dst..dst + run].copy_from_slice(&bytes[src_row..src_row + run]);
        }
        Ok(())
    }
}

impl Surface for Canvas {
    type Pixel = Color;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_pixel(&mut self, x: i32, y: i32, pixel: Color) {
        if self.in_bounds(x, y) {
            let i = self.offset(x, y);
            self.buf[i..i + 4].copy_from_slice(&pixel.to_rgba_bytes());
        }
    }

    fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let i = self.offset(x, y);
        Some(Color::from_rgba_bytes([
            self.buf[i],
            self.buf[i + 1],
            self.buf[i + 2],
            self.buf[i + 3],
        ]))
    }

    /// Bulk overwrite with the color's 4-byte stamp.
    fn clear(&mut self, pixel: Color) {
        let stamp = pixel.to_rgba_bytes();
        for px in self.buf.chunks_exact_mut(4) {
            px.copy_from_slice(&stamp);
        }
    }

    fn plot_coverage(&mut self, x: i32, y: i32, pixel: Color, coverage: u8) {
        match coverage {
            0 => {}
            255 => self.set_pixel(x, y, pixel.with_alpha(255)),
            c => {
                if let Some(under) = self.get_pixel(x, y) {
                    self.set_pixel(x, y, pixel.with_alpha(c).over(under));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::NamedColor;

    const WHITE: Color = Color::rgb(255, 255, 255);

    #[test]
    fn rejects_zero_dimensions() {
        assert!(Canvas::new(0, 4, WHITE).is_err());
        assert!(Canvas::new(4, 0, WHITE).is_err());
    }

    #[test]
    fn pixel_round_trip_and_clipping() {
        let mut canvas = Canvas::new(3, 2, WHITE).unwrap();
        let c = Color::new(1, 2, 3, 200);
        canvas.set_pixel(2, 1, c);
        assert_eq!(canvas.get_pixel(2, 1), Some(c));
        // Out-of-bounds writes are no-ops, reads are None.
        canvas.set_pixel(3, 0, c);
        canvas.set_pixel(0, -1, c);
        assert_eq!(canvas.get_pixel(3, 0), None);
        assert_eq!(canvas.get_pixel(0, 2), None);
        assert_eq!(canvas.bytes().len(), 3 * 2 * 4);
    }

    #[test]
    fn clear_stamps_every_pixel() {
        let mut canvas = Canvas::new(2, 2, WHITE).unwrap();
        canvas.clear(Color::new(9, 8, 7, 6));
        assert_eq!(canvas.bytes(), [9, 8, 7, 6].repeat(4).as_slice());
    }

    #[test]
    fn alpha_blit_composites() {
        let mut dst = Canvas::new(2, 2, WHITE).unwrap();
        let mut src = Canvas::new(2, 2, NamedColor::Transparent.color()).unwrap();
        src.set_pixel(0, 0, Color::new(255, 0, 0, 128));
        src.set_pixel(1, 0, Color::new(0, 0, 0, 0));
        src.set_pixel(0, 1, Color::new(0, 0, 0, 255));
        src.set_pixel(1, 1, Color::new(255, 255, 255, 128));
        dst.blit(&src, 0, 0);
        assert_eq!(dst.get_pixel(0, 0), Some(Color::rgb(255, 127, 127)));
        assert_eq!(dst.get_pixel(1, 0), Some(WHITE));
        assert_eq!(dst.get_pixel(0, 1), Some(Color::rgb(0, 0, 0)));
        assert_eq!(dst.get_pixel(1, 1), Some(WHITE));
    }

    #[test]
    fn blit_entirely_outside_writes_nothing() {
        let mut dst = Canvas::new(2, 2, WHITE).unwrap();
        let src = Canvas::new(2, 2, Color::rgb(0, 0, 0)).unwrap();
        let before = dst.clone();
        dst.blit(&src, 5, 5);
        dst.blit(&src, -2, -2);
        assert_eq!(dst, before);
    }

    #[test]
    fn load_rgba_clips_rows() {
        let mut canvas = Canvas::new(2, 2, WHITE).unwrap();
        let bytes: Vec<u8> = (0..16).collect();
        canvas.load_rgba(&bytes, 2, 2, 1, 1).unwrap();
        // Only the top-left source pixel lands, at (1, 1).
        assert_eq!(canvas.get_pixel(1, 1), Some(Color::new(0, 1, 2, 3)));
        assert_eq!(canvas.get_pixel(0, 0), Some(WHITE));
    }

    #[test]
    fn load_rgba_validates_length() {
        let mut canvas = Canvas::new(2, 2, WHITE).unwrap();
        assert!(canvas.load_rgba(&[0u8; 15], 2, 2, 0, 0).is_err());
    }
}
