//! Canvas-to-framebuffer rendering.

use crate::canvas::Canvas;
use crate::dither::Dither;
use crate::error::{Error, Result};
use crate::format::PixelFormat;
use crate::framebuffer::Framebuffer;
use crate::palette::Palette;
use crate::surface::Surface;

/// Quantizes canvases into one pixel format with one dither strategy.
///
/// The renderer owns the palette instance (and with it the nearest-color
/// cache), so rendering many frames of similar content stays cheap.
#[derive(Debug)]
pub struct Renderer {
    format: PixelFormat,
    dither: Dither,
    palette: Palette,
}

impl Renderer {
    pub fn new(format: PixelFormat, dither: Dither) -> Self {
        Renderer {
            format,
            dither,
            palette: format.palette(),
        }
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn dither(&self) -> Dither {
        self.dither
    }

    /// Renders `canvas` into a freshly allocated framebuffer.
    pub fn render(&self, canvas: &Canvas) -> Result<Framebuffer> {
        let mut fb = Framebuffer::new(canvas.width(), canvas.height(), self.format)?;
        self.dither.apply(canvas, &mut fb, &self.palette);
        Ok(fb)
    }

    /// Renders `canvas` into an existing framebuffer, which must match the
    /// canvas dimensions and the renderer's format.
    pub fn render_into(&self, canvas: &Canvas, fb: &mut Framebuffer) -> Result<()> {
        if fb.format() != self.format {
            return Err(Error::invalid(format!(
                "framebuffer format {:?} does not match renderer format {:?}",
                fb.format(),
                self.format
            )));
        }
        if fb.width() != canvas.width() || fb.height() != canvas.height() {
            return Err(Error::invalid(format!(
                "framebuffer is {}x{}, canvas is {}x{}",
                fb.width(),
                fb.height(),
                canvas.width(),
                canvas.height()
            )));
        }
        self.dither.apply(canvas, fb, &self.palette);
        Ok(())
    }

    /// Renders `canvas` into separate black and red mono planes for
    /// black/white/red panels.
    ///
    /// Only meaningful for the `color4` format: the canvas is quantized
    /// once with the configured dither strategy, then routed per pixel.
    /// Yellow and red both land on the chromatic plane.
    pub fn render_dual(&self, canvas: &Canvas) -> Result<(Framebuffer, Framebuffer)> {
        if self.format != PixelFormat::Color4 {
            return Err(Error::invalid(format!(
                "dual-channel rendering requires color4, renderer is {:?}",
                self.format
            )));
        }
        let quantized = self.render(canvas)?;
        let mut black = Framebuffer::new(canvas.width(), canvas.height(), PixelFormat::Mono)?;
        let mut red = Framebuffer::new(canvas.width(), canvas.height(), PixelFormat::Mono)?;
        for y in 0..quantized.height() as i32 {
            for x in 0..quantized.width() as i32 {
                // Plane bits by color4 index: black marks the achromatic
                // plane, yellow and red mark the chromatic plane.
                let (black_bit, red_bit) = match quantized.index_at(x, y) {
                    0 => (0, 1),
                    1 => (1, 1),
                    _ => (1, 0),
                };
                black.set_index(x, y, black_bit);
                red.set_index(x, y, red_bit);
            }
        }
        Ok((black, red))
    }

    /// The palette shared by this renderer's dither passes.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}
