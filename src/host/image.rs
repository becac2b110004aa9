//! Image decoding through the `image` crate.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::canvas::Canvas;
use crate::error::{Error, Result};

/// A decoded image normalized to 8-bit RGBA, ready to land on a canvas.
///
/// Gray, gray+alpha, RGB and RGBA sources all normalize through the
/// decoder; exotic color models are limited to what the backing crate
/// understands.
#[derive(Debug, Clone)]
pub struct ImageSource {
    rgba: RgbaImage,
}

impl ImageSource {
    /// Decodes a file from disk.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let decoded = image::open(path.as_ref())
            .map_err(|e| Error::invalid(format!("could not decode image: {e}")))?;
        Ok(ImageSource {
            rgba: decoded.to_rgba8(),
        })
    }

    /// Wraps raw RGBA bytes.
    pub fn from_rgba_bytes(bytes: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let rgba = RgbaImage::from_raw(width, height, bytes)
            .ok_or_else(|| Error::invalid("RGBA byte length does not match dimensions"))?;
        Ok(ImageSource { rgba })
    }

    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    /// Raw RGBA bytes, row-major.
    pub fn bytes(&self) -> &[u8] {
        self.rgba.as_raw()
    }

    /// Resampled copy at the new size.
    pub fn resize(&self, width: u32, height: u32) -> Self {
        ImageSource {
            rgba: imageops::resize(&self.rgba, width, height, FilterType::Triangle),
        }
    }

    /// Cropped copy, clipped to the source extent.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        ImageSource {
            rgba: imageops::crop_imm(&self.rgba, x, y, width, height).to_image(),
        }
    }

    /// Copies the pixels onto `canvas` with the top-left corner at
    /// `(x, y)`, clipped to the canvas.
    pub fn draw_to(&self, canvas: &mut Canvas, x: i32, y: i32) -> Result<()> {
        canvas.load_rgba(self.rgba.as_raw(), self.width(), self.height(), x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, NamedColor};
    use crate::surface::Surface;

    #[test]
    fn raw_bytes_round_trip_onto_a_canvas() {
        let bytes = vec![
            255, 0, 0, 255, //
            0, 255, 0, 255, //
            0, 0, 255, 255, //
            255, 255, 255, 255,
        ];
        let source = ImageSource::from_rgba_bytes(bytes, 2, 2).unwrap();
        let mut canvas = Canvas::new(2, 2, NamedColor::Black.color()).unwrap();
        source.draw_to(&mut canvas, 0, 0).unwrap();
        assert_eq!(canvas.get_pixel(0, 0), Some(Color::rgb(255, 0, 0)));
        assert_eq!(canvas.get_pixel(1, 1), Some(Color::rgb(255, 255, 255)));
    }

    #[test]
    fn crop_and_resize_change_extent() {
        let source = ImageSource::from_rgba_bytes(vec![128; 4 * 4 * 4], 4, 4).unwrap();
        assert_eq!(source.crop(1, 1, 2, 2).width(), 2);
        let doubled = source.resize(8, 8);
        assert_eq!((doubled.width(), doubled.height()), (8, 8));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        assert!(ImageSource::from_rgba_bytes(vec![0; 15], 2, 2).is_err());
    }
}
