//! TrueType fonts through `rusttype`.

use rusttype::{point, Scale};

use crate::error::{Error, Result};
use crate::text::{Font, Glyph};

/// A TrueType/OpenType font rasterized at a fixed pixel height.
pub struct TrueTypeFont {
    font: rusttype::Font<'static>,
    scale: Scale,
}

impl TrueTypeFont {
    /// Parses font data and fixes the rasterization height in pixels.
    pub fn from_bytes(data: Vec<u8>, height_px: f32) -> Result<Self> {
        let font = rusttype::Font::try_from_vec(data)
            .ok_or_else(|| Error::invalid("font data did not parse"))?;
        if height_px <= 0.0 {
            return Err(Error::invalid(format!(
                "font height must be positive, got {height_px}"
            )));
        }
        Ok(TrueTypeFont {
            font,
            scale: Scale::uniform(height_px),
        })
    }

    pub fn from_file(path: impl AsRef<std::path::Path>, height_px: f32) -> Result<Self> {
        let data = std::fs::read(path.as_ref())
            .map_err(|e| Error::invalid(format!("could not read font file: {e}")))?;
        Self::from_bytes(data, height_px)
    }
}

impl Font for TrueTypeFont {
    fn glyph(&self, codepoint: char) -> Option<Glyph> {
        let glyph = self.font.glyph(codepoint);
        if glyph.id().0 == 0 {
            return None;
        }
        let scaled = glyph.scaled(self.scale);
        let advance = scaled.h_metrics().advance_width.round() as i32;
        let positioned = scaled.positioned(point(0.0, 0.0));
        match positioned.pixel_bounding_box() {
            Some(bb) => {
                let width = (bb.max.x - bb.min.x) as u32;
                let height = (bb.max.y - bb.min.y) as u32;
                let mut bitmap = vec![0u8; (width * height) as usize];
                positioned.draw(|x, y, coverage| {
                    bitmap[(y * width + x) as usize] = (coverage * 255.0).round() as u8;
                });
                Some(Glyph {
                    bitmap,
                    width,
                    height,
                    bearing_x: bb.min.x,
                    bearing_y: -bb.min.y,
                    advance,
                })
            }
            // Whitespace and other mark-free glyphs still advance the pen.
            None => Some(Glyph {
                bitmap: Vec::new(),
                width: 0,
                height: 0,
                bearing_x: 0,
                bearing_y: 0,
                advance,
            }),
        }
    }

    fn ascent(&self) -> i32 {
        self.font.v_metrics(self.scale).ascent.round() as i32
    }

    fn descent(&self) -> i32 {
        (-self.font.v_metrics(self.scale).descent).round() as i32
    }
}
