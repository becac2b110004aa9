//! Text measurement, word wrapping and glyph compositing.
//!
//! Fonts are external: anything that can turn a code point into a coverage
//! bitmap plus metrics satisfies [`Font`]. The compositor overlays glyphs
//! pixel by pixel through [`Surface::plot_coverage`], so text lands
//! correctly on canvases (alpha blended) and bit-packed framebuffers
//! (thresholded) alike.

use crate::surface::Surface;

/// A rasterized glyph: one coverage byte per pixel, row-major.
#[derive(Debug, Clone)]
pub struct Glyph {
    pub bitmap: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Left side bearing from the pen position.
    pub bearing_x: i32,
    /// Distance from the baseline up to the bitmap's top row.
    pub bearing_y: i32,
    /// Pen advance to the next glyph.
    pub advance: i32,
}

/// The font contract consumed by the compositor.
pub trait Font {
    /// The rasterized glyph for `codepoint`, or `None` when the font has no
    /// coverage for it (the compositor then skips it without advancing).
    fn glyph(&self, codepoint: char) -> Option<Glyph>;

    /// Pixels above the baseline.
    fn ascent(&self) -> i32;

    /// Pixels below the baseline, as a positive value.
    fn descent(&self) -> i32;

    fn line_height(&self) -> i32 {
        self.ascent() + self.descent()
    }

    /// Pen advance for `codepoint` without rasterizing.
    fn advance(&self, codepoint: char) -> i32 {
        self.glyph(codepoint).map_or(0, |g| g.advance)
    }
}

/// Horizontal placement of each line, relative to the available width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Layout options for [`DrawText::draw_text`].
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub align: Align,
    /// Multiplier on the font's line height.
    pub line_spacing: f32,
    /// Wrap width; `None` renders each input line as-is.
    pub max_width: Option<u32>,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            align: Align::Left,
            line_spacing: 1.0,
            max_width: None,
        }
    }
}

/// The advance-sum width of a single line.
pub fn measure_line<F: Font + ?Sized>(font: &F, line: &str) -> i32 {
    line.chars().map(|c| font.advance(c)).sum()
}

/// Greedy word wrap over measured advances.
///
/// Input newlines always break; a word wider than `max_width` gets a line
/// of its own rather than being split.
pub fn wrap_lines<F: Font + ?Sized>(font: &F, text: &str, max_width: Option<u32>) -> Vec<String> {
    let mut lines = Vec::new();
    for input in text.split('\n') {
        let Some(max) = max_width else {
            lines.push(input.to_string());
            continue;
        };
        let max = max as i32;
        let mut current = String::new();
        for word in input.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if measure_line(font, &candidate) <= max || current.is_empty() {
                current = candidate;
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }
        lines.push(current);
    }
    lines
}

/// Text compositing, available on every [`Surface`].
pub trait DrawText: Surface {
    /// Renders `text` with its top-left corner at `(x, y)`.
    ///
    /// Lines wrap per `style.max_width` and are aligned within it; line
    /// pitch is the font's line height scaled by `style.line_spacing`.
    fn draw_text<F: Font + ?Sized>(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        font: &F,
        color: Self::Pixel,
        style: &TextStyle,
    ) -> &mut Self {
        let lines = wrap_lines(font, text, style.max_width);
        let pitch = (font.line_height() as f32 * style.line_spacing).round() as i32;
        for (i, line) in lines.iter().enumerate() {
            let line_x = match (style.align, style.max_width) {
                (Align::Left, _) | (_, None) => x,
                (Align::Center, Some(max)) => x + (max as i32 - measure_line(font, line)) / 2,
                (Align::Right, Some(max)) => x + max as i32 - measure_line(font, line),
            };
            let baseline = y + i as i32 * pitch + font.ascent();
            draw_line_glyphs(self, font, line, line_x, baseline, color);
        }
        self
    }
}

impl<S: Surface + ?Sized> DrawText for S {}

fn draw_line_glyphs<S: Surface + ?Sized, F: Font + ?Sized>(
    surface: &mut S,
    font: &F,
    line: &str,
    x: i32,
    baseline: i32,
    color: S::Pixel,
) {
    let mut pen = x;
    for c in line.chars() {
        let Some(glyph) = font.glyph(c) else {
            continue;
        };
        let gx = pen + glyph.bearing_x;
        let gy = baseline - glyph.bearing_y;
        for row in 0..glyph.height as i32 {
            for col in 0..glyph.width as i32 {
                let coverage = glyph.bitmap[(row * glyph.width as i32 + col) as usize];
                surface.plot_coverage(gx + col, gy + row, color, coverage);
            }
        }
        pen += glyph.advance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::color::Color;

    const W: Color = Color::rgb(255, 255, 255);
    const B: Color = Color::rgb(0, 0, 0);

    /// Every glyph is a solid 2x2 block on the baseline, advance 3.
    struct BlockFont;

    impl Font for BlockFont {
        fn glyph(&self, codepoint: char) -> Option<Glyph> {
            if codepoint == ' ' {
                return Some(Glyph {
                    bitmap: Vec::new(),
                    width: 0,
                    height: 0,
                    bearing_x: 0,
                    bearing_y: 0,
                    advance: 3,
                });
            }
            Some(Glyph {
                bitmap: vec![255; 4],
                width: 2,
                height: 2,
                bearing_x: 0,
                bearing_y: 2,
                advance: 3,
            })
        }

        fn ascent(&self) -> i32 {
            2
        }

        fn descent(&self) -> i32 {
            1
        }
    }

    #[test]
    fn measure_sums_advances() {
        assert_eq!(measure_line(&BlockFont, "ab"), 6);
        assert_eq!(measure_line(&BlockFont, ""), 0);
    }

    #[test]
    fn glyphs_land_on_the_baseline() {
        let mut c = Canvas::new(8, 4, W).unwrap();
        c.draw_text(0, 0, "ab", &BlockFont, B, &TextStyle::default());
        // Ascent 2, bearing 2: bitmaps occupy rows 0..2.
        for (x, y) in [(0, 0), (1, 1), (3, 0), (4, 1)] {
            assert_eq!(c.get_pixel(x, y), Some(B), "({x},{y})");
        }
        assert_eq!(c.get_pixel(2, 0), Some(W));
        assert_eq!(c.get_pixel(0, 2), Some(W));
    }

    #[test]
    fn wrapping_is_greedy_over_advances() {
        // "ab cd ef" at 3 per char: "ab cd" is 15 wide.
        let lines = wrap_lines(&BlockFont, "ab cd ef", Some(15));
        assert_eq!(lines, vec!["ab cd".to_string(), "ef".to_string()]);
        // An overlong word gets its own line.
        let lines = wrap_lines(&BlockFont, "abcdefgh ab", Some(9));
        assert_eq!(lines, vec!["abcdefgh".to_string(), "ab".to_string()]);
    }

    #[test]
    fn explicit_newlines_always_break() {
        let lines = wrap_lines(&BlockFont, "ab\ncd", None);
        assert_eq!(lines, vec!["ab".to_string(), "cd".to_string()]);
    }

    #[test]
    fn line_pitch_scales_with_spacing() {
        let mut c = Canvas::new(8, 10, W).unwrap();
        let style = TextStyle {
            line_spacing: 2.0,
            ..TextStyle::default()
        };
        c.draw_text(0, 0, "a\na", &BlockFont, B, &style);
        // Line height 3 doubled: second glyph top at y = 6.
        assert_eq!(c.get_pixel(0, 0), Some(B));
        assert_eq!(c.get_pixel(0, 6), Some(B));
        assert_eq!(c.get_pixel(0, 3), Some(W));
    }

    #[test]
    fn center_and_right_alignment() {
        let style = |align| TextStyle {
            align,
            max_width: Some(12),
            ..TextStyle::default()
        };
        let mut c = Canvas::new(12, 3, W).unwrap();
        c.draw_text(0, 0, "ab", &BlockFont, B, &style(Align::Center));
        // Line width 6 in 12: starts at x = 3.
        assert_eq!(c.get_pixel(3, 0), Some(B));
        assert_eq!(c.get_pixel(0, 0), Some(W));

        let mut c = Canvas::new(12, 3, W).unwrap();
        c.draw_text(0, 0, "ab", &BlockFont, B, &style(Align::Right));
        // Starts at x = 6; last glyph covers x = 9..11 minus advance slack.
        assert_eq!(c.get_pixel(6, 0), Some(B));
        assert_eq!(c.get_pixel(10, 0), Some(B));
        assert_eq!(c.get_pixel(5, 0), Some(W));
    }

    #[test]
    fn semitransparent_coverage_blends_on_canvas() {
        struct HalfFont;
        impl Font for HalfFont {
            fn glyph(&self, _: char) -> Option<Glyph> {
                Some(Glyph {
                    bitmap: vec![128],
                    width: 1,
                    height: 1,
                    bearing_x: 0,
                    bearing_y: 1,
                    advance: 2,
                })
            }
            fn ascent(&self) -> i32 {
                1
            }
            fn descent(&self) -> i32 {
                0
            }
        }
        let mut c = Canvas::new(2, 2, W).unwrap();
        c.draw_text(0, 0, "x", &HalfFont, Color::rgb(255, 0, 0), &TextStyle::default());
        assert_eq!(c.get_pixel(0, 0), Some(Color::rgb(255, 127, 127)));
    }
}
