//! Canvas-to-framebuffer quantization strategies.
//!
//! Every strategy walks the canvas's raw RGBA buffer and writes palette
//! indices into a framebuffer of the same dimensions, sharing the palette's
//! memoized nearest-color lookup.

use crate::canvas::Canvas;
use crate::color::Color;
use crate::framebuffer::Framebuffer;
use crate::palette::Palette;
use crate::surface::Surface;

/// 4x4 Bayer threshold matrix, row-major.
const BAYER_4X4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

/// Floyd-Steinberg error weights, in sixteenths: right, below-left, below,
/// below-right.
const FS_WEIGHTS: [i32; 4] = [7, 3, 5, 1];

/// How canvas colors quantize down to the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dither {
    /// Straight nearest-color per pixel. Sharp but posterizes gradients.
    Threshold,
    /// Ordered dithering with the 4x4 Bayer matrix; a regular halftone
    /// pattern that keeps pure black and white untouched.
    Ordered,
    /// Floyd-Steinberg error diffusion; best for photographic content.
    #[default]
    FloydSteinberg,
}

impl Dither {
    /// Quantizes `canvas` into `fb`, which the caller has sized to match.
    pub(crate) fn apply(self, canvas: &Canvas, fb: &mut Framebuffer, palette: &Palette) {
        match self {
            Dither::Threshold => threshold(canvas, fb, palette),
            Dither::Ordered => ordered(canvas, fb, palette),
            Dither::FloydSteinberg => floyd_steinberg(canvas, fb, palette),
        }
    }
}

fn pixel_at(canvas: &Canvas, x: i32, y: i32) -> Color {
    let i = (y as usize * canvas.width() as usize + x as usize) * 4;
    let bytes = canvas.bytes();
    Color::new(bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3])
}

fn threshold(canvas: &Canvas, fb: &mut Framebuffer, palette: &Palette) {
    for y in 0..canvas.height() as i32 {
        for x in 0..canvas.width() as i32 {
            let idx = palette.nearest_index(pixel_at(canvas, x, y));
            fb.set_index(x, y, idx as u8);
        }
    }
}

fn ordered(canvas: &Canvas, fb: &mut Framebuffer, palette: &Palette) {
    // Spread scales with palette size so small palettes get the full
    // halftone range.
    let spread = 256.0 / palette.len() as f64;
    for y in 0..canvas.height() as i32 {
        for x in 0..canvas.width() as i32 {
            let cell = BAYER_4X4[y as usize % 4][x as usize % 4] as f64 / 16.0;
            let offset = (cell - 0.5) * spread;
            let p = pixel_at(canvas, x, y);
            let shift = |c: u8| (c as f64 + offset).round().clamp(0.0, 255.0) as u8;
            let idx = palette.nearest_index(Color::rgb(shift(p.r), shift(p.g), shift(p.b)));
            fb.set_index(x, y, idx as u8);
        }
    }
}

fn floyd_steinberg(canvas: &Canvas, fb: &mut Framebuffer, palette: &Palette) {
    let width = canvas.width() as usize;
    // Palette RGBs are materialized once; the per-pixel loop only touches
    // integers and the memoized nearest lookup.
    let entry_rgb: Vec<Color> = palette.entries().iter().map(|e| e.color()).collect();
    // Two alternating rows of per-channel error accumulators.
    let mut current = vec![[0i32; 3]; width];
    let mut next = vec![[0i32; 3]; width];
    for y in 0..canvas.height() as i32 {
        for x in 0..canvas.width() as i32 {
            let p = pixel_at(canvas, x, y);
            let err = current[x as usize];
            let adjusted = [
                (p.r as i32 + err[0]).clamp(0, 255),
                (p.g as i32 + err[1]).clamp(0, 255),
                (p.b as i32 + err[2]).clamp(0, 255),
            ];
            let idx = palette.nearest_index(Color::rgb(
                adjusted[0] as u8,
                adjusted[1] as u8,
                adjusted[2] as u8,
            ));
            fb.set_index(x, y, idx as u8);
            let chosen = entry_rgb[idx];
            let residual = [
                adjusted[0] - chosen.r as i32,
                adjusted[1] - chosen.g as i32,
                adjusted[2] - chosen.b as i32,
            ];
            let mut spill = |row: &mut Vec<[i32; 3]>, xx: i32, weight: i32| {
                if xx >= 0 && (xx as usize) < width {
                    for c in 0..3 {
                        row[xx as usize][c] += residual[c] * weight / 16;
                    }
                }
            };
            spill(&mut current, x + 1, FS_WEIGHTS[0]);
            spill(&mut next, x - 1, FS_WEIGHTS[1]);
            spill(&mut next, x, FS_WEIGHTS[2]);
            spill(&mut next, x + 1, FS_WEIGHTS[3]);
        }
        core::mem::swap(&mut current, &mut next);
        next.iter_mut().for_each(|e| *e = [0; 3]);
    }
}
