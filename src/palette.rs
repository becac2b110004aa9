//! Ordered palettes and perceptual nearest-color matching.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::color::{Color, NamedColor};
use crate::error::{Error, Result};

/// An ordered, immutable sequence of unique named colors.
///
/// The position of an entry is the stable integer the hardware understands
/// for that color. Each instance owns a memoization table for
/// [`nearest`](Palette::nearest), keyed by the 24-bit packed RGB of queried
/// colors; palette sizes are tiny (<= 7 entries) and per-frame working sets
/// are small, so the table is unbounded.
#[derive(Debug)]
pub struct Palette {
    entries: &'static [NamedColor],
    cache: Mutex<HashMap<u32, usize>>,
}

impl Palette {
    /// Builds a palette over `entries`.
    ///
    /// Fails when `entries` is empty or contains duplicates.
    pub fn new(entries: &'static [NamedColor]) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::invalid("palette must not be empty"));
        }
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].contains(entry) {
                return Err(Error::invalid(format!(
                    "duplicate palette entry `{}`",
                    entry.as_str()
                )));
            }
        }
        Ok(Palette {
            entries,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries in hardware index order.
    pub fn entries(&self) -> &'static [NamedColor] {
        self.entries
    }

    /// The hardware index of `name`.
    pub fn index_of(&self, name: NamedColor) -> Result<usize> {
        self.entries
            .iter()
            .position(|&e| e == name)
            .ok_or_else(|| Error::NotFound {
                name: name.as_str().into(),
                suggestions: self.entries.iter().map(|e| e.as_str().into()).collect(),
            })
    }

    /// The entry at hardware index `index`.
    pub fn color_at(&self, index: usize) -> Result<NamedColor> {
        self.entries
            .get(index)
            .copied()
            .ok_or_else(|| Error::NotFound {
                name: format!("palette index {index}"),
                suggestions: Vec::new(),
            })
    }

    /// The palette entry nearest to `color` under redmean distance, ignoring
    /// alpha. Ties resolve to the earlier entry.
    pub fn nearest(&self, color: Color) -> NamedColor {
        self.entries[self.nearest_index(color)]
    }

    /// Like [`nearest`](Palette::nearest), returning the hardware index.
    pub fn nearest_index(&self, color: Color) -> usize {
        let key = color.packed_rgb();
        let mut cache = self.cache.lock().expect("palette cache poisoned");
        if let Some(&idx) = cache.get(&key) {
            return idx;
        }
        let idx = self
            .entries
            .iter()
            .enumerate()
            .min_by_key(|(_, entry)| redmean_distance(color, entry.color()))
            .map(|(i, _)| i)
            .expect("palette is non-empty");
        cache.insert(key, idx);
        idx
    }
}

/// Redmean perceptual color distance, computed in integer arithmetic exactly
/// as the quantizer expects: the per-channel weights use truncating division
/// of the mean red by 256.
pub(crate) fn redmean_distance(a: Color, b: Color) -> i64 {
    let r_mean = (a.r as i64 + b.r as i64) / 2;
    let dr = a.r as i64 - b.r as i64;
    let dg = a.g as i64 - b.g as i64;
    let db = a.b as i64 - b.b as i64;
    (2 + r_mean / 256) * dr * dr + 4 * dg * dg + (2 + (255 - r_mean) / 256) * db * db
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PixelFormat;

    #[test]
    fn rejects_empty_and_duplicates() {
        assert!(Palette::new(&[]).is_err());
        assert!(Palette::new(&[NamedColor::Black, NamedColor::Black]).is_err());
    }

    #[test]
    fn index_round_trip() {
        let palette = PixelFormat::Color7.palette();
        for i in 0..palette.len() {
            let name = palette.color_at(i).unwrap();
            assert_eq!(palette.index_of(name).unwrap(), i);
        }
        assert!(palette.color_at(palette.len()).is_err());
        assert!(palette.index_of(NamedColor::DarkGray).is_err());
    }

    #[test]
    fn nearest_color4_vectors() {
        let palette = PixelFormat::Color4.palette();
        assert_eq!(palette.nearest(Color::rgb(128, 0, 0)), NamedColor::Red);
        assert_eq!(palette.nearest(Color::rgb(32, 32, 32)), NamedColor::Black);
        assert_eq!(palette.nearest(Color::rgb(220, 220, 220)), NamedColor::White);
        assert_eq!(palette.nearest(Color::rgb(200, 200, 0)), NamedColor::Yellow);
    }

    #[test]
    fn nearest_ignores_alpha() {
        let palette = PixelFormat::Mono.palette();
        assert_eq!(
            palette.nearest(Color::new(250, 250, 250, 0)),
            NamedColor::White
        );
    }

    #[test]
    fn nearest_is_cache_independent() {
        // Same query against a fresh palette and a warmed one must agree.
        let warmed = PixelFormat::Gray4.palette();
        for v in 0..=255u8 {
            warmed.nearest(Color::rgb(v, v, v));
        }
        let fresh = PixelFormat::Gray4.palette();
        for v in (0..=255u8).step_by(7) {
            let c = Color::rgb(v, v, v);
            assert_eq!(warmed.nearest(c), fresh.nearest(c));
        }
    }

    #[test]
    fn ties_break_toward_earlier_entry() {
        let palette = PixelFormat::Gray4.palette();
        // (0, 85, 0) is equidistant from black and dark gray under the
        // integer redmean weights; the earlier entry must win.
        let tie = Color::rgb(0, 85, 0);
        assert_eq!(
            redmean_distance(tie, NamedColor::Black.color()),
            redmean_distance(tie, NamedColor::DarkGray.color())
        );
        assert_eq!(palette.nearest(tie), NamedColor::Black);
    }
}
