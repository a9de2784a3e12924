//! Palette struct with ordered storage and first-wins nearest-color matching.

use std::sync::Arc;

use crate::color::Rgb;
use crate::error::Error;

/// An immutable, ordered sequence of output colors.
///
/// Order is part of the contract: [`Palette::find_nearest`] scans entries in
/// order with a strict less-than comparison, so when two entries are equally
/// close the one listed first wins. Duplicate entries are accepted (several
/// classic hardware palettes repeat colors); the later copy can never be
/// selected.
///
/// Cloning is cheap; the colors are shared.
///
/// # Example
///
/// ```
/// use pixel_quant::{Palette, Rgb};
///
/// let palette = Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap();
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.find_nearest(Rgb::new(200, 190, 210)), (1, Rgb::WHITE));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Arc<[Rgb]>,
}

impl Palette {
    /// Create a palette from colors in priority order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPalette`] if `colors` is empty.
    pub fn new(colors: &[Rgb]) -> Result<Self, Error> {
        if colors.is_empty() {
            return Err(Error::InvalidPalette);
        }
        Ok(Self {
            colors: colors.into(),
        })
    }

    /// Create a palette from hex color strings (`#RRGGBB` or `#RGB`).
    ///
    /// # Example
    ///
    /// ```
    /// use pixel_quant::Palette;
    ///
    /// let gameboy = Palette::from_hex(&["#0F380F", "#306230", "#8BAC0F", "#9BBC0F"]).unwrap();
    /// assert_eq!(gameboy.get(3).unwrap().to_hex(), "#9BBC0F");
    /// ```
    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Self, Error> {
        let colors = hex
            .iter()
            .map(|s| s.as_ref().parse::<Rgb>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&colors)
    }

    /// Number of entries, duplicates included.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; a palette has at least one entry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<Rgb> {
        self.colors.get(idx).copied()
    }

    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.colors.iter().copied()
    }

    /// Whether `color` is exactly one of the entries.
    #[inline]
    pub fn contains(&self, color: Rgb) -> bool {
        self.colors.contains(&color)
    }

    /// Find the entry closest to `color` by Euclidean RGB distance.
    ///
    /// Returns `(index, color)`. The scan keeps the first minimum it sees, so
    /// ties resolve to the lowest index.
    #[inline]
    pub fn find_nearest(&self, color: Rgb) -> (usize, Rgb) {
        let mut best_idx = 0;
        let mut best_dist = u32::MAX;

        for (i, &entry) in self.colors.iter().enumerate() {
            let dist = color.distance_sq(entry);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
                if dist == 0 {
                    break;
                }
            }
        }

        (best_idx, self.colors[best_idx])
    }

    /// Entries formatted as `#RRGGBB`.
    pub fn to_hex_strings(&self) -> Vec<String> {
        self.iter().map(Rgb::to_hex).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseColorError;

    #[test]
    fn test_palette_basic_construction() {
        let palette = Palette::new(&[Rgb::BLACK, Rgb::WHITE]).unwrap();
        assert_eq!(palette.len(), 2);
        assert!(!palette.is_empty());
        assert_eq!(palette.get(0), Some(Rgb::BLACK));
        assert_eq!(palette.get(2), None);
    }

    #[test]
    fn test_palette_empty_error() {
        assert_eq!(Palette::new(&[]), Err(Error::InvalidPalette));
        let none: [&str; 0] = [];
        assert_eq!(Palette::from_hex(&none), Err(Error::InvalidPalette));
    }

    #[test]
    fn test_palette_allows_duplicates() {
        let palette =
            Palette::from_hex(&["#0F380F", "#306230", "#8BAC0F", "#306230"]).unwrap();
        assert_eq!(palette.len(), 4);
        // The second copy is never chosen.
        let (idx, _) = palette.find_nearest(Rgb::new(0x30, 0x62, 0x30));
        assert_eq!(idx, 1);
    }

    #[test]
    fn test_find_nearest_exact_match() {
        let palette = Palette::from_hex(&["#000000", "#0000AA", "#00AA00", "#AAAAAA"]).unwrap();
        for (i, color) in palette.iter().enumerate() {
            assert_eq!(palette.find_nearest(color), (i, color));
        }
    }

    #[test]
    fn test_find_nearest_tie_prefers_first_entry() {
        // (100, 100, 100) is 50 away from both entries.
        let a = Rgb::new(50, 100, 100);
        let b = Rgb::new(150, 100, 100);
        let input = Rgb::new(100, 100, 100);

        let ab = Palette::new(&[a, b]).unwrap();
        let ba = Palette::new(&[b, a]).unwrap();
        for _ in 0..3 {
            assert_eq!(ab.find_nearest(input), (0, a));
            assert_eq!(ba.find_nearest(input), (0, b));
        }
    }

    #[test]
    fn test_find_nearest_euclidean() {
        let palette = Palette::from_hex(&["#000000", "#FF0000", "#FFFFFF"]).unwrap();
        assert_eq!(palette.find_nearest(Rgb::new(200, 30, 20)).0, 1);
        assert_eq!(palette.find_nearest(Rgb::new(40, 40, 40)).0, 0);
        assert_eq!(palette.find_nearest(Rgb::new(220, 200, 210)).0, 2);
    }

    #[test]
    fn test_from_hex_invalid() {
        assert_eq!(
            Palette::from_hex(&["#000000", "#ZZZZZZ"]),
            Err(Error::ParseColor(ParseColorError::InvalidHex('Z')))
        );
    }

    #[test]
    fn test_to_hex_strings() {
        let palette = Palette::new(&[Rgb::new(0xAA, 0x55, 0x00), Rgb::WHITE]).unwrap();
        assert_eq!(palette.to_hex_strings(), vec!["#AA5500", "#FFFFFF"]);
    }
}
