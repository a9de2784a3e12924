//! 8-bit RGB color.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseColorError;

/// A color with three 8-bit channels.
///
/// Values are always within 0..=255 by construction; there is no alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Unweighted average of the three channels.
    ///
    /// This is the brightness key extracted palettes are sorted by.
    #[inline]
    pub fn mean_luminance(self) -> f32 {
        (self.r as f32 + self.g as f32 + self.b as f32) / 3.0
    }

    /// Squared Euclidean distance in RGB space.
    ///
    /// Ordering by squared distance is identical to ordering by distance, so
    /// nearest-color searches compare these directly.
    #[inline]
    pub fn distance_sq(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    /// Format as `#RRGGBB` (uppercase).
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(bytes: [u8; 3]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB`.
    ///
    /// Case-insensitive; surrounding whitespace is ignored. Shorthand digits
    /// expand by repetition (`#F80` is `#FF8800`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        let digits = s
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8).ok_or(ParseColorError::InvalidHex(c)))
            .collect::<Result<Vec<u8>, _>>();

        // Length is checked first so "#FFFF" reports the length, not a digit.
        match s.chars().count() {
            3 => {
                let d = digits?;
                Ok(Self::new(d[0] * 17, d[1] * 17, d[2] * 17))
            }
            6 => {
                let d = digits?;
                Ok(Self::new(
                    (d[0] << 4) | d[1],
                    (d[2] << 4) | d[3],
                    (d[4] << 4) | d[5],
                ))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}
