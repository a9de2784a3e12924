//! Error diffusion kernel definition.

/// An error diffusion kernel.
///
/// Each entry is an offset `(dx, dy)` to a neighbour that has not been
/// visited yet in a row-major scan, and the weight it receives. A neighbour
/// gets `error * weight / divisor`.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries; `dy` is never negative.
    pub entries: &'static [(i32, i32, u8)],

    /// Total divisor for normalizing weights.
    pub divisor: u8,
}

impl Kernel {
    /// Fraction of the error one entry receives.
    #[inline]
    pub fn share(&self, weight: u8) -> f32 {
        weight as f32 / self.divisor as f32
    }
}

/// Floyd-Steinberg kernel, 16/16 of the error spread over 4 neighbours.
///
/// ```text
///        X   7
///    3   5   1
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[
        (1, 0, 7),  // right
        (-1, 1, 3), // bottom-left
        (0, 1, 5),  // bottom
        (1, 1, 1),  // bottom-right
    ],
    divisor: 16,
};
