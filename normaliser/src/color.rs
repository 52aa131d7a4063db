//! 8-bit RGB sample type.

/// One RGB sample with channels in `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// HSL lightness in `[0.0, 1.0]`: the mean of the largest and smallest channel.
    pub fn brightness(&self) -> f32 {
        let max = self.r.max(self.g).max(self.b) as f32;
        let min = self.r.min(self.g).min(self.b) as f32;
        (max + min) / (2.0 * 255.0)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(arr: [u8; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_bounds() {
        assert_eq!(Rgb::BLACK.brightness(), 0.0);
        assert_eq!(Rgb::WHITE.brightness(), 1.0);
    }

    #[test]
    fn brightness_uses_extreme_channels() {
        // max 200, min 0
        let c = Rgb::new(200, 100, 0);
        assert!((c.brightness() - 200.0 / 510.0).abs() < 1e-6);

        // Channel order does not matter.
        assert_eq!(Rgb::new(0, 100, 200).brightness(), c.brightness());
    }

    #[test]
    fn array_conversions() {
        let c: Rgb = [1, 2, 3].into();
        assert_eq!(c, Rgb::new(1, 2, 3));
        let arr: [u8; 3] = c.into();
        assert_eq!(arr, [1, 2, 3]);
    }
}
