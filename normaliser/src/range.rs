//! Brightness extrema and their reduction.

use crate::color::Rgb;

/// Minimum and maximum brightness observed over a set of samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrightnessRange {
    pub min: f32,
    pub max: f32,
}

impl BrightnessRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Scans `pixels` once. Both extrema are seeded from the first sample,
    /// so an empty slice has no range.
    pub fn of_pixels(pixels: &[Rgb]) -> Option<Self> {
        let (first, rest) = pixels.split_first()?;
        let seed = first.brightness();

        Some(rest.iter().fold(Self::new(seed, seed), |range, px| {
            range.include(px.brightness())
        }))
    }

    /// Reduces per-chunk ranges to one range, seeded from the first of them.
    pub fn aggregate<I>(ranges: I) -> Option<Self>
    where
        I: IntoIterator<Item = BrightnessRange>,
    {
        ranges.into_iter().reduce(Self::merge)
    }

    pub fn include(self, value: f32) -> Self {
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
        }
    }

    pub fn merge(self, other: BrightnessRange) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    pub fn is_flat(&self) -> bool {
        self.max == self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pixels_have_no_range() {
        assert_eq!(BrightnessRange::of_pixels(&[]), None);
    }

    #[test]
    fn single_pixel_is_flat() {
        let range = BrightnessRange::of_pixels(&[Rgb::new(51, 51, 51)]).unwrap();
        assert!(range.is_flat());
        assert!((range.min - 0.2).abs() < 1e-6);
    }

    #[test]
    fn bright_pixels_do_not_floor_at_zero() {
        let pixels = [Rgb::new(200, 200, 200), Rgb::new(100, 100, 100), Rgb::WHITE];
        let range = BrightnessRange::of_pixels(&pixels).unwrap();
        assert!((range.min - 100.0 / 255.0).abs() < 1e-6);
        assert_eq!(range.max, 1.0);
    }

    #[test]
    fn dark_pixels_do_not_ceil_at_zero() {
        let pixels = [Rgb::new(10, 10, 10), Rgb::new(30, 30, 30)];
        let range = BrightnessRange::of_pixels(&pixels).unwrap();
        assert!((range.max - 30.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn aggregate_takes_min_of_mins_and_max_of_maxes() {
        let ranges = [
            BrightnessRange::new(0.4, 0.6),
            BrightnessRange::new(0.2, 0.5),
            BrightnessRange::new(0.5, 0.9),
        ];
        assert_eq!(
            BrightnessRange::aggregate(ranges),
            Some(BrightnessRange::new(0.2, 0.9))
        );
    }

    #[test]
    fn aggregate_is_seeded_from_first_range() {
        let ranges = [BrightnessRange::new(0.3, 0.4), BrightnessRange::new(0.35, 0.38)];
        assert_eq!(
            BrightnessRange::aggregate(ranges),
            Some(BrightnessRange::new(0.3, 0.4))
        );
        assert_eq!(BrightnessRange::aggregate([]), None);
    }
}
