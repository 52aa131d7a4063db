//! Per-chunk pixel transforms applied once the global range is published.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::range::BrightnessRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformKind {
    /// Swaps channels depending on the chunk index. Ignores brightness.
    #[default]
    ChannelPermutation,
    /// Rescales each sample from the chunk's own range into the global range.
    LinearRescale,
}

impl TransformKind {
    const EXPECTED: &'static str = "channel-permutation, linear-rescale";

    /// Transforms one sample of chunk `chunk_index`.
    ///
    /// `local` is the chunk's own brightness range, `global` the range
    /// aggregated over every chunk.
    pub fn apply(
        &self,
        pixel: Rgb,
        chunk_index: usize,
        local: BrightnessRange,
        global: BrightnessRange,
    ) -> Rgb {
        match self {
            TransformKind::ChannelPermutation => permute_channels(pixel, chunk_index),
            TransformKind::LinearRescale => rescale(pixel, local, global),
        }
    }
}

impl FromStr for TransformKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "channel-permutation" | "permute" => Ok(Self::ChannelPermutation),
            "linear-rescale" | "rescale" => Ok(Self::LinearRescale),
            _ => Err(Error::UnknownVariant {
                kind: "transform",
                value: s.to_string(),
                expected: Self::EXPECTED,
            }),
        }
    }
}

/// Index divisible by 3 swaps G and B, other even indices swap R and B,
/// odd indices swap R and G. The mod-3 check wins, so chunk 0 and 6 take the
/// first branch.
pub fn permute_channels(pixel: Rgb, chunk_index: usize) -> Rgb {
    let Rgb { r, g, b } = pixel;
    if chunk_index % 3 == 0 {
        Rgb::new(r, b, g)
    } else if chunk_index % 2 == 0 {
        Rgb::new(b, g, r)
    } else {
        Rgb::new(g, r, b)
    }
}

/// Multiplies every channel by
/// `(brightness - old.min) * (new.max - new.min) / (old.max - old.min) + new.min`,
/// rounding up and clamping to `0..=255`.
///
/// A flat `old` range has no spread to rescale; the pixel is returned as is.
pub fn rescale(pixel: Rgb, old: BrightnessRange, new: BrightnessRange) -> Rgb {
    if old.is_flat() {
        return pixel;
    }

    let factor = (pixel.brightness() - old.min) * (new.span() / old.span()) + new.min;
    let scale = |channel: u8| (channel as f32 * factor).ceil().clamp(0.0, 255.0) as u8;

    Rgb::new(scale(pixel.r), scale(pixel.g), scale(pixel.b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PX: Rgb = Rgb::new(10, 20, 30);

    #[test]
    fn permutation_by_chunk_index() {
        assert_eq!(permute_channels(PX, 0), Rgb::new(10, 30, 20));
        assert_eq!(permute_channels(PX, 1), Rgb::new(20, 10, 30));
        assert_eq!(permute_channels(PX, 2), Rgb::new(30, 20, 10));
        assert_eq!(permute_channels(PX, 3), Rgb::new(10, 30, 20));
        assert_eq!(permute_channels(PX, 4), Rgb::new(30, 20, 10));
        assert_eq!(permute_channels(PX, 5), Rgb::new(20, 10, 30));
    }

    #[test]
    fn mod_three_takes_precedence_over_mod_two() {
        // 6 is even, but the mod-3 branch applies.
        assert_eq!(permute_channels(PX, 6), Rgb::new(10, 30, 20));
        assert_eq!(permute_channels(PX, 12), Rgb::new(10, 30, 20));
        assert_eq!(permute_channels(PX, 8), Rgb::new(30, 20, 10));
    }

    #[test]
    fn permutation_ignores_ranges() {
        let a = BrightnessRange::new(0.0, 1.0);
        let b = BrightnessRange::new(0.3, 0.4);
        let kind = TransformKind::ChannelPermutation;
        assert_eq!(kind.apply(PX, 2, a, b), kind.apply(PX, 2, b, a));
    }

    #[test]
    fn rescale_flat_range_is_identity() {
        let flat = BrightnessRange::new(0.5, 0.5);
        let global = BrightnessRange::new(0.0, 1.0);
        assert_eq!(rescale(PX, flat, global), PX);
    }

    #[test]
    fn rescale_maps_range_bounds() {
        let old = BrightnessRange::new(0.0, 1.0);
        let new = BrightnessRange::new(0.0, 1.0);

        // brightness 1.0 -> factor 1.0
        assert_eq!(rescale(Rgb::WHITE, old, new), Rgb::WHITE);
        // brightness 0.0 -> factor 0.0
        assert_eq!(rescale(Rgb::BLACK, old, new), Rgb::BLACK);
    }

    #[test]
    fn rescale_clamps_to_channel_range() {
        let old = BrightnessRange::new(0.0, 0.1);
        let new = BrightnessRange::new(0.0, 1.0);
        // factor well above 1.0
        assert_eq!(rescale(Rgb::new(200, 200, 200), old, new), Rgb::WHITE);
    }

    #[test]
    fn kind_from_str() {
        assert_eq!(
            "linear-rescale".parse::<TransformKind>().unwrap(),
            TransformKind::LinearRescale
        );
        assert_eq!(
            "permute".parse::<TransformKind>().unwrap(),
            TransformKind::ChannelPermutation
        );
        assert!("invert".parse::<TransformKind>().is_err());
    }
}
