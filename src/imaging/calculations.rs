//! Pure calculation functions for layout dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;

/// Height limits applied when sizing an image for layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBounds {
    /// Images taller than this are scaled down to it.
    pub max_height: u32,
    /// When set, images shorter than this (after capping) are scaled up to it.
    pub min_height: Option<u32>,
}

impl SizeBounds {
    /// Cap height only; smaller images keep their native size.
    pub fn cap(max_height: u32) -> Self {
        Self {
            max_height,
            min_height: None,
        }
    }

    /// Cap and floor at the same height, so every image lands on it exactly.
    pub fn exact(height: u32) -> Self {
        Self {
            max_height: height,
            min_height: Some(height),
        }
    }
}

/// Compute the layout size for an image, preserving aspect ratio.
///
/// The image is first scaled down (never up) to fit `max_height`. If a
/// `min_height` is set and the result is still shorter, it is scaled up from
/// the capped size. Both edges are rounded half away from zero and never
/// drop below 1px.
///
/// # Examples
/// ```
/// # use media_manifest::imaging::{compute_target_size, Dimensions, SizeBounds};
/// let gif = Dimensions { width: 40, height: 20 };
/// assert_eq!(
///     compute_target_size(gif, SizeBounds::exact(300)),
///     Dimensions { width: 600, height: 300 }
/// );
/// assert_eq!(compute_target_size(gif, SizeBounds::cap(300)), gif);
/// ```
pub fn compute_target_size(source: Dimensions, bounds: SizeBounds) -> Dimensions {
    let Dimensions { width, height } = source;
    let scale = (bounds.max_height as f64 / height as f64).min(1.0);
    let mut w = scaled(width, scale);
    let mut h = scaled(height, scale);

    if let Some(min_height) = bounds.min_height
        && h < min_height
    {
        let upscale = min_height as f64 / h as f64;
        w = scaled(w, upscale);
        h = scaled(h, upscale);
    }

    Dimensions {
        width: w,
        height: h,
    }
}

fn scaled(value: u32, factor: f64) -> u32 {
    ((value as f64 * factor).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    #[test]
    fn small_gif_is_upscaled_to_exact_height() {
        // 40x20 → factor 15 → 600x300
        assert_eq!(compute_target_size(dims(40, 20), SizeBounds::exact(300)), dims(600, 300));
    }

    #[test]
    fn tall_gif_is_capped_to_exact_height() {
        // 400x600 → factor 0.5 → 200x300
        assert_eq!(compute_target_size(dims(400, 600), SizeBounds::exact(300)), dims(200, 300));
    }

    #[test]
    fn small_still_keeps_native_size() {
        assert_eq!(compute_target_size(dims(40, 20), SizeBounds::cap(300)), dims(40, 20));
    }

    #[test]
    fn tall_still_is_scaled_down() {
        // 1200x900 → factor 1/3 → 400x300
        assert_eq!(compute_target_size(dims(1200, 900), SizeBounds::cap(300)), dims(400, 300));
    }

    #[test]
    fn height_equal_to_cap_is_untouched() {
        assert_eq!(compute_target_size(dims(500, 300), SizeBounds::cap(300)), dims(500, 300));
    }

    #[test]
    fn width_rounds_half_away_from_zero() {
        // 1001x600 → factor 0.5 → 500.5 → 501
        assert_eq!(compute_target_size(dims(1001, 600), SizeBounds::cap(300)), dims(501, 300));
    }

    #[test]
    fn extreme_panorama_never_collapses_to_zero() {
        // 1x3000 → factor 0.1 → width 0.1 rounds to 0, clamped to 1
        assert_eq!(compute_target_size(dims(1, 3000), SizeBounds::cap(300)), dims(1, 300));
    }

    #[test]
    fn upscale_derives_from_capped_size() {
        // 3x7 with cap 5 and floor 5: capped to 2x5 (2.14 → 2), already at floor
        assert_eq!(compute_target_size(dims(3, 7), SizeBounds::exact(5)), dims(2, 5));
    }
}
