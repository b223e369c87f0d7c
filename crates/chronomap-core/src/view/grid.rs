//! Grid quantization and enumeration over terrain rectangles.
//!
//! Sequences are built from integer step counts (`n * step`), never by
//! repeated float addition, so long runs of fine steps do not drift.

use super::TerrainRect;

/// Largest multiple of `m` that is `<= x`. `m` must be positive.
pub fn quantize_down(x: f64, m: f64) -> f64 {
    debug_assert!(m > 0.0, "grid step must be positive");
    let q = (x / m).floor() * m;
    if q > x {
        q - m
    } else if q + m <= x {
        q + m
    } else {
        q
    }
}

/// Smallest multiple of `m` that is `>= x`. `m` must be positive.
pub fn quantize_up(x: f64, m: f64) -> f64 {
    debug_assert!(m > 0.0, "grid step must be positive");
    let q = (x / m).ceil() * m;
    if q < x {
        q + m
    } else if q - m >= x {
        q - m
    } else {
        q
    }
}

/// Multiples of `step` from `floor(start / step)` up to (excluding)
/// `ceil(stop / step)`.
///
/// An empty or inverted range, or a non-positive step, yields nothing.
pub fn quantized_range(start: f64, stop: f64, step: f64) -> impl Iterator<Item = f64> + Clone {
    let (first, last) = if start < stop && step > 0.0 && start.is_finite() && stop.is_finite() {
        ((start / step).floor() as i64, (stop / step).ceil() as i64)
    } else {
        (0, 0)
    };
    (first..last).map(move |n| n as f64 * step)
}

/// Top-left corners of every `w x h` grid cell overlapping `rect`,
/// x-major (all rows of the first column first).
pub fn grid_points(rect: TerrainRect, w: f64, h: f64) -> impl Iterator<Item = (f64, f64)> {
    let ys = quantized_range(rect.top, rect.bottom, h);
    quantized_range(rect.left, rect.right, w).flat_map(move |x| ys.clone().map(move |y| (x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_exact_multiple() {
        assert_eq!(quantize_down(30.0, 15.0), 30.0);
        assert_eq!(quantize_up(30.0, 15.0), 30.0);
    }

    #[test]
    fn test_quantize_negative() {
        assert_eq!(quantize_down(-1.0, 15.0), -15.0);
        assert_eq!(quantize_up(-1.0, 15.0), 0.0);
    }

    #[test]
    fn test_range_invalid_is_empty() {
        assert_eq!(quantized_range(5.0, 5.0, 1.0).count(), 0);
        assert_eq!(quantized_range(6.0, 5.0, 1.0).count(), 0);
        assert_eq!(quantized_range(0.0, 5.0, 0.0).count(), 0);
    }
}
