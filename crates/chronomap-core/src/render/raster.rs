//! Anti-aliased drawing into RGBA buffers.
//!
//! Shapes are signed distance functions sampled at pixel centers; coverage
//! is a smoothstep across one pixel of the boundary.

use image::RgbaImage;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::view::Point;

/// Run `f(y, row)` over rows `y0..y1`, in parallel for large bands.
pub(crate) fn for_each_row<F>(img: &mut RgbaImage, y0: u32, y1: u32, f: F)
where
    F: Fn(u32, &mut [u8]) + Sync + Send,
{
    let y1 = y1.min(img.height());
    let row_bytes = img.width() as usize * 4;
    if row_bytes == 0 || y0 >= y1 {
        return;
    }
    let raw: &mut [u8] = &mut **img;
    let band = &mut raw[y0 as usize * row_bytes..y1 as usize * row_bytes];
    if band.len() / 4 >= PARALLEL_PIXEL_THRESHOLD {
        band.par_chunks_mut(row_bytes)
            .enumerate()
            .for_each(|(i, row)| f(y0 + i as u32, row));
    } else {
        band.chunks_mut(row_bytes)
            .enumerate()
            .for_each(|(i, row)| f(y0 + i as u32, row));
    }
}

/// Source-over blend of a straight-alpha color with extra coverage.
#[inline]
pub(crate) fn blend_over(dst: &mut [u8], color: [u8; 4], coverage: f32) {
    let sa = color[3] as f32 / 255.0 * coverage;
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let s = color[c] as f32;
        let d = dst[c] as f32;
        dst[c] = ((s * sa + d * da * (1.0 - sa)) / out_a).round() as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Fill every pixel whose center has `sdf <= 0` inside the given bounds.
fn fill_sdf<F>(img: &mut RgbaImage, bounds: (f64, f64, f64, f64), color: [u8; 4], sdf: F)
where
    F: Fn(f32, f32) -> f32 + Sync + Send,
{
    let (min_x, min_y, max_x, max_y) = bounds;
    let x0 = min_x.floor().max(0.0) as u32;
    let y0 = min_y.floor().max(0.0) as u32;
    let x1 = (max_x.ceil().max(0.0) as u32).min(img.width());
    let y1 = (max_y.ceil().max(0.0) as u32).min(img.height());
    if x0 >= x1 || y0 >= y1 {
        return;
    }
    for_each_row(img, y0, y1, |y, row| {
        let py = y as f32 + 0.5;
        for x in x0..x1 {
            let d = sdf(x as f32 + 0.5, py);
            let coverage = smoothstep(0.5, -0.5, d);
            if coverage > 0.0 {
                let i = x as usize * 4;
                blend_over(&mut row[i..i + 4], color, coverage);
            }
        }
    });
}

pub fn fill(img: &mut RgbaImage, color: [u8; 4]) {
    for px in img.pixels_mut() {
        px.0 = color;
    }
}

/// Axis-aligned rectangle, no anti-aliasing.
pub fn fill_rect(img: &mut RgbaImage, x: f64, y: f64, w: f64, h: f64, color: [u8; 4]) {
    let x0 = x.round().max(0.0) as u32;
    let y0 = y.round().max(0.0) as u32;
    let x1 = ((x + w).round().max(0.0) as u32).min(img.width());
    let y1 = ((y + h).round().max(0.0) as u32).min(img.height());
    for yy in y0..y1 {
        for xx in x0..x1 {
            blend_over(&mut img.get_pixel_mut(xx, yy).0, color, 1.0);
        }
    }
}

pub fn fill_circle(img: &mut RgbaImage, center: Point, radius: f64, color: [u8; 4]) {
    let (cx, cy, r) = (center.x as f32, center.y as f32, radius as f32);
    let pad = radius + 1.0;
    fill_sdf(
        img,
        (center.x - pad, center.y - pad, center.x + pad, center.y + pad),
        color,
        move |px, py| (px - cx).hypot(py - cy) - r,
    );
}

/// Ring between `inner` and `outer` radius.
pub fn fill_annulus(img: &mut RgbaImage, center: Point, inner: f64, outer: f64, color: [u8; 4]) {
    let (cx, cy) = (center.x as f32, center.y as f32);
    let (ri, ro) = (inner as f32, outer as f32);
    let pad = outer + 1.0;
    fill_sdf(
        img,
        (center.x - pad, center.y - pad, center.x + pad, center.y + pad),
        color,
        move |px, py| {
            let d = (px - cx).hypot(py - cy);
            (d - ro).max(ri - d)
        },
    );
}

/// Circle outline of the given stroke width, centered on `radius`.
pub fn stroke_circle(img: &mut RgbaImage, center: Point, radius: f64, width: f64, color: [u8; 4]) {
    let (cx, cy, r) = (center.x as f32, center.y as f32, radius as f32);
    let half = width as f32 / 2.0;
    let pad = radius + width + 1.0;
    fill_sdf(
        img,
        (center.x - pad, center.y - pad, center.x + pad, center.y + pad),
        color,
        move |px, py| ((px - cx).hypot(py - cy) - r).abs() - half,
    );
}

#[inline]
fn segment_distance(px: f32, py: f32, a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((px - a.0) * dx + (py - a.1) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let cx = a.0 + t * dx;
    let cy = a.1 + t * dy;
    (px - cx).hypot(py - cy)
}

/// Connected line through `points` with round joins and caps. A single
/// point draws a dot.
pub fn stroke_polyline(img: &mut RgbaImage, points: &[Point], width: f64, color: [u8; 4]) {
    let Some(first) = points.first() else {
        return;
    };
    let half = width / 2.0;
    let mut bounds = (first.x, first.y, first.x, first.y);
    for p in points {
        bounds.0 = bounds.0.min(p.x);
        bounds.1 = bounds.1.min(p.y);
        bounds.2 = bounds.2.max(p.x);
        bounds.3 = bounds.3.max(p.y);
    }
    let pad = half + 1.0;
    let bounds = (bounds.0 - pad, bounds.1 - pad, bounds.2 + pad, bounds.3 + pad);

    let pts: Vec<(f32, f32)> = points.iter().map(|p| (p.x as f32, p.y as f32)).collect();
    let segments: Vec<((f32, f32), (f32, f32))> = if pts.len() == 1 {
        vec![(pts[0], pts[0])]
    } else {
        pts.windows(2).map(|w| (w[0], w[1])).collect()
    };
    let half = half as f32;
    let reach = half + 1.0;

    fill_sdf(img, bounds, color, move |px, py| {
        let mut best = f32::MAX;
        for &(a, b) in &segments {
            if py < a.1.min(b.1) - reach || py > a.1.max(b.1) + reach {
                continue;
            }
            best = best.min(segment_distance(px, py, a, b));
        }
        best - half
    });
}

/// 3x5 bitmap glyphs for `0`-`9`, one row per entry, high bit on the left.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b010, 0b010, 0b010],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// Draw the decimal form of `value` centered on `center`, `height` pixels
/// tall.
pub fn draw_number(img: &mut RgbaImage, value: usize, center: Point, height: f64, color: [u8; 4]) {
    let text = value.to_string();
    let cell = height / 5.0;
    let glyphs = text.len() as f64;
    let total_w = (glyphs * 3.0 + (glyphs - 1.0)) * cell;
    let mut left = center.x - total_w / 2.0;
    let top = center.y - height / 2.0;

    for ch in text.bytes() {
        let glyph = DIGITS[(ch - b'0') as usize];
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..3 {
                if bits & (0b100 >> col) != 0 {
                    fill_rect(
                        img,
                        left + col as f64 * cell,
                        top + row as f64 * cell,
                        cell,
                        cell,
                        color,
                    );
                }
            }
        }
        left += 4.0 * cell;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_over_opaque_replaces() {
        let mut px = [10, 20, 30, 255];
        blend_over(&mut px, [200, 100, 50, 255], 1.0);
        assert_eq!(px, [200, 100, 50, 255]);
    }

    #[test]
    fn test_blend_over_onto_transparent() {
        let mut px = [0, 0, 0, 0];
        blend_over(&mut px, [200, 100, 50, 128], 1.0);
        assert_eq!(px, [200, 100, 50, 128]);
    }

    #[test]
    fn test_fill_circle_center_and_outside() {
        let mut img = RgbaImage::new(20, 20);
        fill_circle(&mut img, Point::new(10.0, 10.0), 4.0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(10, 10).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(1, 1).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_polyline_single_point_draws_dot() {
        let mut img = RgbaImage::new(10, 10);
        stroke_polyline(&mut img, &[Point::new(5.0, 5.0)], 3.0, [0, 255, 0, 255]);
        assert_eq!(img.get_pixel(5, 5).0[1], 255);
    }
}
