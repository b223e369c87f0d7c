use image::{imageops, RgbaImage};

use crate::consts::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::view::Point;

use super::raster::{blend_over, for_each_row};

/// A rendered layer: pixels plus where they sit relative to the layer's
/// anchor on screen.
#[derive(Clone, Debug)]
pub struct Surface {
    pub pixels: RgbaImage,
    /// Offset of the top-left pixel from the anchor, in screen pixels.
    pub origin: Point,
    /// Every pixel is fully opaque, so painting can copy instead of blend.
    pub opaque: bool,
}

impl Surface {
    pub fn new(width: u32, height: u32, origin: Point) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            origin,
            opaque: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Top-left corner on screen when anchored at `anchor`.
    pub fn placement(&self, anchor: Point) -> (i64, i64) {
        (
            (anchor.x + self.origin.x).round() as i64,
            (anchor.y + self.origin.y).round() as i64,
        )
    }

    /// Composite onto `dst` with the anchor at screen position `anchor`.
    /// Parts falling outside `dst` are clipped.
    pub fn paint_onto(&self, dst: &mut RgbaImage, anchor: Point) {
        let (x, y) = self.placement(anchor);
        if self.opaque {
            imageops::replace(dst, &self.pixels, x, y);
        } else {
            imageops::overlay(dst, &self.pixels, x, y);
        }
    }
}

/// How source pixels combine with the destination in [`blit_scaled`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Replace,
    /// Source over destination.
    Over,
    /// Keep the destination's hue and saturation, take the source's
    /// luminance. On a white ground this renders the source as grayscale.
    Luminosity,
}

/// Draw `src` stretched over the destination rectangle `(x, y, w, h)`
/// with nearest-neighbour sampling.
///
/// Rectangle edges are rounded to whole pixels so abutting tiles share
/// their seams exactly.
pub fn blit_scaled(dst: &mut RgbaImage, src: &RgbaImage, rect: (f64, f64, f64, f64), mode: BlendMode) {
    let (x, y, w, h) = rect;
    if !(w > 0.0 && h > 0.0) || src.width() == 0 || src.height() == 0 {
        return;
    }
    let left = x.round();
    let top = y.round();
    let right = (x + w).round();
    let bottom = (y + h).round();
    let x0 = left.max(0.0) as u32;
    let y0 = top.max(0.0) as u32;
    let x1 = (right.max(0.0) as u32).min(dst.width());
    let y1 = (bottom.max(0.0) as u32).min(dst.height());
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let span_w = right - left;
    let span_h = bottom - top;
    let (sw, sh) = (src.width(), src.height());

    for_each_row(dst, y0, y1, |py, row| {
        let v = (py as f64 + 0.5 - top) / span_h;
        let sy = ((v * sh as f64) as u32).min(sh - 1);
        for px in x0..x1 {
            let u = (px as f64 + 0.5 - left) / span_w;
            let sx = ((u * sw as f64) as u32).min(sw - 1);
            let s = src.get_pixel(sx, sy).0;
            let i = px as usize * 4;
            let d = &mut row[i..i + 4];
            match mode {
                BlendMode::Replace => d.copy_from_slice(&s),
                BlendMode::Over => blend_over(d, s, 1.0),
                BlendMode::Luminosity => blend_luminosity(d, s),
            }
        }
    });
}

fn lum(c: [f32; 3]) -> f32 {
    LUMINANCE_R * c[0] + LUMINANCE_G * c[1] + LUMINANCE_B * c[2]
}

fn clip_color(c: [f32; 3]) -> [f32; 3] {
    let l = lum(c);
    let n = c[0].min(c[1]).min(c[2]);
    let x = c[0].max(c[1]).max(c[2]);
    let mut out = c;
    if n < 0.0 {
        for v in &mut out {
            *v = l + (*v - l) * l / (l - n);
        }
    }
    if x > 1.0 {
        for v in &mut out {
            *v = l + (*v - l) * (1.0 - l) / (x - l);
        }
    }
    out
}

fn set_lum(c: [f32; 3], l: f32) -> [f32; 3] {
    let d = l - lum(c);
    clip_color([c[0] + d, c[1] + d, c[2] + d])
}

fn blend_luminosity(dst: &mut [u8], src: [u8; 4]) {
    let sa = src[3] as f32 / 255.0;
    if sa <= 0.0 {
        return;
    }
    let s = [
        src[0] as f32 / 255.0,
        src[1] as f32 / 255.0,
        src[2] as f32 / 255.0,
    ];
    let d = [
        dst[0] as f32 / 255.0,
        dst[1] as f32 / 255.0,
        dst[2] as f32 / 255.0,
    ];
    let mixed = set_lum(d, lum(s));
    for c in 0..3 {
        let v = d[c] * (1.0 - sa) + mixed[c] * sa;
        dst[c] = (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    let da = dst[3] as f32 / 255.0;
    dst[3] = ((sa + da * (1.0 - sa)) * 255.0).round() as u8;
}
