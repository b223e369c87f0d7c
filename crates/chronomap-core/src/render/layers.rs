//! Render functions for each canvas layer.
//!
//! Each function depends only on its arguments; the canvas memoizes the
//! results and invalidates them when an argument changes.

use std::rc::Rc;

use tracing::debug;

use crate::config::CanvasConfig;
use crate::consts::BIOME_VERTICAL_OFFSET_TILES;
use crate::error::Result;
use crate::menu::RadialMenu;
use crate::tiles::{DetailTier, Region, TileCache, TileProvider};
use crate::view::grid::grid_points;
use crate::view::{Point, ViewportState};

use super::raster::{draw_number, fill, fill_annulus, fill_circle, stroke_circle, stroke_polyline};
use super::surface::{blit_scaled, BlendMode, Surface};

/// A disc drawn on the items layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapItem {
    /// Terrain coordinates of the center.
    pub x: f64,
    pub y: f64,
    /// Radius in screen pixels, independent of zoom.
    pub radius: f64,
    pub color: [u8; 4],
}

/// Opaque screen-sized fill, for backends that cannot composite alpha
/// onto an empty target.
pub fn render_background(width: u32, height: u32, color: [u8; 3]) -> Surface {
    let mut surface = Surface::new(width, height, Point::default());
    fill(&mut surface.pixels, [color[0], color[1], color[2], 255]);
    surface.opaque = true;
    surface
}

/// Surface covering the screen plus the redraw margin on every side,
/// anchored at the terrain origin as it was on screen at render time.
fn viewport_anchored(view: &ViewportState, margin_x: f64, margin_y: f64) -> (Surface, Point) {
    let (w, h) = view.screen_size();
    let sw = (w as f64 + 2.0 * margin_x).round().max(1.0);
    let sh = (h as f64 + 2.0 * margin_y).round().max(1.0);
    let pan = view.pan();
    let origin = Point::new(-sw / 2.0 - pan.x, -sh / 2.0 - pan.y);
    // Surface pixel of terrain (0, 0).
    let zero = Point::new(sw / 2.0 + pan.x, sh / 2.0 + pan.y);
    (Surface::new(sw as u32, sh as u32, origin), zero)
}

/// Topography tiles of the extended viewport as grayscale relief on
/// white, with the epoch's biome raster on top.
///
/// The first tile the provider cannot supply fails the whole layer.
pub fn render_terrain(
    view: &ViewportState,
    config: &CanvasConfig,
    epoch: Option<i32>,
    tiles: &mut TileCache,
    provider: &dyn TileProvider,
) -> Result<Surface> {
    let (mx, my) = (config.redraw_margin_x, config.redraw_margin_y);
    let (mut surface, zero) = viewport_anchored(view, mx, my);
    fill(&mut surface.pixels, [255, 255, 255, 255]);
    surface.opaque = true;

    let scale = view.scale();
    let terrain = &config.terrain;
    let span = terrain.tile_span();
    let tier = DetailTier::for_scale(scale);
    let to_px = |t: f64, zero: f64| t / scale + zero;

    let mut drawn = 0usize;
    for (x, y) in grid_points(view.extended(mx, my), span, span) {
        let lon = (x / terrain.degree_size).round() as i32;
        let lat = -(y / terrain.degree_size).round() as i32;
        if !(-90..90).contains(&lat) {
            continue;
        }
        let region = Region::topography(lon, lat, tier);
        let tile = tiles.get_or_render(&region, || provider.fetch(&region))?;
        blit_scaled(
            &mut surface.pixels,
            &tile.image,
            (to_px(x, zero.x), to_px(y, zero.y), span / scale, span / scale),
            BlendMode::Luminosity,
        );
        drawn += 1;
    }

    if let Some(epoch) = epoch {
        let region = Region::Biome { epoch };
        let biome = tiles.get_or_render(&region, || provider.fetch(&region))?;
        let left = -terrain.earth_width() / 2.0;
        let top = -terrain.earth_height() / 2.0 + BIOME_VERTICAL_OFFSET_TILES * span;
        blit_scaled(
            &mut surface.pixels,
            &biome.image,
            (
                to_px(left, zero.x),
                to_px(top, zero.y),
                terrain.earth_width() / scale,
                terrain.earth_height() / scale,
            ),
            BlendMode::Over,
        );
    }

    debug!(tiles = drawn, ?tier, ?epoch, "terrain rendered");
    Ok(surface)
}

/// Items as discs, anchored like the terrain layer.
pub fn render_items(view: &ViewportState, config: &CanvasConfig, items: &[MapItem]) -> Surface {
    let (mut surface, zero) = viewport_anchored(view, config.redraw_margin_x, config.redraw_margin_y);
    let scale = view.scale();
    let (w, h) = (surface.width() as f64, surface.height() as f64);
    for item in items {
        let center = Point::new(item.x / scale + zero.x, item.y / scale + zero.y);
        let r = item.radius;
        if center.x + r < 0.0 || center.y + r < 0.0 || center.x - r > w || center.y - r > h {
            continue;
        }
        fill_circle(&mut surface.pixels, center, r, item.color);
    }
    surface
}

/// The live freehand stroke, in screen space.
pub fn render_path(view: &ViewportState, config: &CanvasConfig, points: &[Point]) -> Surface {
    let (w, h) = view.screen_size();
    let mut surface = Surface::new(w, h, Point::default());
    stroke_polyline(&mut surface.pixels, points, config.path_width, config.path_color);
    surface
}

fn half_bright(c: [u8; 3]) -> [u8; 4] {
    [c[0] / 2, c[1] / 2, c[2] / 2, 255]
}

/// One sector icon, anchored at its own center.
pub fn render_menu_sector(index: usize, active: bool, radius: f64) -> Surface {
    let size = (2.0 * radius).ceil().max(1.0);
    let mut surface = Surface::new(size as u32, size as u32, Point::new(-size / 2.0, -size / 2.0));
    let center = Point::new(size / 2.0, size / 2.0);
    let base = RadialMenu::sector_color(index);
    let full = [base[0], base[1], base[2], 255];
    let numeral_height = radius * 0.8;

    if active {
        fill_circle(&mut surface.pixels, center, radius, full);
        stroke_circle(&mut surface.pixels, center, radius - 1.0, 2.0, half_bright(base));
        draw_number(&mut surface.pixels, index, center, numeral_height, half_bright(base));
    } else {
        fill_circle(&mut surface.pixels, center, radius, half_bright(base));
        draw_number(&mut surface.pixels, index, center, numeral_height, full);
    }
    surface
}

/// The ring with every sector icon, anchored at the menu center.
/// `icons[n]` is the already-rendered icon for sector `n`.
pub fn render_menu(menu: &RadialMenu, icons: &[Rc<Surface>], ring_color: [u8; 4]) -> Surface {
    let r = menu.radius();
    let size = (2.0 * r).ceil().max(1.0);
    let mut surface = Surface::new(size as u32, size as u32, Point::new(-size / 2.0, -size / 2.0));
    let center = Point::new(size / 2.0, size / 2.0);

    if ring_color[3] > 0 {
        fill_annulus(&mut surface.pixels, center, menu.inner_radius(), r, ring_color);
    }
    for (index, icon) in icons.iter().enumerate() {
        let c = menu.sector_center(index);
        icon.paint_onto(&mut surface.pixels, Point::new(center.x + c.x, center.y + c.y));
    }
    surface
}
