/// Wheel delta that doubles (or zeroes) the scale in one step: `factor = 1 + dy / ZOOM_DIVISOR`.
pub const ZOOM_DIVISOR: f64 = 50.0;

/// Default lower bound for terrain units per screen pixel.
pub const DEFAULT_SCALE_MIN: f64 = 0.1;

/// Default upper bound for terrain units per screen pixel.
pub const DEFAULT_SCALE_MAX: f64 = 10.0;

/// Default redraw margin (screen pixels) on each side of the viewport.
pub const DEFAULT_REDRAW_MARGIN: f64 = 250.0;

/// Default double-tap window in seconds.
pub const DEFAULT_DOUBLE_TAP_INTERVAL: f64 = 0.2;

/// Longest accepted double-tap window in seconds.
pub const MAX_DOUBLE_TAP_INTERVAL: f64 = 5.0;

/// Largest accepted redraw margin in screen pixels.
pub const MAX_REDRAW_MARGIN: f64 = 2048.0;

/// Default number of radial menu sectors.
pub const DEFAULT_MENU_SECTORS: usize = 12;

/// Inner radius of the menu ring as a fraction of the outer radius.
/// Pointer offsets closer than this to the anchor select nothing.
pub const MENU_INNER_RATIO: f64 = 0.6;

/// Distance of sector icon centers from the anchor, as a fraction of the radius.
pub const MENU_ICON_RING_RATIO: f64 = 0.8;

/// Sector icon radius as a fraction of the menu radius.
pub const MENU_ICON_RATIO: f64 = 0.2;

/// Largest deviation (in sectors) from a sector center that still selects it.
pub const MENU_SNAP_TOLERANCE: f64 = 0.25;

/// Upper bound on the menu radius in screen pixels.
pub const MENU_MAX_RADIUS: f64 = 250.0;

/// Terrain units per degree of longitude/latitude.
pub const DEFAULT_DEGREE_SIZE: f64 = 42.0;

/// Degrees covered by one topography tile along each axis.
pub const DEFAULT_TILE_DEGREES: f64 = 15.0;

/// Biome rasters start one tile row below the north edge of the topography grid.
pub const BIOME_VERTICAL_OFFSET_TILES: f64 = 1.0;

/// Oldest selectable time parameter, in years before present.
pub const MAX_YEARS_BP: u32 = 120_000;

/// Top of the exponential years-BP slider.
pub const YEARS_SLIDER_MAX: f64 = 100.0;

/// Growth base of the exponential years-BP slider.
pub const YEARS_SLIDER_BASE: f64 = 1.05;

/// Loaded tiles kept before the tile cache is flushed.
pub const TILE_CACHE_MAX_ENTRIES: usize = 256;

/// Minimum pixel count of a blit to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;
