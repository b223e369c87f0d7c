use image::RgbaImage;

use crate::cache::LayerKey;
use crate::error::ChronoError;
use crate::view::ScreenRect;

/// What the host wants repainted.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawRequest {
    Full,
    /// Only these screen regions changed.
    Damage(Vec<ScreenRect>),
}

impl DrawRequest {
    /// Whether the request covers the whole `width x height` screen.
    pub fn is_full(&self, width: u32, height: u32) -> bool {
        match self {
            DrawRequest::Full => true,
            DrawRequest::Damage(rects) => {
                let screen = ScreenRect::new(0.0, 0.0, width as f64, height as f64);
                rects.iter().any(|r| r.contains_rect(&screen))
            }
        }
    }
}

/// A layer that could not be rendered this frame.
#[derive(Debug)]
pub struct LayerError {
    pub layer: LayerKey,
    pub error: ChronoError,
}

/// What happened while composing one frame.
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Background, terrain and items were painted afresh rather than
    /// restored from the previous frame.
    pub recomposited: bool,
    /// Layers painted this frame, bottom to top.
    pub layers: Vec<LayerKey>,
    pub errors: Vec<LayerError>,
}

impl FrameReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Frame-to-frame bookkeeping for the draw sequence.
///
/// The static part of a frame (background, terrain, items) is kept so a
/// pure animation frame only restores it instead of recompositing.
#[derive(Default)]
pub struct FrameComposer {
    base: Option<RgbaImage>,
    animation_event: bool,
    invalidated: bool,
}

impl FrameComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next frame is driven by an animation tick.
    pub fn mark_animation_frame(&mut self) {
        self.animation_event = true;
    }

    /// A cached layer changed since the last frame.
    pub fn mark_invalidated(&mut self) {
        self.invalidated = true;
    }

    pub fn is_animation_frame(&self) -> bool {
        self.animation_event
    }

    pub fn needs_recomposite(&self, request: &DrawRequest, width: u32, height: u32) -> bool {
        let base_usable = self
            .base
            .as_ref()
            .is_some_and(|b| b.dimensions() == (width, height));
        !self.animation_event || self.invalidated || request.is_full(width, height) || !base_usable
    }

    /// Copy the stored static layers into `dst`. Returns false if there is
    /// nothing stored at that size.
    pub fn restore_base(&self, dst: &mut RgbaImage) -> bool {
        match &self.base {
            Some(base) if base.dimensions() == dst.dimensions() => {
                dst.copy_from_slice(base);
                true
            }
            _ => false,
        }
    }

    /// Remember `frame` as the static layers, or forget them when `None`.
    pub fn store_base(&mut self, frame: Option<&RgbaImage>) {
        match frame {
            Some(f) => match &mut self.base {
                Some(base) if base.dimensions() == f.dimensions() => base.copy_from_slice(f),
                _ => self.base = Some(f.clone()),
            },
            None => self.base = None,
        }
    }

    pub fn finish_frame(&mut self) {
        self.animation_event = false;
        self.invalidated = false;
    }
}
