pub mod animation;
pub mod composer;
pub mod layers;
pub mod raster;
pub mod surface;

pub use animation::Animator;
pub use composer::{DrawRequest, FrameComposer, FrameReport, LayerError};
pub use layers::MapItem;
pub use surface::{BlendMode, Surface};
