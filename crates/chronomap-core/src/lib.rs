pub mod cache;
pub mod canvas;
pub mod clock;
pub mod config;
pub mod consts;
pub mod error;
pub mod gesture;
pub mod menu;
pub mod render;
pub mod tiles;
pub mod view;
