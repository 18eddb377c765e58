//! Renderer module - wgpu particle background and 2D hand overlay
//!
//! Re-exports only. All logic in submodules.

mod state;
mod shapes;
mod points;
mod animation;
mod overlay;

pub use animation::{mount_ambient_scene, AnimationLoop};
pub use overlay::{OverlayPainter, OverlayStyle};
