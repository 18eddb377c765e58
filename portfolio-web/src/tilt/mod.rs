//! Card tilt - pointer-driven 3D rotation of tiltable elements
//!
//! Re-exports only. All logic in submodules.

mod transform;
mod controller;

pub use transform::TiltTransform;
pub use controller::TiltController;
