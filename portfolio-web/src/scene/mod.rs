//! Ambient scene - particle cloud, parallax camera and per-frame update
//!
//! Pure state and arithmetic only; GPU work lives in `renderer`.

mod pointer;
mod particles;
mod camera;
mod ambient;

pub use pointer::PointerPosition;
pub use particles::ParticleCloud;
pub use camera::ParallaxCamera;
pub use ambient::{AmbientScene, Viewport};
