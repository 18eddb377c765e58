//! Bridge module - JS ↔ Rust communication with the hand detector
//!
//! Re-exports only in mod.rs, logic in submodules.

mod hand_landmarks;
mod mediapipe;

pub use hand_landmarks::{hands_from_results, Hand, HandLandmark, HAND_SKELETON};
pub use mediapipe::{create_camera, Camera, HandDetector};
