//! Webcam hand tracking - session lifecycle and browser wiring
//!
//! Re-exports only. All logic in submodules.

mod session;
mod web;

pub use session::{HandTrackingSession, PipelineFactory, SessionState, SessionUi, TrackingPipeline};
pub use web::{mount_hand_tracking, HandTracking};
