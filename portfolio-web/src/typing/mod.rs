//! Typed banner - reveal/erase phrases one character at a time
//!
//! Re-exports only. All logic in submodules.

mod cycler;
mod driver;

pub use cycler::{TextCycler, TypingStep};
pub use driver::{spawn_typing, TypingTask};
