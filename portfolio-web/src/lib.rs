//! Portfolio Web - page effects in WebAssembly
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules

mod bridge;
mod config;
mod error;
mod renderer;
mod scene;
mod tilt;
mod tracking;
mod typing;

use wasm_bindgen::prelude::*;

pub use config::{DomConfig, HandTrackingConfig, PortfolioConfig, SceneConfig, TiltConfig, TypingConfig};
pub use error::PortfolioError;
pub use scene::{AmbientScene, ParallaxCamera, ParticleCloud, PointerPosition, Viewport};
pub use tilt::TiltTransform;
pub use tracking::{HandTrackingSession, PipelineFactory, SessionState, SessionUi, TrackingPipeline};
pub use typing::{TextCycler, TypingStep};

use renderer::AnimationLoop;
use tilt::TiltController;
use tracking::HandTracking;
use typing::TypingTask;

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_runtime() {
    console_error_panic_hook::set_once();
    // A second init (module re-instantiated) is harmless
    console_log::init_with_level(log::Level::Info).ok();
}

/// Boot every effect with the default configuration
#[wasm_bindgen]
pub async fn start() -> Result<PortfolioApp, JsValue> {
    Ok(boot(PortfolioConfig::default()).await?)
}

/// Boot with a JSON configuration; missing fields keep their defaults
#[wasm_bindgen]
pub async fn start_with_config(json: String) -> Result<PortfolioApp, JsValue> {
    let config = PortfolioConfig::from_json(&json)?;
    Ok(boot(config).await?)
}

async fn boot(config: PortfolioConfig) -> Result<PortfolioApp, PortfolioError> {
    config.validate()?;
    let window = web_sys::window().ok_or(PortfolioError::NoWindow)?;
    let document = window.document().ok_or(PortfolioError::NoDocument)?;
    let dom = &config.dom;

    let typed_output = document
        .get_element_by_id(&dom.typed_output_id)
        .ok_or_else(|| PortfolioError::MissingElement(format!("#{}", dom.typed_output_id)))?;
    let typing = typing::spawn_typing(typed_output, TextCycler::new(&config.typing)?);

    let tilt = TiltController::attach(&document, &dom.tilt_selector, config.tilt.clone())?;

    let hands = tracking::mount_hand_tracking(&document, dom, &config.hand_tracking)?;

    let ambient = match renderer::mount_ambient_scene(&window, &document, dom, &config.scene).await {
        Ok(ambient) => ambient,
        Err(e) => {
            log::error!("ambient scene failed to start: {}", e);
            return Err(e);
        }
    };

    log::info!(
        "portfolio started: {} tilt element(s), hand tracking {}",
        tilt.element_count(),
        if hands.is_some() { "available" } else { "disabled" }
    );

    Ok(PortfolioApp {
        typing: Some(typing),
        tilt: Some(tilt),
        ambient: Some(ambient),
        hands,
    })
}

/// Handle to the running page effects. Keep it alive for the page lifetime;
/// `shutdown` (or dropping it) stops every loop and detaches every listener.
#[wasm_bindgen]
pub struct PortfolioApp {
    typing: Option<TypingTask>,
    tilt: Option<TiltController>,
    ambient: Option<AnimationLoop>,
    hands: Option<HandTracking>,
}

#[wasm_bindgen]
impl PortfolioApp {
    /// Open the hand-tracking overlay if closed, close it if open
    pub fn toggle_hand_tracking(&self) -> Result<bool, JsValue> {
        let Some(hands) = &self.hands else {
            return Ok(false);
        };
        Ok(hands.toggle()? == SessionState::Active)
    }

    pub fn open_hand_tracking(&self) -> Result<bool, JsValue> {
        match &self.hands {
            Some(hands) => Ok(hands.open()?),
            None => Ok(false),
        }
    }

    pub fn close_hand_tracking(&self) -> bool {
        self.hands.as_ref().map(|h| h.close()).unwrap_or(false)
    }

    pub fn is_hand_tracking_active(&self) -> bool {
        self.hands.as_ref().map(|h| h.is_active()).unwrap_or(false)
    }

    /// Stop the typing and animation loops and detach all listeners
    pub fn shutdown(&mut self) {
        if let Some(typing) = self.typing.take() {
            typing.cancel();
        }
        if let Some(mut tilt) = self.tilt.take() {
            tilt.detach();
        }
        if let Some(ambient) = self.ambient.take() {
            ambient.stop();
        }
        if let Some(hands) = self.hands.take() {
            hands.close();
        }
        log::info!("portfolio shut down");
    }
}
