//! Bindings to the MediaPipe `Hands` detector and `Camera` utility
//!
//! Both are loaded by the page as globals. Option objects are built from
//! serde structs through `JSON.parse`; callbacks are attached with
//! `Reflect::set`.

use js_sys::{Function, Object, Promise, Reflect, JSON};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::HtmlVideoElement;

use crate::config::HandTrackingConfig;
use crate::error::PortfolioError;

#[wasm_bindgen]
extern "C" {
    /// MediaPipe Hands solution
    pub type Hands;

    #[wasm_bindgen(constructor, catch)]
    fn new(config: &JsValue) -> Result<Hands, JsValue>;

    #[wasm_bindgen(method, js_name = setOptions)]
    fn set_options(this: &Hands, options: &JsValue);

    #[wasm_bindgen(method, js_name = onResults)]
    fn on_results(this: &Hands, callback: &Function);

    #[wasm_bindgen(method)]
    fn send(this: &Hands, inputs: &JsValue) -> Promise;
}

#[wasm_bindgen]
extern "C" {
    /// MediaPipe camera utility: pumps webcam frames into an `onFrame` callback
    pub type Camera;

    #[wasm_bindgen(constructor, catch)]
    fn new(video: &HtmlVideoElement, options: &JsValue) -> Result<Camera, JsValue>;

    #[wasm_bindgen(method)]
    pub fn start(this: &Camera) -> Promise;

    #[wasm_bindgen(method)]
    pub fn stop(this: &Camera) -> Promise;
}

/// Detector options as MediaPipe expects them
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandsOptions {
    pub max_num_hands: u32,
    pub model_complexity: u32,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl From<&HandTrackingConfig> for HandsOptions {
    fn from(config: &HandTrackingConfig) -> Self {
        Self {
            max_num_hands: config.max_num_hands,
            model_complexity: config.model_complexity,
            min_detection_confidence: config.min_detection_confidence,
            min_tracking_confidence: config.min_tracking_confidence,
        }
    }
}

/// Capture options; `onFrame` is attached separately
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraOptions {
    pub width: u32,
    pub height: u32,
    pub facing_mode: String,
}

impl From<&HandTrackingConfig> for CameraOptions {
    fn from(config: &HandTrackingConfig) -> Self {
        Self {
            width: config.camera_width,
            height: config.camera_height,
            facing_mode: config.facing_mode.clone(),
        }
    }
}

fn to_js_object<T: Serialize>(value: &T) -> Result<JsValue, PortfolioError> {
    let json = serde_json::to_string(value)?;
    JSON::parse(&json).map_err(PortfolioError::js)
}

/// Detector plus the closures it calls back into. The closures must outlive the detector.
pub struct HandDetector {
    hands: Hands,
    _locate_file: Closure<dyn Fn(String) -> String>,
    _on_results: Closure<dyn FnMut(JsValue)>,
}

impl HandDetector {
    /// Construct and configure a detector; `on_results` receives each MediaPipe results object
    pub fn new(
        config: &HandTrackingConfig,
        on_results: impl FnMut(JsValue) + 'static,
    ) -> Result<Self, PortfolioError> {
        let base = config.clone();
        let locate_file = Closure::<dyn Fn(String) -> String>::new(move |file: String| {
            base.locate_file(&file)
        });

        let init = Object::new();
        Reflect::set(&init, &JsValue::from_str("locateFile"), locate_file.as_ref())
            .map_err(PortfolioError::js)?;

        let hands = Hands::new(&init)
            .map_err(|e| PortfolioError::TrackingUnavailable(format!("Hands: {:?}", e)))?;
        hands.set_options(&to_js_object(&HandsOptions::from(config))?);

        let on_results = Closure::<dyn FnMut(JsValue)>::new(on_results);
        hands.on_results(on_results.as_ref().unchecked_ref());

        Ok(Self {
            hands,
            _locate_file: locate_file,
            _on_results: on_results,
        })
    }

    /// Submit one frame; resolves once the detector has produced its result
    pub fn send_image(&self, image: &JsValue) -> Promise {
        let inputs = Object::new();
        if let Err(e) = Reflect::set(&inputs, &JsValue::from_str("image"), image) {
            return Promise::reject(&e);
        }
        self.hands.send(&inputs)
    }
}

/// Build a camera whose frames are pushed through `on_frame`.
///
/// `on_frame` returns the detector's promise so the camera waits for inference
/// before grabbing the next frame.
pub fn create_camera(
    video: &HtmlVideoElement,
    config: &HandTrackingConfig,
    on_frame: &Closure<dyn FnMut() -> Promise>,
) -> Result<Camera, PortfolioError> {
    let options = to_js_object(&CameraOptions::from(config))?;
    Reflect::set(&options, &JsValue::from_str("onFrame"), on_frame.as_ref())
        .map_err(PortfolioError::js)?;
    Camera::new(video, &options)
        .map_err(|e| PortfolioError::TrackingUnavailable(format!("Camera: {:?}", e)))
}
