//! Error type shared by every component, converted to `JsValue` at the wasm boundary

use wasm_bindgen::JsValue;

/// Errors that can occur while booting or driving the page effects
#[derive(Debug, thiserror::Error)]
pub enum PortfolioError {
    #[error("no window found")]
    NoWindow,

    #[error("no document found")]
    NoDocument,

    #[error("no element matching '{0}' found")]
    MissingElement(String),

    #[error("element '{0}' is not a {1}")]
    WrongElementType(String, &'static str),

    #[error("phrase list is empty")]
    NoPhrases,

    #[error("phrase {0} is empty")]
    EmptyPhrase(usize),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("surface creation failed: {0}")]
    SurfaceCreationFailed(String),

    #[error("failed to find a suitable GPU adapter")]
    NoAdapter,

    #[error("device creation failed: {0}")]
    DeviceCreationFailed(String),

    #[error("2d canvas context unavailable")]
    NoCanvasContext,

    #[error("hand tracking unavailable: {0}")]
    TrackingUnavailable(String),

    #[error("javascript error: {0}")]
    Js(String),
}

impl PortfolioError {
    /// Wrap a thrown JS value
    pub(crate) fn js(value: JsValue) -> Self {
        match value.as_string() {
            Some(message) => PortfolioError::Js(message),
            None => PortfolioError::Js(format!("{:?}", value)),
        }
    }
}

impl From<PortfolioError> for JsValue {
    fn from(err: PortfolioError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
