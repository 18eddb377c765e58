//! Page configuration
//!
//! Every tunable constant lives here with its default. The page may pass a
//! partial JSON document to `start_with_config`; missing fields keep their
//! defaults.

use serde::{Deserialize, Serialize};

use crate::error::PortfolioError;

/// Typed banner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingConfig {
    pub phrases: Vec<String>,
    /// Delay after revealing a character
    pub type_delay_ms: u32,
    /// Delay after removing a character
    pub delete_delay_ms: u32,
    /// Pause on a fully typed phrase before erasing
    pub hold_delay_ms: u32,
    /// Pause on an empty banner before typing the next phrase
    pub next_phrase_delay_ms: u32,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            phrases: vec![
                "SIMULATING NEURAL NETWORKS...".to_string(),
                "COMPILING EMBEDDED FIRMWARE...".to_string(),
                "MAPPING BRAIN ARCHITECTURE...".to_string(),
                "SYSTEM: ONLINE.".to_string(),
            ],
            type_delay_ms: 100,
            delete_delay_ms: 50,
            hold_delay_ms: 2000,
            next_phrase_delay_ms: 500,
        }
    }
}

/// Card tilt settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    /// Rotation multiplier in degrees
    pub max_rotation_deg: f32,
    pub hover_scale: f32,
    pub perspective_px: f32,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            max_rotation_deg: 15.0,
            hover_scale: 1.02,
            perspective_px: 1000.0,
        }
    }
}

/// Particle background settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub particle_count: usize,
    /// Side length of the cube the particles are scattered in
    pub spread: f32,
    /// Vertical field of view in degrees
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub camera_z: f32,
    /// Fraction of the remaining distance the camera covers each frame
    pub smoothing: f32,
    /// Camera offset per unit of normalized pointer travel
    pub parallax_strength: f32,
    pub yaw_step: f32,
    pub pitch_step: f32,
    pub point_size: f32,
    /// 0xRRGGBB
    pub point_color: u32,
    pub point_opacity: f32,
    /// Fixed seed for reproducible particle placement; entropy when absent
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            particle_count: 180,
            spread: 15.0,
            fov_deg: 75.0,
            near: 0.1,
            far: 1000.0,
            camera_z: 5.0,
            smoothing: 0.05,
            parallax_strength: 2.0,
            yaw_step: 0.0015,
            pitch_step: 0.0005,
            point_size: 0.035,
            point_color: 0x00f7ff,
            point_opacity: 0.8,
            seed: None,
        }
    }
}

impl SceneConfig {
    /// Point color as sRGB channels in 0..1 plus the configured opacity.
    /// Written to a non-sRGB surface as-is, like the page's CSS colors.
    pub fn point_rgba(&self) -> [f32; 4] {
        let channel = |shift: u32| ((self.point_color >> shift) & 0xff) as f32 / 255.0;
        [channel(16), channel(8), channel(0), self.point_opacity]
    }
}

/// Webcam hand-tracking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HandTrackingConfig {
    pub max_num_hands: u32,
    pub model_complexity: u32,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
    pub camera_width: u32,
    pub camera_height: u32,
    pub facing_mode: String,
    /// Prefix joined with the detector's asset file names
    pub asset_base_url: String,
    pub hide_toggle_delay_ms: u32,
    /// Stop the webcam when the overlay closes instead of leaving it streaming
    pub release_camera_on_close: bool,
    pub video_filter: String,
    pub connector_color: String,
    pub connector_width: f64,
    pub landmark_color: String,
    pub landmark_radius: f64,
    pub idle_label: String,
    pub busy_label: String,
}

impl Default for HandTrackingConfig {
    fn default() -> Self {
        Self {
            max_num_hands: 2,
            model_complexity: 1,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
            camera_width: 640,
            camera_height: 480,
            facing_mode: "user".to_string(),
            asset_base_url: "https://cdn.jsdelivr.net/npm/@mediapipe/hands/".to_string(),
            hide_toggle_delay_ms: 1000,
            release_camera_on_close: false,
            video_filter: "brightness(0.4) contrast(1.2) grayscale(0.5)".to_string(),
            connector_color: "#00f7ff".to_string(),
            connector_width: 2.0,
            landmark_color: "#ff0055".to_string(),
            landmark_radius: 3.0,
            idle_label: "\u{270b} HAND TRACKING".to_string(),
            busy_label: "\u{23f3} INITIALIZING...".to_string(),
        }
    }
}

impl HandTrackingConfig {
    /// Resolve a detector asset file name against the configured base URL
    pub fn locate_file(&self, file: &str) -> String {
        if self.asset_base_url.is_empty() || self.asset_base_url.ends_with('/') {
            format!("{}{}", self.asset_base_url, file)
        } else {
            format!("{}/{}", self.asset_base_url, file)
        }
    }
}

/// Element ids and selectors the page markup provides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DomConfig {
    pub typed_output_id: String,
    pub tilt_selector: String,
    pub scene_container_id: String,
    pub hand_toggle_id: String,
    pub hand_overlay_id: String,
    pub hand_canvas_id: String,
    pub hand_video_id: String,
    pub hand_close_id: String,
    pub hand_status_id: String,
    /// Class added to the overlay while it is visible
    pub active_class: String,
}

impl Default for DomConfig {
    fn default() -> Self {
        Self {
            typed_output_id: "typed-output".to_string(),
            tilt_selector: ".tilt-element".to_string(),
            scene_container_id: "webgl-container".to_string(),
            hand_toggle_id: "hand-toggle".to_string(),
            hand_overlay_id: "hand-overlay".to_string(),
            hand_canvas_id: "hand-canvas".to_string(),
            hand_video_id: "hand-video".to_string(),
            hand_close_id: "hand-close".to_string(),
            hand_status_id: "hand-status".to_string(),
            active_class: "active".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub typing: TypingConfig,
    pub tilt: TiltConfig,
    pub scene: SceneConfig,
    pub hand_tracking: HandTrackingConfig,
    pub dom: DomConfig,
}

impl PortfolioConfig {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, PortfolioError> {
        let config: PortfolioConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PortfolioError> {
        if self.typing.phrases.is_empty() {
            return Err(PortfolioError::NoPhrases);
        }
        if let Some(index) = self.typing.phrases.iter().position(|p| p.is_empty()) {
            return Err(PortfolioError::EmptyPhrase(index));
        }
        if !(self.scene.smoothing > 0.0 && self.scene.smoothing <= 1.0) {
            return Err(PortfolioError::InvalidConfig(format!(
                "scene.smoothing must be in (0, 1], got {}",
                self.scene.smoothing
            )));
        }
        if self.scene.particle_count == 0 {
            return Err(PortfolioError::InvalidConfig(
                "scene.particle_count must be positive".to_string(),
            ));
        }
        if self.scene.near <= 0.0 || self.scene.far <= self.scene.near {
            return Err(PortfolioError::InvalidConfig(format!(
                "scene clip range {}..{} is empty",
                self.scene.near, self.scene.far
            )));
        }
        if self.hand_tracking.camera_width == 0 || self.hand_tracking.camera_height == 0 {
            return Err(PortfolioError::InvalidConfig(
                "hand_tracking camera dimensions must be positive".to_string(),
            ));
        }
        if self.hand_tracking.max_num_hands == 0 {
            return Err(PortfolioError::InvalidConfig(
                "hand_tracking.max_num_hands must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PortfolioConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scene.particle_count, 180);
        assert_eq!(config.hand_tracking.max_num_hands, 2);
        assert_eq!(config.typing.phrases.len(), 4);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PortfolioConfig::from_json(r#"{"typing":{"phrases":["X"]}}"#).unwrap();
        assert_eq!(config.typing.phrases, vec!["X".to_string()]);
        assert_eq!(config.typing.hold_delay_ms, 2000);
        assert_eq!(config.scene.smoothing, 0.05);
        assert_eq!(config.dom.typed_output_id, "typed-output");
    }

    #[test]
    fn test_rejects_empty_phrases() {
        let result = PortfolioConfig::from_json(r#"{"typing":{"phrases":[]}}"#);
        assert!(matches!(result, Err(PortfolioError::NoPhrases)));

        let result = PortfolioConfig::from_json(r#"{"typing":{"phrases":["ok",""]}}"#);
        assert!(matches!(result, Err(PortfolioError::EmptyPhrase(1))));
    }

    #[test]
    fn test_rejects_bad_smoothing() {
        let result = PortfolioConfig::from_json(r#"{"scene":{"smoothing":1.5}}"#);
        assert!(matches!(result, Err(PortfolioError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let result = PortfolioConfig::from_json("{not json");
        assert!(matches!(result, Err(PortfolioError::ConfigParse(_))));
    }

    #[test]
    fn test_locate_file_joins_base_url() {
        let mut config = HandTrackingConfig::default();
        assert_eq!(
            config.locate_file("hands.binarypb"),
            "https://cdn.jsdelivr.net/npm/@mediapipe/hands/hands.binarypb"
        );
        config.asset_base_url = "/assets/hands".to_string();
        assert_eq!(config.locate_file("hands.js"), "/assets/hands/hands.js");
    }

    #[test]
    fn test_point_rgba() {
        let rgba = SceneConfig::default().point_rgba();
        assert_eq!(rgba[0], 0.0);
        assert!((rgba[1] - 247.0 / 255.0).abs() < 1e-6);
        assert_eq!(rgba[2], 1.0);
        assert_eq!(rgba[3], 0.8);
    }
}
