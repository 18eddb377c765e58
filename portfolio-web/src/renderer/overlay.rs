//! Hand overlay painting - filtered video frame plus landmark skeletons on a 2D canvas

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, HtmlVideoElement, ImageBitmap,
};

use crate::bridge::{Hand, HandLandmark, HAND_SKELETON};
use crate::config::HandTrackingConfig;
use crate::error::PortfolioError;

/// Presentation constants for the overlay
#[derive(Debug, Clone)]
pub struct OverlayStyle {
    pub video_filter: String,
    pub connector_color: String,
    pub connector_width: f64,
    pub landmark_color: String,
    pub landmark_radius: f64,
}

impl From<&HandTrackingConfig> for OverlayStyle {
    fn from(config: &HandTrackingConfig) -> Self {
        Self {
            video_filter: config.video_filter.clone(),
            connector_color: config.connector_color.clone(),
            connector_width: config.connector_width,
            landmark_color: config.landmark_color.clone(),
            landmark_radius: config.landmark_radius,
        }
    }
}

/// Convert a normalized landmark (0-1) to canvas pixels
fn to_canvas_space(lm: &HandLandmark, width: f64, height: f64) -> (f64, f64) {
    (lm.x as f64 * width, lm.y as f64 * height)
}

type Segment = ((f64, f64), (f64, f64));

/// Skeleton lines for one hand in canvas pixels
fn build_skeleton_segments(hand: &Hand, width: f64, height: f64) -> Vec<Segment> {
    HAND_SKELETON
        .iter()
        .map(|(start_idx, end_idx)| {
            (
                to_canvas_space(&hand[*start_idx], width, height),
                to_canvas_space(&hand[*end_idx], width, height),
            )
        })
        .collect()
}

/// Joint centers for one hand in canvas pixels
fn build_joint_points(hand: &Hand, width: f64, height: f64) -> Vec<(f64, f64)> {
    hand.iter().map(|lm| to_canvas_space(lm, width, height)).collect()
}

/// Native size of whatever image MediaPipe handed back
fn frame_size(image: &JsValue) -> Option<(u32, u32)> {
    if let Some(video) = image.dyn_ref::<HtmlVideoElement>() {
        return Some((video.video_width(), video.video_height()));
    }
    if let Some(canvas) = image.dyn_ref::<HtmlCanvasElement>() {
        return Some((canvas.width(), canvas.height()));
    }
    if let Some(bitmap) = image.dyn_ref::<ImageBitmap>() {
        return Some((bitmap.width(), bitmap.height()));
    }
    if let Some(img) = image.dyn_ref::<HtmlImageElement>() {
        return Some((img.natural_width(), img.natural_height()));
    }
    None
}

pub struct OverlayPainter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    style: OverlayStyle,
}

impl OverlayPainter {
    pub fn new(canvas: HtmlCanvasElement, style: OverlayStyle) -> Result<Self, PortfolioError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(PortfolioError::js)?
            .ok_or(PortfolioError::NoCanvasContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| PortfolioError::NoCanvasContext)?;
        Ok(Self { canvas, ctx, style })
    }

    /// Paint one detector result: filtered frame, then every hand's skeleton and joints
    pub fn paint(&self, image: &JsValue, hands: &[Hand]) {
        let Some((width, height)) = frame_size(image) else {
            log::warn!("unsupported frame image, skipping");
            return;
        };
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
        let (w, h) = (width as f64, height as f64);

        self.ctx.save();
        self.ctx.clear_rect(0.0, 0.0, w, h);
        self.ctx.set_filter(&self.style.video_filter);
        if let Err(e) = self.draw_frame(image, w, h) {
            log::warn!("failed to draw video frame: {:?}", e);
        }
        self.ctx.restore();

        for hand in hands {
            self.draw_connectors(hand, w, h);
            self.draw_landmarks(hand, w, h);
        }
    }

    fn draw_frame(&self, image: &JsValue, w: f64, h: f64) -> Result<(), JsValue> {
        if let Some(video) = image.dyn_ref::<HtmlVideoElement>() {
            self.ctx.draw_image_with_html_video_element_and_dw_and_dh(video, 0.0, 0.0, w, h)
        } else if let Some(canvas) = image.dyn_ref::<HtmlCanvasElement>() {
            self.ctx.draw_image_with_html_canvas_element_and_dw_and_dh(canvas, 0.0, 0.0, w, h)
        } else if let Some(bitmap) = image.dyn_ref::<ImageBitmap>() {
            self.ctx.draw_image_with_image_bitmap_and_dw_and_dh(bitmap, 0.0, 0.0, w, h)
        } else if let Some(img) = image.dyn_ref::<HtmlImageElement>() {
            self.ctx.draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, w, h)
        } else {
            Ok(())
        }
    }

    fn draw_connectors(&self, hand: &Hand, w: f64, h: f64) {
        self.ctx.set_stroke_style_str(&self.style.connector_color);
        self.ctx.set_line_width(self.style.connector_width);
        self.ctx.begin_path();
        for ((x1, y1), (x2, y2)) in build_skeleton_segments(hand, w, h) {
            self.ctx.move_to(x1, y1);
            self.ctx.line_to(x2, y2);
        }
        self.ctx.stroke();
    }

    fn draw_landmarks(&self, hand: &Hand, w: f64, h: f64) {
        self.ctx.set_fill_style_str(&self.style.landmark_color);
        for (x, y) in build_joint_points(hand, w, h) {
            self.ctx.begin_path();
            if self
                .ctx
                .arc(x, y, self.style.landmark_radius, 0.0, std::f64::consts::TAU)
                .is_ok()
            {
                self.ctx.fill();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand() -> Hand {
        let mut hand: Hand = std::array::from_fn(|_| HandLandmark::default());
        for (i, lm) in hand.iter_mut().enumerate() {
            lm.x = i as f32 / 32.0;
            lm.y = 1.0 - i as f32 / 32.0;
        }
        hand
    }

    #[test]
    fn test_to_canvas_space() {
        let lm = HandLandmark { x: 0.25, y: 0.5, z: -0.1 };
        assert_eq!(to_canvas_space(&lm, 640.0, 480.0), (160.0, 240.0));
    }

    #[test]
    fn test_one_segment_per_connection() {
        let segments = build_skeleton_segments(&hand(), 640.0, 480.0);
        assert_eq!(segments.len(), HAND_SKELETON.len());
        // Wrist -> thumb CMC
        assert_eq!(segments[0].0, (0.0, 480.0));
        assert_eq!(segments[0].1, (20.0, 465.0));
    }

    #[test]
    fn test_one_point_per_joint() {
        let points = build_joint_points(&hand(), 100.0, 100.0);
        assert_eq!(points.len(), 21);
        assert_eq!(points[20], (62.5, 37.5));
    }

    #[test]
    fn test_style_from_config() {
        let style = OverlayStyle::from(&HandTrackingConfig::default());
        assert_eq!(style.connector_width, 2.0);
        assert_eq!(style.landmark_radius, 3.0);
        assert!(style.video_filter.contains("brightness"));
    }
}
