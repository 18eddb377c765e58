//! Hand landmark results from MediaPipe Hands
//!
//! Converts the detector's `multiHandLandmarks` arrays into fixed-size Rust
//! arrays for the overlay painter.

use js_sys::{Array, Reflect};
use wasm_bindgen::prelude::*;

// ============================================================================
// HAND LANDMARK INDICES (MediaPipe Hands - 21 total)
// ============================================================================

pub const LANDMARKS_PER_HAND: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Hand connectivity, same edges as MediaPipe's `HAND_CONNECTIONS`
pub const HAND_SKELETON: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (INDEX_MCP, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (MIDDLE_MCP, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (RING_MCP, PINKY_MCP), (WRIST, PINKY_MCP),
    (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A single hand joint (x, y normalized to the frame, z relative depth)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

pub type Hand = [HandLandmark; LANDMARKS_PER_HAND];

/// Build a hand from flat `x, y, z` triples. Anything but 21 triples is rejected.
pub fn parse_hand(flat: &[f32]) -> Option<Hand> {
    if flat.len() != LANDMARKS_PER_HAND * 3 {
        return None;
    }
    let mut hand = [HandLandmark::default(); LANDMARKS_PER_HAND];
    for (i, chunk) in flat.chunks_exact(3).enumerate() {
        hand[i] = HandLandmark {
            x: chunk[0],
            y: chunk[1],
            z: chunk[2],
        };
    }
    Some(hand)
}

// ============================================================================
// JS RESULT PARSING
// ============================================================================

fn number_field(object: &JsValue, key: &str) -> Option<f32> {
    Reflect::get(object, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_f64())
        .map(|v| v as f32)
}

/// Extract every detected hand from a MediaPipe results object.
///
/// Hands with missing coordinates or the wrong joint count are skipped.
pub fn hands_from_results(results: &JsValue) -> Vec<Hand> {
    let Ok(list) = Reflect::get(results, &JsValue::from_str("multiHandLandmarks")) else {
        return Vec::new();
    };
    if list.is_undefined() || list.is_null() {
        return Vec::new();
    }

    let mut hands = Vec::new();
    for (h, landmarks) in Array::from(&list).iter().enumerate() {
        let mut flat = Vec::with_capacity(LANDMARKS_PER_HAND * 3);
        for landmark in Array::from(&landmarks).iter() {
            let (Some(x), Some(y)) = (number_field(&landmark, "x"), number_field(&landmark, "y")) else {
                break;
            };
            flat.extend([x, y, number_field(&landmark, "z").unwrap_or(0.0)]);
        }

        match parse_hand(&flat) {
            Some(hand) => hands.push(hand),
            None => log::warn!(
                "hand {}: expected {} landmarks, got {}",
                h,
                LANDMARKS_PER_HAND,
                flat.len() / 3
            ),
        }
    }
    hands
}
