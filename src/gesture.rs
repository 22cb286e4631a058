// src/gesture.rs - Per-frame gesture classification from hand landmarks
use crate::geometry::{bounding_box, planar_distance};
use crate::landmarks::{index, HandLandmarks, Landmark, HAND_LANDMARK_COUNT};
use serde::Serialize;

/// Index tip must sit at least this far above its MCP joint for `PointUp`.
pub const INDEX_RAISE_MARGIN: f64 = 0.08;
/// Thumb tip must hang this far below the IP joint for `PointDown`.
pub const THUMB_TIP_DROP: f64 = 0.02;
/// IP joint must hang this far below the thumb MCP for `PointDown`.
pub const THUMB_IP_DROP: f64 = 0.01;
/// Mean fingertip-to-wrist distance (in hand-size units) below which curled fingers form a fist.
pub const FIST_SPREAD_LIMIT: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    PointUp,
    PointDown,
    Fist,
    None,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PointUp => "point_up",
            Self::PointDown => "point_down",
            Self::Fist => "fist",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for Gesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies an optional hand; no hand is `Gesture::None`.
pub fn classify_hand(hand: Option<&HandLandmarks>) -> Gesture {
    hand.map_or(Gesture::None, |h| classify(h.points()))
}

/// Maps one frame's landmarks to a gesture. Sets with fewer than 21 points are `None`.
///
/// Pointing gestures are checked before the fist so a finger that is still
/// extending is never reported as a fist.
pub fn classify(landmarks: &[Landmark]) -> Gesture {
    if landmarks.len() < HAND_LANDMARK_COUNT {
        return Gesture::None;
    }

    let lm = |i: usize| &landmarks[i];
    // Smaller y is higher in the image, so a curled finger has its tip below the knuckle.
    let curled = |tip: usize, mcp: usize| lm(tip).y > lm(mcp).y;

    let index_curled = curled(index::INDEX_TIP, index::INDEX_MCP);
    let others_curled = curled(index::MIDDLE_TIP, index::MIDDLE_MCP)
        && curled(index::RING_TIP, index::RING_MCP)
        && curled(index::PINKY_TIP, index::PINKY_MCP);

    let idx_tip = lm(index::INDEX_TIP).y;
    let idx_pip = lm(index::INDEX_PIP).y;
    let idx_mcp = lm(index::INDEX_MCP).y;
    let index_extended_up = idx_tip < idx_pip && idx_pip < idx_mcp;
    if index_extended_up && idx_tip < idx_mcp - INDEX_RAISE_MARGIN && others_curled {
        return Gesture::PointUp;
    }

    let th_tip = lm(index::THUMB_TIP).y;
    let th_ip = lm(index::THUMB_IP).y;
    let th_mcp = lm(index::THUMB_MCP).y;
    let thumb_extended_down = th_tip > th_ip + THUMB_TIP_DROP && th_ip > th_mcp + THUMB_IP_DROP;
    if thumb_extended_down && index_curled && others_curled {
        return Gesture::PointDown;
    }

    if index_curled && others_curled && fingertip_spread(landmarks) < FIST_SPREAD_LIMIT {
        return Gesture::Fist;
    }

    Gesture::None
}

/// Mean planar distance from the four fingertips to the wrist, divided by the
/// hand's bounding box scale.
pub fn fingertip_spread(landmarks: &[Landmark]) -> f64 {
    let wrist = &landmarks[index::WRIST];
    let tips = [index::INDEX_TIP, index::MIDDLE_TIP, index::RING_TIP, index::PINKY_TIP];
    let mean = tips
        .iter()
        .map(|&t| planar_distance(&landmarks[t], wrist))
        .sum::<f64>()
        / tips.len() as f64;

    mean / bounding_box(landmarks).scale()
}
