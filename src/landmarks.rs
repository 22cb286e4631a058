// src/landmarks.rs - Hand landmark model shared by the engine adapters and the classifier
use nalgebra::Vector3;

/// One normalized landmark: x/y in [0, 1] image space (y grows downward), z relative depth.
pub type Landmark = Vector3<f64>;

/// Number of landmarks the hand model reports per hand.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// MediaPipe hand landmark indices.
#[allow(dead_code)]
pub mod index {
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
}

/// Bone connections used to draw the hand skeleton.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (5, 9), (9, 10), (10, 11), (11, 12),
    (9, 13), (13, 14), (14, 15), (15, 16),
    (13, 17), (0, 17), (17, 18), (18, 19), (19, 20),
];

/// A validated set of exactly 21 landmarks for a single hand.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    points: [Landmark; HAND_LANDMARK_COUNT],
}

impl HandLandmarks {
    /// Converts a raw engine payload. Returns `None` when fewer than 21 points
    /// are present or any coordinate is not finite; points past the 21st are ignored.
    pub fn from_points(raw: &[[f64; 3]]) -> Option<Self> {
        if raw.len() < HAND_LANDMARK_COUNT {
            return None;
        }

        let mut points = [Landmark::zeros(); HAND_LANDMARK_COUNT];
        for (slot, p) in points.iter_mut().zip(raw) {
            if !p.iter().all(|c| c.is_finite()) {
                return None;
            }
            *slot = Vector3::new(p[0], p[1], p[2]);
        }

        Some(Self { points })
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn get(&self, idx: usize) -> &Landmark {
        &self.points[idx]
    }

    pub fn wrist(&self) -> &Landmark {
        &self.points[index::WRIST]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(n: usize) -> Vec<[f64; 3]> {
        (0..n).map(|i| [i as f64 * 0.01, 0.5, 0.0]).collect()
    }

    #[test]
    fn test_from_points_requires_21() {
        assert!(HandLandmarks::from_points(&raw(0)).is_none());
        assert!(HandLandmarks::from_points(&raw(20)).is_none());

        let hand = HandLandmarks::from_points(&raw(21)).unwrap();
        assert_eq!(hand.points().len(), HAND_LANDMARK_COUNT);
        assert!((hand.get(index::PINKY_TIP).x - 0.20).abs() < 1e-12);
    }

    #[test]
    fn test_from_points_ignores_extra_points() {
        let hand = HandLandmarks::from_points(&raw(25)).unwrap();
        assert_eq!(hand.points().len(), HAND_LANDMARK_COUNT);
    }

    #[test]
    fn test_from_points_rejects_non_finite() {
        let mut points = raw(21);
        points[7][1] = f64::NAN;
        assert!(HandLandmarks::from_points(&points).is_none());

        points[7][1] = f64::INFINITY;
        assert!(HandLandmarks::from_points(&points).is_none());
    }

    #[test]
    fn test_connections_stay_in_range() {
        for (a, b) in HAND_CONNECTIONS {
            assert!(a < HAND_LANDMARK_COUNT && b < HAND_LANDMARK_COUNT);
        }
    }
}
