// src/geometry.rs
use crate::landmarks::Landmark;

/// Added to the bounding box scale so it can always be used as a divisor.
pub const SCALE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Larger side of the box plus epsilon. Always positive.
    pub fn scale(&self) -> f64 {
        self.width.max(self.height) + SCALE_EPSILON
    }
}

/// Axis-aligned box over the x/y coordinates of `landmarks`.
pub fn bounding_box(landmarks: &[Landmark]) -> BoundingBox {
    if landmarks.is_empty() {
        return BoundingBox { width: 0.0, height: 0.0 };
    }

    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for lm in landmarks {
        min_x = min_x.min(lm.x);
        max_x = max_x.max(lm.x);
        min_y = min_y.min(lm.y);
        max_y = max_y.max(lm.y);
    }

    BoundingBox {
        width: max_x - min_x,
        height: max_y - min_y,
    }
}

/// Distance in the image plane, ignoring depth.
pub fn planar_distance(a: &Landmark, b: &Landmark) -> f64 {
    (a.xy() - b.xy()).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_bounding_box() {
        let points = vec![
            Vector3::new(0.2, 0.3, 0.0),
            Vector3::new(0.6, 0.4, -0.1),
            Vector3::new(0.4, 0.9, 0.2),
        ];
        let bbox = bounding_box(&points);
        assert!((bbox.width - 0.4).abs() < 1e-12);
        assert!((bbox.height - 0.6).abs() < 1e-12);
        assert!((bbox.scale() - (0.6 + SCALE_EPSILON)).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_box_has_positive_scale() {
        let points = vec![Vector3::new(0.5, 0.5, 0.0); 21];
        let bbox = bounding_box(&points);
        assert_eq!(bbox.width, 0.0);
        assert!(bbox.scale() > 0.0);
        assert!(bounding_box(&[]).scale() > 0.0);
    }

    #[test]
    fn test_planar_distance_ignores_depth() {
        let a = Vector3::new(0.0, 0.0, 5.0);
        let b = Vector3::new(0.3, 0.4, -2.0);
        assert!((planar_distance(&a, &b) - 0.5).abs() < 1e-12);
    }
}
