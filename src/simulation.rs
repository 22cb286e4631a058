// src/simulation.rs - Scripted hand and synthetic frames for running without a camera or model
use crate::error::Result;
use crate::tracking::{FrameSource, LandmarkDetector};
use image::{DynamicImage, ImageBuffer, Rgb};
use tracing::info;

/// Canonical hand shapes, in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandPose {
    /// Index straight up, other fingers curled.
    PointUp,
    /// Thumb extended downward, all four fingers curled.
    ThumbDown,
    /// All fingers curled tight against the palm.
    Fist,
    /// Relaxed hand with every finger extended.
    OpenPalm,
}

const POINT_UP: [[f64; 2]; 21] = [
    [0.50, 0.80],
    [0.42, 0.75], [0.38, 0.70], [0.36, 0.66], [0.36, 0.62],
    [0.45, 0.60], [0.45, 0.50], [0.45, 0.42], [0.45, 0.35],
    [0.50, 0.60], [0.52, 0.55], [0.52, 0.62], [0.50, 0.65],
    [0.55, 0.62], [0.57, 0.58], [0.57, 0.64], [0.55, 0.67],
    [0.60, 0.65], [0.62, 0.62], [0.62, 0.67], [0.60, 0.70],
];

const THUMB_DOWN: [[f64; 2]; 21] = [
    [0.50, 0.50],
    [0.44, 0.55], [0.42, 0.60], [0.42, 0.66], [0.42, 0.72],
    [0.45, 0.45], [0.45, 0.40], [0.46, 0.46], [0.46, 0.50],
    [0.50, 0.44], [0.50, 0.39], [0.50, 0.46], [0.50, 0.50],
    [0.55, 0.45], [0.55, 0.40], [0.55, 0.46], [0.54, 0.50],
    [0.59, 0.47], [0.59, 0.43], [0.59, 0.48], [0.58, 0.51],
];

const FIST: [[f64; 2]; 21] = [
    [0.50, 0.80],
    [0.43, 0.76], [0.40, 0.72], [0.41, 0.68], [0.45, 0.66],
    [0.44, 0.62], [0.43, 0.57], [0.44, 0.66], [0.46, 0.74],
    [0.49, 0.61], [0.48, 0.56], [0.49, 0.66], [0.49, 0.74],
    [0.54, 0.62], [0.53, 0.57], [0.54, 0.66], [0.52, 0.74],
    [0.58, 0.64], [0.58, 0.60], [0.57, 0.67], [0.55, 0.74],
];

const OPEN_PALM: [[f64; 2]; 21] = [
    [0.50, 0.80],
    [0.43, 0.76], [0.37, 0.70], [0.33, 0.64], [0.30, 0.59],
    [0.44, 0.58], [0.42, 0.48], [0.41, 0.42], [0.40, 0.37],
    [0.50, 0.57], [0.50, 0.46], [0.50, 0.39], [0.50, 0.33],
    [0.55, 0.58], [0.57, 0.48], [0.58, 0.42], [0.59, 0.37],
    [0.60, 0.61], [0.63, 0.54], [0.65, 0.49], [0.66, 0.45],
];

/// Raw landmark payload for a pose, as the engine would report it.
pub fn pose_points(pose: HandPose) -> Vec<[f64; 3]> {
    let table = match pose {
        HandPose::PointUp => &POINT_UP,
        HandPose::ThumbDown => &THUMB_DOWN,
        HandPose::Fist => &FIST,
        HandPose::OpenPalm => &OPEN_PALM,
    };
    table.iter().map(|[x, y]| [*x, *y, 0.0]).collect()
}

/// One step of the demo script: a pose (or no hand) held for a duration.
#[derive(Debug, Clone, Copy)]
pub struct ScriptStep {
    pub pose: Option<HandPose>,
    pub hold_ms: u64,
}

/// Default demo: scroll down, stop, scroll up, let go.
pub const DEMO_SCRIPT: [ScriptStep; 6] = [
    ScriptStep { pose: None, hold_ms: 1500 },
    ScriptStep { pose: Some(HandPose::ThumbDown), hold_ms: 3000 },
    ScriptStep { pose: Some(HandPose::Fist), hold_ms: 1500 },
    ScriptStep { pose: Some(HandPose::PointUp), hold_ms: 2000 },
    ScriptStep { pose: Some(HandPose::OpenPalm), hold_ms: 1500 },
    ScriptStep { pose: None, hold_ms: 1000 },
];

/// Landmark detector that replays a looping pose script keyed on the frame timestamp.
pub struct SimulatedHand {
    script: Vec<ScriptStep>,
    cycle_ms: u64,
}

impl SimulatedHand {
    pub fn new(script: &[ScriptStep]) -> Self {
        let cycle_ms = script.iter().map(|s| s.hold_ms).sum();
        Self {
            script: script.to_vec(),
            cycle_ms,
        }
    }

    pub fn demo() -> Self {
        Self::new(&DEMO_SCRIPT)
    }

    /// Pose scheduled at `timestamp_ms`.
    pub fn pose_at(&self, timestamp_ms: u64) -> Option<HandPose> {
        if self.cycle_ms == 0 {
            return None;
        }

        let mut t = timestamp_ms % self.cycle_ms;
        for step in &self.script {
            if t < step.hold_ms {
                return step.pose;
            }
            t -= step.hold_ms;
        }
        None
    }
}

impl LandmarkDetector for SimulatedHand {
    fn detect(&mut self, _frame: &DynamicImage, timestamp_ms: u64) -> Result<Option<Vec<[f64; 3]>>> {
        let Some(pose) = self.pose_at(timestamp_ms) else {
            return Ok(None);
        };

        // Sway the whole hand a little; translation does not change the gesture.
        let t = timestamp_ms as f64 / 1000.0;
        let dx = 0.03 * (t * 1.3).sin();
        let dy = 0.02 * (t * 0.7).cos();
        Ok(Some(
            pose_points(pose)
                .into_iter()
                .map(|[x, y, z]| [x + dx, y + dy, z])
                .collect(),
        ))
    }
}

/// Frame source producing a plain gradient image instead of camera frames.
pub struct SyntheticFrames {
    width: u32,
    height: u32,
    frame: Option<DynamicImage>,
}

impl SyntheticFrames {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frame: None,
        }
    }
}

impl FrameSource for SyntheticFrames {
    fn open(&mut self) -> Result<()> {
        let (w, h) = (self.width.max(1), self.height.max(1));
        let img = ImageBuffer::from_fn(w, h, |x, y| {
            let shade = (20 + 40 * y / h) as u8;
            Rgb([shade, shade, (shade as u32 + 10 * x / w) as u8])
        });
        self.frame = Some(DynamicImage::ImageRgb8(img));
        info!("Synthetic frame source opened ({}x{})", w, h);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<DynamicImage> {
        self.frame
            .clone()
            .ok_or_else(|| crate::error::TrackerError::Camera("synthetic source not opened".to_string()))
    }

    fn release(&mut self) {
        self.frame = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{classify, Gesture};
    use crate::landmarks::Landmark;

    fn classify_raw(raw: &[[f64; 3]]) -> Gesture {
        let points: Vec<Landmark> = raw.iter().map(|p| Landmark::new(p[0], p[1], p[2])).collect();
        classify(&points)
    }

    #[test]
    fn test_poses_classify_as_named() {
        assert_eq!(classify_raw(&pose_points(HandPose::PointUp)), Gesture::PointUp);
        assert_eq!(classify_raw(&pose_points(HandPose::ThumbDown)), Gesture::PointDown);
        assert_eq!(classify_raw(&pose_points(HandPose::Fist)), Gesture::Fist);
        assert_eq!(classify_raw(&pose_points(HandPose::OpenPalm)), Gesture::None);
    }

    #[test]
    fn test_script_schedule_loops() {
        let sim = SimulatedHand::demo();
        assert_eq!(sim.pose_at(0), None);
        assert_eq!(sim.pose_at(1500), Some(HandPose::ThumbDown));
        assert_eq!(sim.pose_at(4499), Some(HandPose::ThumbDown));
        assert_eq!(sim.pose_at(4500), Some(HandPose::Fist));
        assert_eq!(sim.pose_at(6000), Some(HandPose::PointUp));

        let cycle: u64 = DEMO_SCRIPT.iter().map(|s| s.hold_ms).sum();
        assert_eq!(sim.pose_at(cycle + 1500), Some(HandPose::ThumbDown));
    }

    #[test]
    fn test_swayed_poses_keep_their_gesture() {
        let mut sim = SimulatedHand::new(&[ScriptStep {
            pose: Some(HandPose::Fist),
            hold_ms: 10_000,
        }]);
        let frame = DynamicImage::new_rgb8(4, 4);
        for ts in (0..10_000).step_by(370) {
            let raw = sim.detect(&frame, ts).unwrap().unwrap();
            assert_eq!(classify_raw(&raw), Gesture::Fist, "at {} ms", ts);
        }
    }

    #[test]
    fn test_synthetic_frames_lifecycle() {
        let mut source = SyntheticFrames::new(64, 48);
        assert!(source.read_frame().is_err());

        source.open().unwrap();
        let frame = source.read_frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (64, 48));

        source.release();
        assert!(source.read_frame().is_err());
    }
}
