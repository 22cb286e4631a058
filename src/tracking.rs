// src/tracking.rs - Per-frame hand tracking pipeline
use crate::error::Result;
use crate::gesture::{classify_hand, Gesture};
use crate::landmarks::HandLandmarks;
use image::DynamicImage;
use std::collections::VecDeque;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Number of frame intervals averaged for the FPS readout.
const FPS_WINDOW: usize = 30;

/// Something that yields video frames: a camera, or a synthetic stand-in.
pub trait FrameSource {
    /// Acquires the underlying device. Failure here is fatal to tracker startup.
    fn open(&mut self) -> Result<()>;
    fn read_frame(&mut self) -> Result<DynamicImage>;
    /// Releases the device. Must tolerate being called when already released.
    fn release(&mut self);
}

/// The external perception engine: zero or one hand per frame as raw `[x, y, z]` points.
pub trait LandmarkDetector {
    fn detect(&mut self, frame: &DynamicImage, timestamp_ms: u64) -> Result<Option<Vec<[f64; 3]>>>;
}

/// Everything the presentation layer needs about one processed frame.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub timestamp_ms: u64,
    pub fps: f32,
    pub gesture: Gesture,
    pub landmarks: Option<HandLandmarks>,
    pub frame: DynamicImage,
}

#[derive(Debug, Clone, Default)]
pub struct FrameMetrics {
    pub avg_fps: f32,
    last_frame: Option<Instant>,
    frame_intervals: VecDeque<f32>,
}

impl FrameMetrics {
    pub fn new() -> Self {
        Self {
            avg_fps: 0.0,
            last_frame: None,
            frame_intervals: VecDeque::with_capacity(FPS_WINDOW),
        }
    }

    /// Records a frame arrival and returns the averaged frame rate (0 until two frames are seen).
    pub fn record(&mut self, now: Instant) -> f32 {
        if let Some(last) = self.last_frame {
            let dt = now.saturating_duration_since(last).as_secs_f32();
            self.frame_intervals.push_front(dt);
            if self.frame_intervals.len() > FPS_WINDOW {
                self.frame_intervals.pop_back();
            }

            let avg = self.frame_intervals.iter().sum::<f32>() / self.frame_intervals.len() as f32;
            self.avg_fps = if avg > 0.0 { 1.0 / avg } else { 0.0 };
        }
        self.last_frame = Some(now);
        self.avg_fps
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Drives frame source, landmark engine and classifier one frame at a time.
///
/// The host calls [`HandTracker::process_frame`] once per display refresh and
/// stops rescheduling once [`HandTracker::is_running`] turns false.
pub struct HandTracker {
    source: Box<dyn FrameSource>,
    detector: Option<Box<dyn LandmarkDetector>>,
    metrics: FrameMetrics,
    started_at: Instant,
    running: bool,
    frame_counter: u64,
    last_gesture: Gesture,
    warned_no_engine: bool,
}

impl HandTracker {
    /// Opens the frame source and starts tracking. A missing detector is tolerated:
    /// frames are still reported, always without a hand.
    pub fn start(
        mut source: Box<dyn FrameSource>,
        detector: Option<Box<dyn LandmarkDetector>>,
    ) -> Result<Self> {
        source.open()?;
        info!(
            "Hand tracker started ({})",
            if detector.is_some() { "landmark engine ready" } else { "no landmark engine" }
        );

        Ok(Self {
            source,
            detector,
            metrics: FrameMetrics::new(),
            started_at: Instant::now(),
            running: true,
            frame_counter: 0,
            last_gesture: Gesture::None,
            warned_no_engine: false,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_detector(&self) -> bool {
        self.detector.is_some()
    }

    pub fn frames_processed(&self) -> u64 {
        self.frame_counter
    }

    /// Stops tracking and releases the frame source. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.source.release();
        self.metrics.reset();
        info!("Hand tracker stopped after {} frames", self.frame_counter);
    }

    pub fn process_frame(&mut self) -> Option<FrameReport> {
        self.process_frame_at(Instant::now())
    }

    /// Processes one frame. Returns `None` when stopped or when no frame could be read.
    pub fn process_frame_at(&mut self, now: Instant) -> Option<FrameReport> {
        if !self.running {
            return None;
        }

        let frame = match self.source.read_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Skipping frame: {}", e);
                return None;
            }
        };

        let timestamp_ms = now.saturating_duration_since(self.started_at).as_millis() as u64;
        self.frame_counter += 1;

        let landmarks = self.detect(&frame, timestamp_ms);
        let gesture = classify_hand(landmarks.as_ref());
        if gesture != self.last_gesture {
            debug!("Gesture {} -> {} (frame {})", self.last_gesture, gesture, self.frame_counter);
            self.last_gesture = gesture;
        }

        let fps = self.metrics.record(now);

        Some(FrameReport {
            timestamp_ms,
            fps,
            gesture,
            landmarks,
            frame,
        })
    }

    fn detect(&mut self, frame: &DynamicImage, timestamp_ms: u64) -> Option<HandLandmarks> {
        let Some(detector) = self.detector.as_mut() else {
            if !self.warned_no_engine {
                warn!("Landmark engine unavailable; frames will report no hand");
                self.warned_no_engine = true;
            }
            return None;
        };

        match detector.detect(frame, timestamp_ms) {
            Ok(Some(raw)) => {
                let hand = HandLandmarks::from_points(&raw);
                if hand.is_none() {
                    debug!("Discarding hand with {} unusable landmarks", raw.len());
                }
                hand
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Landmark detection failed on frame {}: {}", self.frame_counter, e);
                None
            }
        }
    }
}

impl Drop for HandTracker {
    fn drop(&mut self) {
        self.stop();
    }
}
