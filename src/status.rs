// src/status.rs - Toast timing and HUD telemetry values
use crate::gesture::Gesture;
use std::time::{Duration, Instant};

/// How long a toast stays on screen after the latest `show`.
pub const TOAST_LIFETIME: Duration = Duration::from_millis(1300);

/// Transient status message. Showing a new message replaces the old one and restarts the timer.
#[derive(Debug, Clone)]
pub struct Toast {
    lifetime: Duration,
    current: Option<(String, Instant)>,
}

impl Default for Toast {
    fn default() -> Self {
        Self::new(TOAST_LIFETIME)
    }
}

impl Toast {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            current: None,
        }
    }

    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        if message.is_empty() {
            return;
        }
        self.current = Some((message, now));
    }

    /// The message still on screen at `now`, if any.
    pub fn visible(&self, now: Instant) -> Option<&str> {
        match &self.current {
            Some((msg, shown_at)) if now.saturating_duration_since(*shown_at) < self.lifetime => {
                Some(msg.as_str())
            }
            _ => None,
        }
    }

    /// Time until the current message expires; used to schedule the next repaint.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.current
            .as_ref()
            .map(|(_, shown_at)| self.lifetime.saturating_sub(now.saturating_duration_since(*shown_at)))
            .filter(|d| !d.is_zero())
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

/// Values shown in the HUD.
#[derive(Debug, Clone, Default)]
pub struct Telemetry {
    pub camera_on: bool,
    pub fps: f32,
    pub last_gesture: Option<Gesture>,
}

impl Telemetry {
    pub fn set_frame(&mut self, fps: f32, gesture: Gesture) {
        self.fps = fps;
        self.last_gesture = Some(gesture);
    }

    pub fn gesture_label(&self) -> &'static str {
        self.last_gesture.map_or("—", |g| g.as_str())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
