//! Hands-based page navigation: webcam hand landmarks are classified into
//! scroll gestures that drive a continuous scroll on the page.

pub mod actions;
pub mod app;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod landmarks;
pub mod mediapipe_bridge;
pub mod simulation;
pub mod status;
pub mod tracking;
pub mod ui;
pub mod video;

pub use actions::{ActionDispatcher, ActionOutcome, ScrollDirection, ScrollState, ScrollSurface};
pub use config::AppConfig;
pub use error::{Result, TrackerError};
pub use gesture::{classify, classify_hand, Gesture};
pub use landmarks::{HandLandmarks, Landmark};
pub use tracking::{FrameReport, FrameSource, HandTracker, LandmarkDetector};
