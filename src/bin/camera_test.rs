// Checks camera access and, optionally, the landmark engine on a single frame.
//
//   cargo run --bin camera_test -- [camera_index] [--engine]
use anyhow::{Context, Result};
use hand_scroll::config::{CameraConfig, EngineConfig};
use hand_scroll::gesture::classify_hand;
use hand_scroll::landmarks::HandLandmarks;
use hand_scroll::mediapipe_bridge::MediaPipeBridge;
use hand_scroll::tracking::{FrameSource, LandmarkDetector};
use hand_scroll::video::{list_cameras, CameraSource};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let with_engine = args.iter().any(|a| a == "--engine");
    let index = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .map(|a| a.parse::<u32>())
        .transpose()
        .context("camera index must be a number")?
        .unwrap_or(0);

    println!("Testing camera access...\n");
    let cameras = list_cameras()?;
    println!("Found {} camera(s):", cameras.len());
    for (idx, name) in &cameras {
        println!("  [{}] {}", idx, name);
    }

    let mut source = CameraSource::new(CameraConfig {
        index,
        ..CameraConfig::default()
    });
    if let Err(e) = source.open() {
        println!("✗ Failed to open camera {}: {}", index, e);
        println!("\nPossible causes:");
        println!("1. Camera is being used by another app");
        println!("2. Camera permissions not granted");
        println!("3. No camera connected");
        return Err(e.into());
    }
    if let Some((w, h, fps)) = source.format() {
        println!("✓ Stream opened at {}x{} @ {} fps", w, h, fps);
    }

    let frame = source.read_frame().context("failed to capture frame")?;
    println!("✓ Frame captured ({}x{})", frame.width(), frame.height());

    if with_engine {
        let mut engine = MediaPipeBridge::spawn(&EngineConfig::default())?;
        println!("✓ Landmark engine ready");
        let points = engine.detect(&frame, 0)?;
        let hand = points.as_deref().and_then(HandLandmarks::from_points);
        println!("Gesture: {}", classify_hand(hand.as_ref()));
    }

    source.release();
    Ok(())
}
