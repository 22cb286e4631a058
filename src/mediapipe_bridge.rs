// src/mediapipe_bridge.rs - MediaPipe hand landmarker run as a child process
//
// Protocol: the child prints `READY` once its model is loaded. For every frame
// the host writes a little-endian header (u32 width, u32 height, u32 channels,
// u64 timestamp_ms) followed by the raw RGB bytes, then reads one JSON line:
// {"hands":[{"handedness":"Left","score":0.98,"landmarks":[{"x":..,"y":..,"z":..}, ...]}],"error":null}
use crate::config::EngineConfig;
use crate::error::{Result, TrackerError};
use crate::tracking::LandmarkDetector;
use image::DynamicImage;
use serde::Deserialize;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use tracing::{debug, info, warn};

const READY_SIGNAL: &str = "READY";
const RGB_CHANNELS: u32 = 3;

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f64,
    y: f64,
    #[serde(default)]
    z: f64,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: Option<String>,
    #[serde(default)]
    score: Option<f64>,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionResponse {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Parses one response line into the first hand's raw landmarks.
fn parse_response(line: &str) -> Result<Option<Vec<[f64; 3]>>> {
    let response: DetectionResponse = serde_json::from_str(line.trim())?;
    if let Some(error) = response.error {
        return Err(TrackerError::Engine(error));
    }

    Ok(response.hands.into_iter().next().map(|hand| {
        debug!(
            "Engine hand: {} (score {:.2}, {} points)",
            hand.handedness.as_deref().unwrap_or("Unknown"),
            hand.score.unwrap_or(0.0),
            hand.landmarks.len()
        );
        hand.landmarks.iter().map(|lm| [lm.x, lm.y, lm.z]).collect()
    }))
}

/// Writes the frame header and pixels in the bridge wire format.
fn write_frame(out: &mut impl Write, frame: &DynamicImage, timestamp_ms: u64) -> Result<()> {
    let rgb = frame.to_rgb8();
    out.write_all(&rgb.width().to_le_bytes())?;
    out.write_all(&rgb.height().to_le_bytes())?;
    out.write_all(&RGB_CHANNELS.to_le_bytes())?;
    out.write_all(&timestamp_ms.to_le_bytes())?;
    out.write_all(rgb.as_raw())?;
    out.flush()?;
    Ok(())
}

pub struct MediaPipeBridge {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl MediaPipeBridge {
    /// Starts the engine process and waits for its ready signal.
    pub fn spawn(config: &EngineConfig) -> Result<Self> {
        info!("Starting landmark engine: {} {}", config.program, config.args.join(" "));

        let mut process = Command::new(&config.program)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| TrackerError::Engine(format!("failed to start {}: {}", config.program, e)))?;

        let (stdin, stdout) = match (process.stdin.take(), process.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = process.kill();
                return Err(TrackerError::Engine("engine pipes unavailable".to_string()));
            }
        };
        let mut bridge = Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
        };

        let line = bridge.read_line()?;
        if line.trim() != READY_SIGNAL {
            return Err(TrackerError::Engine(format!(
                "engine did not signal ready, got: {}",
                line.trim()
            )));
        }

        info!("Landmark engine ready");
        Ok(bridge)
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(TrackerError::Engine("engine closed its output".to_string()));
        }
        Ok(line)
    }
}

impl LandmarkDetector for MediaPipeBridge {
    fn detect(&mut self, frame: &DynamicImage, timestamp_ms: u64) -> Result<Option<Vec<[f64; 3]>>> {
        write_frame(&mut self.stdin, frame, timestamp_ms)?;
        let line = self.read_line()?;
        parse_response(&line)
    }
}

impl Drop for MediaPipeBridge {
    fn drop(&mut self) {
        if let Err(e) = self.process.kill() {
            warn!("Failed to stop landmark engine: {}", e);
        }
        let _ = self.process.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_json(offset: f64) -> String {
        let points: Vec<String> = (0..21)
            .map(|i| format!(r#"{{"x":{},"y":0.5,"z":-0.01}}"#, offset + i as f64 * 0.01))
            .collect();
        format!(
            r#"{{"handedness":"Right","score":0.93,"landmarks":[{}]}}"#,
            points.join(",")
        )
    }

    #[test]
    fn test_parse_picks_first_hand() {
        let line = format!(r#"{{"hands":[{},{}],"error":null}}"#, hand_json(0.1), hand_json(0.6));
        let points = parse_response(&line).unwrap().unwrap();
        assert_eq!(points.len(), 21);
        assert!((points[0][0] - 0.1).abs() < 1e-12);
        assert!((points[0][2] + 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_parse_no_hands() {
        assert!(parse_response(r#"{"hands":[]}"#).unwrap().is_none());
        assert!(parse_response("{}\n").unwrap().is_none());
    }

    #[test]
    fn test_parse_engine_error() {
        let err = parse_response(r#"{"hands":[],"error":"bad frame size"}"#).unwrap_err();
        assert!(matches!(err, TrackerError::Engine(msg) if msg == "bad frame size"));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(parse_response("Traceback (most recent call last):"), Err(TrackerError::Protocol(_))));
    }

    #[test]
    fn test_frame_wire_format() {
        let frame = DynamicImage::new_rgb8(4, 2);
        let mut buf = Vec::new();
        write_frame(&mut buf, &frame, 1234).unwrap();

        assert_eq!(buf.len(), 4 + 4 + 4 + 8 + 4 * 2 * 3);
        assert_eq!(&buf[0..4], &4u32.to_le_bytes());
        assert_eq!(&buf[4..8], &2u32.to_le_bytes());
        assert_eq!(&buf[8..12], &3u32.to_le_bytes());
        assert_eq!(&buf[12..20], &1234u64.to_le_bytes());
    }

    #[test]
    fn test_spawn_missing_program_fails() {
        let config = EngineConfig {
            program: "definitely-not-a-real-landmark-engine".to_string(),
            args: vec![],
        };
        assert!(matches!(MediaPipeBridge::spawn(&config), Err(TrackerError::Engine(_))));
    }
}
