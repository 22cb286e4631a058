// src/video.rs - Webcam frame source
use crate::config::CameraConfig;
use crate::error::{Result, TrackerError};
use crate::tracking::FrameSource;
use image::{DynamicImage, ImageBuffer, RgbImage};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution};
use nokhwa::Camera;
use tracing::{debug, info, warn};

/// Lists the cameras the native backend can see, as `(index, name)`.
pub fn list_cameras() -> Result<Vec<(String, String)>> {
    let cameras = nokhwa::query(nokhwa::utils::ApiBackend::Auto)
        .map_err(|e| TrackerError::Camera(format!("failed to query cameras: {}", e)))?;
    Ok(cameras
        .iter()
        .map(|c| (c.index().to_string(), c.human_name()))
        .collect())
}

pub struct CameraSource {
    config: CameraConfig,
    camera: Option<Camera>,
}

impl CameraSource {
    pub fn new(config: CameraConfig) -> Self {
        Self { config, camera: None }
    }

    pub fn is_open(&self) -> bool {
        self.camera.is_some()
    }

    /// Negotiated resolution and frame rate, once open.
    pub fn format(&self) -> Option<(u32, u32, u32)> {
        self.camera.as_ref().map(|cam| {
            let res = cam.resolution();
            (res.width(), res.height(), cam.frame_rate())
        })
    }
}

impl FrameSource for CameraSource {
    fn open(&mut self) -> Result<()> {
        if self.camera.is_some() {
            return Ok(());
        }

        debug!("Opening camera index {}", self.config.index);
        let format = CameraFormat::new(
            Resolution::new(self.config.width, self.config.height),
            FrameFormat::MJPEG,
            self.config.fps,
        );
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));

        let mut camera = Camera::new(CameraIndex::Index(self.config.index), requested)
            .map_err(|e| TrackerError::Camera(format!("failed to open camera {}: {}", self.config.index, e)))?;
        camera
            .open_stream()
            .map_err(|e| TrackerError::Camera(format!("failed to open camera stream: {}", e)))?;

        let res = camera.resolution();
        info!(
            "Camera {} opened at {}x{} @ {} fps",
            self.config.index,
            res.width(),
            res.height(),
            camera.frame_rate()
        );
        self.camera = Some(camera);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<DynamicImage> {
        let camera = self
            .camera
            .as_mut()
            .ok_or_else(|| TrackerError::Camera("camera is not open".to_string()))?;

        let frame = camera
            .frame()
            .map_err(|e| TrackerError::Camera(format!("failed to capture frame: {}", e)))?;
        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| TrackerError::Camera(format!("failed to decode frame: {}", e)))?;

        let (width, height) = (decoded.width(), decoded.height());
        let img: RgbImage = ImageBuffer::from_raw(width, height, decoded.into_raw())
            .ok_or_else(|| TrackerError::Camera("frame buffer size mismatch".to_string()))?;

        if self.config.mirror {
            Ok(DynamicImage::ImageRgb8(image::imageops::flip_horizontal(&img)))
        } else {
            Ok(DynamicImage::ImageRgb8(img))
        }
    }

    fn release(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                warn!("Failed to stop camera stream: {}", e);
            }
            info!("Camera {} released", self.config.index);
        }
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        self.release();
    }
}
