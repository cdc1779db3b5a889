//! Virtual camera backed by still images on disk.
//!
//! `front.{jpg,jpeg,png}` serves the user-facing camera and `back.*` the
//! environment-facing one. The device behaves like real hardware in one
//! respect that matters: only one stream may hold it at a time.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::RgbImage;
use tracing::{debug, info};

use super::device::{CameraDevice, VideoStream};
use super::types::{CaptureError, FacingMode, RawFrame};

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub struct ImageDirCamera {
    dir: PathBuf,
    in_use: Arc<AtomicBool>,
}

impl ImageDirCamera {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        info!(dir = %dir.display(), "Initialized image-directory camera");
        Self {
            dir,
            in_use: Arc::new(AtomicBool::new(false)),
        }
    }

    fn source_for(&self, facing: FacingMode) -> Option<PathBuf> {
        let stem = match facing {
            FacingMode::User => "front",
            FacingMode::Environment => "back",
        };
        IMAGE_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", stem, ext)))
            .find(|p| p.is_file())
    }
}

fn load_still(path: &Path) -> Result<RgbImage, CaptureError> {
    image::open(path)
        .map(|img| img.to_rgb8())
        .map_err(|e| CaptureError::DeviceUnavailable(format!("{}: {}", path.display(), e)))
}

impl CameraDevice for ImageDirCamera {
    fn open(&self, facing: FacingMode) -> Result<Box<dyn VideoStream>, CaptureError> {
        let path = self.source_for(facing).ok_or_else(|| {
            CaptureError::DeviceUnavailable(format!(
                "no {} camera in {}",
                facing,
                self.dir.display()
            ))
        })?;

        if self
            .in_use
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CaptureError::DeviceUnavailable("camera is busy".to_string()));
        }

        match load_still(&path) {
            Ok(image) => {
                debug!(path = %path.display(), %facing, "Camera stream started");
                Ok(Box::new(ImageDirStream {
                    image,
                    in_use: self.in_use.clone(),
                    stopped: false,
                }))
            }
            Err(e) => {
                self.in_use.store(false, Ordering::Release);
                Err(e)
            }
        }
    }
}

struct ImageDirStream {
    image: RgbImage,
    in_use: Arc<AtomicBool>,
    stopped: bool,
}

impl VideoStream for ImageDirStream {
    fn read_frame(&mut self) -> Result<RawFrame, CaptureError> {
        if self.stopped {
            return Err(CaptureError::NotStreaming);
        }
        Ok(RawFrame {
            width: self.image.width(),
            height: self.image.height(),
            rgb: self.image.as_raw().clone(),
        })
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.in_use.store(false, Ordering::Release);
        }
    }
}
