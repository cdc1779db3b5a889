use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::device::{CameraDevice, VideoStream};
use super::encoding::{encode_jpeg, JPEG_MIME};
use super::types::{CaptureError, CaptureFrame, FacingMode};

/// Exclusive owner of one open camera stream. Dropping it stops the tracks.
pub struct StreamHandle {
    stream: Box<dyn VideoStream>,
    facing: FacingMode,
    opened_at: DateTime<Utc>,
}

impl StreamHandle {
    fn new(stream: Box<dyn VideoStream>, facing: FacingMode) -> Self {
        Self {
            stream,
            facing,
            opened_at: Utc::now(),
        }
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.stream.stop();
        debug!(facing = %self.facing, "Camera stream released");
    }
}

/// Marks a capture as outstanding for as long as it lives.
struct CaptureGuard<'a>(&'a AtomicBool);

impl<'a> CaptureGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, CaptureError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| CaptureGuard(flag))
            .map_err(|_| CaptureError::CaptureInProgress)
    }
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceStatus {
    pub streaming: bool,
    pub facing_mode: Option<FacingMode>,
    pub opened_at: Option<DateTime<Utc>>,
}

/// Live camera feed with on-demand still capture.
pub struct CaptureSurface {
    device: Arc<dyn CameraDevice>,
    stream: Mutex<Option<StreamHandle>>,
    capturing: AtomicBool,
    jpeg_quality: u8,
}

impl CaptureSurface {
    pub fn new(device: Arc<dyn CameraDevice>, jpeg_quality: u8) -> Self {
        Self {
            device,
            stream: Mutex::new(None),
            capturing: AtomicBool::new(false),
            jpeg_quality,
        }
    }

    /// Start streaming from the camera with the given facing mode.
    /// Any stream already open is released before the device is asked again.
    pub async fn open(&self, facing: FacingMode) -> Result<FacingMode, CaptureError> {
        let mut slot = self.stream.lock().await;
        drop(slot.take());

        let stream = self.device.open(facing).map_err(|e| {
            warn!(%facing, "Error accessing camera: {}", e);
            e
        })?;
        *slot = Some(StreamHandle::new(stream, facing));
        info!(%facing, "Camera stream opened");
        Ok(facing)
    }

    /// Swap to the opposite camera. The current stream is stopped before the
    /// new one is requested, so two device handles never coexist.
    pub async fn switch_facing(&self) -> Result<FacingMode, CaptureError> {
        let mut slot = self.stream.lock().await;
        let current = slot.take().ok_or(CaptureError::NotStreaming)?;
        let next = current.facing().opposite();
        drop(current);

        let stream = self.device.open(next).map_err(|e| {
            warn!(facing = %next, "Error switching camera: {}", e);
            e
        })?;
        *slot = Some(StreamHandle::new(stream, next));
        info!(facing = %next, "Camera switched");
        Ok(next)
    }

    /// Sample the current frame and encode it as a JPEG still.
    pub async fn capture(&self) -> Result<CaptureFrame, CaptureError> {
        let _guard = CaptureGuard::acquire(&self.capturing)?;

        let (raw, facing) = {
            let mut slot = self.stream.lock().await;
            let handle = slot.as_mut().ok_or(CaptureError::NotStreaming)?;
            (handle.stream.read_frame()?, handle.facing)
        };

        let quality = self.jpeg_quality;
        let (width, height) = (raw.width, raw.height);
        let data = tokio::task::spawn_blocking(move || encode_jpeg(&raw, quality))
            .await
            .map_err(|e| CaptureError::Encode(format!("encode task failed: {}", e)))??;

        let frame = CaptureFrame {
            id: Uuid::new_v4(),
            facing_mode: facing,
            width,
            height,
            mime_type: JPEG_MIME.to_string(),
            data,
            captured_at: Utc::now(),
        };
        debug!(id = %frame.id, width, height, bytes = frame.data.len(), "Frame captured");
        Ok(frame)
    }

    /// Release the camera. Closing an already closed surface does nothing.
    pub async fn close(&self) {
        if let Some(handle) = self.stream.lock().await.take() {
            info!(facing = %handle.facing(), "Camera closed");
        }
    }

    pub async fn status(&self) -> SurfaceStatus {
        let slot = self.stream.lock().await;
        SurfaceStatus {
            streaming: slot.is_some(),
            facing_mode: slot.as_ref().map(|h| h.facing),
            opened_at: slot.as_ref().map(|h| h.opened_at),
        }
    }
}
