use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Which physical camera a stream uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front camera
    User,
    /// Rear camera
    #[default]
    Environment,
}

impl FacingMode {
    pub fn opposite(self) -> Self {
        match self {
            FacingMode::User => FacingMode::Environment,
            FacingMode::Environment => FacingMode::User,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FacingMode::User => "user",
            FacingMode::Environment => "environment",
        }
    }
}

impl std::fmt::Display for FacingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("no camera stream is active")]
    NotStreaming,
    #[error("a capture is already in progress")]
    CaptureInProgress,
    #[error("failed to read frame: {0}")]
    Frame(String),
    #[error("failed to encode frame: {0}")]
    Encode(String),
}

/// One uncompressed RGB8 frame as delivered by a device.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl RawFrame {
    pub fn is_complete(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.rgb.len() == self.width as usize * self.height as usize * 3
    }
}

/// An encoded still, handed straight to the inference gateway.
#[derive(Debug, Clone)]
pub struct CaptureFrame {
    pub id: Uuid,
    pub facing_mode: FacingMode,
    pub width: u32,
    pub height: u32,
    pub mime_type: String,
    pub data: Vec<u8>,
    pub captured_at: DateTime<Utc>,
}
