use super::types::{CaptureError, FacingMode, RawFrame};

/// A camera that can hand out live streams.
///
/// Implementations own the hardware; a stream returned from `open` holds the
/// device until `stop` is called on it.
pub trait CameraDevice: Send + Sync {
    fn open(&self, facing: FacingMode) -> Result<Box<dyn VideoStream>, CaptureError>;
}

/// A live stream from a `CameraDevice`.
pub trait VideoStream: Send {
    /// Sample the current frame
    fn read_frame(&mut self) -> Result<RawFrame, CaptureError>;

    /// Stop all device tracks. Called exactly once, by the owning handle.
    fn stop(&mut self);
}
