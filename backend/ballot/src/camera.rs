//! Cosmetic camera preview for the face channel.
//!
//! The stream is never inspected. It is shown while the face scan runs and
//! released when the scan completes.
use crate::error::CameraError;

pub trait Camera {
    /// Requests a user-facing video stream.
    fn acquire(&mut self) -> Result<Box<dyn CameraStream>, CameraError>;
}

pub trait CameraStream {
    fn label(&self) -> &str;

    /// Stops every track on the stream.
    fn stop(&mut self);
}

/// Platform without a camera. Face scans always take the fallback path.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCamera;

impl Camera for NoCamera {
    fn acquire(&mut self) -> Result<Box<dyn CameraStream>, CameraError> {
        Err(CameraError::Unavailable)
    }
}
