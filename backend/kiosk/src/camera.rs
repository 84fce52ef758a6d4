use std::{
    fs::File,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use ballot::{Camera, CameraError, CameraStream};
use tracing::debug;

const DEFAULT_DEVICE: &str = "/dev/video0";

/// Opens a V4L-style device node for the duration of a face scan. Frames
/// are never read.
#[derive(Debug)]
pub struct DeviceCamera {
    path: PathBuf,
}

impl DeviceCamera {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Default for DeviceCamera {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE)
    }
}

impl Camera for DeviceCamera {
    fn acquire(&mut self) -> Result<Box<dyn CameraStream>, CameraError> {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => CameraError::PermissionDenied,
            _ => CameraError::Unavailable,
        })?;

        Ok(Box::new(DeviceStream {
            label: self.path.display().to_string(),
            file: Some(file),
        }))
    }
}

struct DeviceStream {
    label: String,
    file: Option<File>,
}

impl CameraStream for DeviceStream {
    fn label(&self) -> &str {
        &self.label
    }

    fn stop(&mut self) {
        if self.file.take().is_some() {
            debug!("Released {}", self.label);
        }
    }
}
