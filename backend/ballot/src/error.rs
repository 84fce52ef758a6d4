use thiserror::Error;

use crate::render::Element;

#[derive(Error, Debug)]
pub enum BallotError {
    #[error("Unknown candidate: {0}")]
    UnknownCandidate(String),

    #[error("Render surface is missing required element {0:?}")]
    MissingElement(Element),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why a camera stream could not be shown. Both cases fall back to the
/// non-visual face path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("No camera available")]
    Unavailable,

    #[error("Camera permission denied")]
    PermissionDenied,
}
