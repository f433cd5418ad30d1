use crate::models::artifact::{ArtifactFile, ShareData};
use crate::models::error::RecorderError;

/// Host surface that turns a file into a local download.
pub trait FileSink: Send + Sync {
    fn download(&self, file: &ArtifactFile) -> Result<(), RecorderError>;
}

/// Optional OS share sheet.
pub trait ShareTarget: Send + Sync {
    /// Capability query for this payload.
    fn can_share(&self, data: &ShareData) -> bool;

    fn share(&self, data: &ShareData) -> Result<(), RecorderError>;
}

/// Blocking user-facing alerts.
pub trait UserNotifier: Send + Sync {
    fn alert(&self, message: &str);
}
