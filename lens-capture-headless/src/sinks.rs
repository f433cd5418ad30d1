//! Filesystem-backed download, share, and alert surfaces.

use std::path::PathBuf;

use lens_capture_core::models::artifact::{ArtifactFile, ArtifactMetadata, ShareData};
use lens_capture_core::models::error::RecorderError;
use lens_capture_core::storage::RecordingStore;
use lens_capture_core::traits::file_sink::{FileSink, ShareTarget, UserNotifier};

/// "Downloads" files into a directory, each with a `<name>.metadata.json` sidecar.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    store: RecordingStore,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            store: RecordingStore::new(dir),
        }
    }

    /// Where a download named `file_name` lands.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.store.path_for(file_name)
    }

    /// Metadata sidecar of an earlier download.
    pub fn metadata_for(&self, file_name: &str) -> Result<ArtifactMetadata, RecorderError> {
        self.store.read_metadata(file_name)
    }
}

impl FileSink for DirectorySink {
    fn download(&self, file: &ArtifactFile) -> Result<(), RecorderError> {
        let stored = self.store.save(file)?;
        log::info!(
            "Downloaded {} ({} bytes)",
            stored.recording.display(),
            file.bytes.len()
        );
        if stored.sidecar.is_none() {
            log::warn!("No metadata for {}, sidecar skipped", file.name);
        }
        Ok(())
    }
}

/// Share sheet that drops video files into an existing outbox directory.
#[derive(Debug, Clone)]
pub struct OutboxShareTarget {
    outbox: RecordingStore,
}

impl OutboxShareTarget {
    pub fn new(outbox: impl Into<PathBuf>) -> Self {
        Self {
            outbox: RecordingStore::new(outbox),
        }
    }
}

impl ShareTarget for OutboxShareTarget {
    fn can_share(&self, data: &ShareData) -> bool {
        self.outbox.dir().is_dir()
            && !data.files.is_empty()
            && data.files.iter().all(|f| f.mime_type.starts_with("video/"))
    }

    fn share(&self, data: &ShareData) -> Result<(), RecorderError> {
        for file in &data.files {
            self.outbox
                .write_bytes(file)
                .map_err(|e| RecorderError::ShareFailure(e.to_string()))?;
        }
        log::info!("Shared {} file(s): {}", data.files.len(), data.title);
        Ok(())
    }
}

/// Alerts go to the error log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl UserNotifier for LogNotifier {
    fn alert(&self, message: &str) {
        log::error!("ALERT: {}", message);
    }
}
