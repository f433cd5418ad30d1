use std::fs;
use std::path::{Path, PathBuf};

use crate::models::artifact::{ArtifactFile, ArtifactMetadata};
use crate::models::error::RecorderError;

const SIDECAR_SUFFIX: &str = ".metadata.json";

/// Paths written for one stored recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecording {
    pub recording: PathBuf,
    /// Present when the file carried artifact metadata.
    pub sidecar: Option<PathBuf>,
}

/// A flat directory of saved recordings, each with an optional
/// `<name>.metadata.json` sidecar.
#[derive(Debug, Clone)]
pub struct RecordingStore {
    dir: PathBuf,
}

impl RecordingStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where a recording named `file_name` is stored.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    pub fn sidecar_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(format!("{}{}", file_name, SIDECAR_SUFFIX))
    }

    /// Write the file bytes and, if the file carries metadata, its sidecar.
    pub fn save(&self, file: &ArtifactFile) -> Result<StoredRecording, RecorderError> {
        let recording = self.write_bytes(file)?;
        let sidecar = match file.metadata {
            Some(ref metadata) => Some(self.write_sidecar(&file.name, metadata)?),
            None => None,
        };
        Ok(StoredRecording { recording, sidecar })
    }

    /// Write only the file bytes. Returns the written path.
    pub fn write_bytes(&self, file: &ArtifactFile) -> Result<PathBuf, RecorderError> {
        let name = checked_name(&file.name)?;
        fs::create_dir_all(&self.dir)
            .map_err(|e| RecorderError::StorageError(format!("failed to create directory: {}", e)))?;
        let path = self.dir.join(name);
        fs::write(&path, &file.bytes).map_err(|e| {
            RecorderError::StorageError(format!("failed to write {}: {}", path.display(), e))
        })?;
        Ok(path)
    }

    pub fn read_metadata(&self, file_name: &str) -> Result<ArtifactMetadata, RecorderError> {
        checked_name(file_name)?;
        let json = fs::read_to_string(self.sidecar_for(file_name))
            .map_err(|e| RecorderError::StorageError(format!("failed to read metadata: {}", e)))?;
        serde_json::from_str(&json)
            .map_err(|e| RecorderError::StorageError(format!("failed to parse metadata: {}", e)))
    }

    fn write_sidecar(
        &self,
        file_name: &str,
        metadata: &ArtifactMetadata,
    ) -> Result<PathBuf, RecorderError> {
        let json = serde_json::to_string_pretty(metadata)
            .map_err(|e| RecorderError::StorageError(format!("failed to serialize metadata: {}", e)))?;
        let path = self.sidecar_for(file_name);
        fs::write(&path, json)
            .map_err(|e| RecorderError::StorageError(format!("failed to write metadata: {}", e)))?;
        Ok(path)
    }
}

/// File names must be a single plain path component.
fn checked_name(file_name: &str) -> Result<&Path, RecorderError> {
    let name = Path::new(file_name);
    if name.components().count() != 1 || name.file_name().is_none() {
        return Err(RecorderError::StorageError(format!(
            "invalid file name: {}",
            file_name
        )));
    }
    Ok(name)
}
