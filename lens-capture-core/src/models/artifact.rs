use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::settings::{DEFAULT_FILE_NAME, DEFAULT_MIME_TYPE};

/// Finalized recording: the ordered chunks plus their declared media type.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputArtifact {
    chunks: Vec<Vec<u8>>,
    mime_type: String,
    metadata: ArtifactMetadata,
}

impl OutputArtifact {
    pub fn new(chunks: Vec<Vec<u8>>, mime_type: Option<&str>) -> Self {
        let mime_type = mime_type.unwrap_or(DEFAULT_MIME_TYPE).to_string();
        let metadata = ArtifactMetadata::describe(&chunks, &mime_type);
        Self {
            chunks,
            mime_type,
            metadata,
        }
    }

    pub fn chunks(&self) -> &[Vec<u8>] {
        &self.chunks
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }

    pub fn size_bytes(&self) -> u64 {
        self.metadata.size_bytes
    }

    /// Ordered concatenation of every chunk.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.chunks.concat()
    }

    /// Materialize as a named file; `None` falls back to `recording.webm`.
    pub fn to_file(&self, file_name: Option<&str>) -> ArtifactFile {
        ArtifactFile {
            name: resolve_file_name(file_name),
            mime_type: self.mime_type.clone(),
            bytes: self.to_bytes(),
            metadata: Some(self.metadata.clone()),
        }
    }
}

pub fn resolve_file_name(file_name: Option<&str>) -> String {
    match file_name {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => DEFAULT_FILE_NAME.to_string(),
    }
}

/// Metadata describing a finalized artifact.
///
/// Serializable for the JSON sidecar written next to saved files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub id: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub chunk_count: usize,
    pub checksum: String,
    pub created_at: String,
}

impl ArtifactMetadata {
    fn describe(chunks: &[Vec<u8>], mime_type: &str) -> Self {
        let mut hasher = Sha256::new();
        let mut size_bytes = 0u64;
        for chunk in chunks {
            hasher.update(chunk);
            size_bytes += chunk.len() as u64;
        }
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            mime_type: mime_type.to_string(),
            size_bytes,
            chunk_count: chunks.len(),
            checksum: format!("{:x}", hasher.finalize()),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// A downloadable file built from an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    /// Describes the recording the bytes came from, for sinks that keep a sidecar.
    pub metadata: Option<ArtifactMetadata>,
}

/// Payload handed to the OS share surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareData {
    pub files: Vec<ArtifactFile>,
    pub title: String,
    pub text: String,
}

impl ShareData {
    pub fn for_file(file: ArtifactFile) -> Self {
        Self {
            files: vec![file],
            title: "Share Recording".into(),
            text: "Check out my recording!".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_are_ordered_concatenation() {
        let artifact = OutputArtifact::new(
            vec![vec![1, 2], vec![3], vec![4, 5, 6]],
            Some("video/webm;codecs=vp9"),
        );

        assert_eq!(artifact.to_bytes(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(artifact.size_bytes(), 6);
        assert_eq!(artifact.metadata().chunk_count, 3);
        assert_eq!(artifact.mime_type(), "video/webm;codecs=vp9");
    }

    #[test]
    fn checksum_matches_concatenated_bytes() {
        let artifact = OutputArtifact::new(vec![b"ab".to_vec(), b"c".to_vec()], None);
        let expected = format!("{:x}", Sha256::digest(b"abc"));

        assert_eq!(artifact.metadata().checksum, expected);
    }

    #[test]
    fn mime_type_defaults_to_webm() {
        let artifact = OutputArtifact::new(Vec::new(), None);
        assert_eq!(artifact.mime_type(), "video/webm");
    }

    #[test]
    fn file_name_defaults() {
        let artifact = OutputArtifact::new(vec![vec![0]], None);

        assert_eq!(artifact.to_file(None).name, "recording.webm");
        assert_eq!(artifact.to_file(Some("")).name, "recording.webm");
        assert_eq!(artifact.to_file(Some("clip.webm")).name, "clip.webm");
        assert_eq!(artifact.to_file(None).metadata.as_ref(), Some(artifact.metadata()));
    }
}
