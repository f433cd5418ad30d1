use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::RecorderError;

/// Bitrate used when the configured value is zero.
pub const FALLBACK_BITS_PER_SECOND: u32 = 2_500_000;

pub const DEFAULT_FILE_NAME: &str = "recording.webm";

pub const DEFAULT_MIME_TYPE: &str = "video/webm";

/// Recorder settings.
///
/// The defaults are the compiled-in constants; a JSON file may override any subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecorderSettings {
    /// Frame rate requested from the visual surface (default: 30).
    pub frame_rate: u32,

    /// Target video bitrate (default: 8 Mbps).
    pub bits_per_second: u32,

    /// Mix the microphone into the recording (default: true).
    pub record_microphone_audio: bool,

    /// Mix lens-internal audio taps into the recording (default: true).
    pub record_lens_audio: bool,

    /// MIME types in descending preference order.
    pub codec_preferences: Vec<String>,

    /// Encoder chunk interval in milliseconds (default: 100).
    pub chunk_interval_ms: u64,

    /// File name used when saving from the record controller.
    pub output_file_name: String,
}

impl RecorderSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.frame_rate == 0 {
            return Err("frame rate must be positive".into());
        }
        if self.chunk_interval_ms == 0 {
            return Err("chunk interval must be positive".into());
        }
        if self.codec_preferences.is_empty() {
            return Err("codec preference list is empty".into());
        }
        if self.output_file_name.trim().is_empty() {
            return Err("output file name is empty".into());
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, RecorderError> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| RecorderError::StorageError(format!("failed to parse settings: {}", e)))?;
        settings.validate().map_err(RecorderError::StorageError)?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, RecorderError> {
        let json = fs::read_to_string(path)
            .map_err(|e| RecorderError::StorageError(format!("failed to read settings: {}", e)))?;
        Self::from_json_str(&json)
    }

    /// Bitrate handed to the encoder.
    pub fn effective_bits_per_second(&self) -> u32 {
        if self.bits_per_second == 0 {
            FALLBACK_BITS_PER_SECOND
        } else {
            self.bits_per_second
        }
    }
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            frame_rate: 30,
            bits_per_second: 8_000_000,
            record_microphone_audio: true,
            record_lens_audio: true,
            codec_preferences: vec![
                "video/webm;codecs=vp9".into(),
                "video/webm;codecs=h264".into(),
                "video/webm;codecs=vp8".into(),
                "video/webm".into(),
            ],
            chunk_interval_ms: 100,
            output_file_name: DEFAULT_FILE_NAME.into(),
        }
    }
}
