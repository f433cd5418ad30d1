use crate::models::error::RecorderError;
use crate::models::media::MediaStream;

/// A rendered surface (canvas, video element) whose pixels can be captured live.
pub trait VisualSurface: Send + Sync {
    /// Whether the host can capture a stream from this surface at all.
    fn supports_capture(&self) -> bool;

    /// Capture a live stream at `frame_rate`. Must yield at least one video track.
    fn capture_stream(&self, frame_rate: u32) -> Result<MediaStream, RecorderError>;
}
