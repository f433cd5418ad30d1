//! Synthetic capture surfaces and user media.

use lens_capture_core::models::error::RecorderError;
use lens_capture_core::models::media::{MediaStream, MediaTrack, TrackKind};
use lens_capture_core::traits::visual_surface::VisualSurface;

/// Render target the lens draws into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanvasSurface {
    pub width: u32,
    pub height: u32,
}

impl CanvasSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// 1080x1920 on mobile, 1920x1080 elsewhere.
    pub fn for_device(is_mobile: bool) -> Self {
        if is_mobile {
            Self::new(1080, 1920)
        } else {
            Self::new(1920, 1080)
        }
    }
}

impl VisualSurface for CanvasSurface {
    fn supports_capture(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    fn capture_stream(&self, frame_rate: u32) -> Result<MediaStream, RecorderError> {
        if frame_rate == 0 {
            return Err(RecorderError::StreamInitFailure("frame rate must be positive".into()));
        }
        let label = format!("canvas {}x{}@{}", self.width, self.height, frame_rate);
        Ok(MediaStream::with_tracks(vec![MediaTrack::new(TrackKind::Video, label)]))
    }
}

/// Acquire a camera and/or microphone stream.
pub fn acquire_user_media(video: bool, audio: bool) -> Result<MediaStream, RecorderError> {
    if !video && !audio {
        return Err(RecorderError::UnsupportedEnvironment(
            "at least one of audio or video must be requested".into(),
        ));
    }

    let mut stream = MediaStream::new();
    if video {
        stream.add_track(MediaTrack::new(TrackKind::Video, "Headless Camera"));
    }
    if audio {
        stream.add_track(MediaTrack::new(TrackKind::Audio, "Headless Microphone"));
    }
    log::info!("Acquired user media with {} tracks", stream.tracks.len());
    Ok(stream)
}
