use serde::{Deserialize, Serialize};

/// Kind of a media track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Audio,
    Video,
}

/// A single live track inside a media stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaTrack {
    pub id: String,
    pub kind: TrackKind,
    pub label: String,
}

impl MediaTrack {
    pub fn new(kind: TrackKind, label: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            label: label.into(),
        }
    }
}

/// An ordered set of live tracks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaStream {
    pub id: String,
    pub tracks: Vec<MediaTrack>,
}

impl MediaStream {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tracks: Vec::new(),
        }
    }

    pub fn with_tracks(tracks: Vec<MediaTrack>) -> Self {
        Self {
            tracks,
            ..Self::new()
        }
    }

    pub fn add_track(&mut self, track: MediaTrack) {
        self.tracks.push(track);
    }

    pub fn video_tracks(&self) -> impl Iterator<Item = &MediaTrack> {
        self.tracks.iter().filter(|t| t.kind == TrackKind::Video)
    }

    pub fn audio_tracks(&self) -> impl Iterator<Item = &MediaTrack> {
        self.tracks.iter().filter(|t| t.kind == TrackKind::Audio)
    }

    pub fn first_video_track(&self) -> Option<&MediaTrack> {
        self.video_tracks().next()
    }

    pub fn first_audio_track(&self) -> Option<&MediaTrack> {
        self.audio_tracks().next()
    }
}

/// Identity of an audio context, assigned by the host in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContextId(pub u64);

/// Role of an audio node inside its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Any processing node (gain, oscillator, buffer source, ...).
    Processing,
    /// Node fed from a media stream.
    StreamSource,
    /// Node whose input is exposed as a media stream.
    StreamDestination,
    /// The context's terminal output (speakers).
    Output,
}

/// Handle to a node owned by the host audio subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioNodeRef {
    pub context: ContextId,
    pub id: u64,
    pub kind: NodeKind,
}

impl AudioNodeRef {
    pub fn is_output(&self) -> bool {
        self.kind == NodeKind::Output
    }
}

/// A stream-destination node together with the stream it exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDestination {
    pub node: AudioNodeRef,
    pub stream: MediaStream,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_filters() {
        let stream = MediaStream::with_tracks(vec![
            MediaTrack::new(TrackKind::Audio, "mic"),
            MediaTrack::new(TrackKind::Video, "camera"),
            MediaTrack::new(TrackKind::Audio, "mic-2"),
        ]);

        assert_eq!(stream.audio_tracks().count(), 2);
        assert_eq!(stream.video_tracks().count(), 1);
        assert_eq!(stream.first_audio_track().map(|t| t.label.as_str()), Some("mic"));
        assert_eq!(stream.first_video_track().map(|t| t.label.as_str()), Some("camera"));
    }

    #[test]
    fn empty_stream_has_no_tracks() {
        let stream = MediaStream::new();
        assert!(stream.first_video_track().is_none());
        assert!(stream.first_audio_track().is_none());
    }
}
