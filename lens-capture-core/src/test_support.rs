//! Hand-written host fakes shared by unit tests.

use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::models::artifact::{ArtifactFile, ShareData};
use crate::models::error::RecorderError;
use crate::models::media::{
    AudioNodeRef, ContextId, MediaStream, MediaTrack, NodeKind, StreamDestination, TrackKind,
};
use crate::traits::audio_graph::AudioGraph;
use crate::traits::file_sink::{FileSink, ShareTarget, UserNotifier};
use crate::traits::media_encoder::{EncoderEvent, EncoderOptions, MediaEncoder, MediaEncoderFactory};
use crate::traits::visual_surface::VisualSurface;

pub fn mic_stream() -> MediaStream {
    MediaStream::with_tracks(vec![
        MediaTrack::new(TrackKind::Video, "camera"),
        MediaTrack::new(TrackKind::Audio, "microphone"),
    ])
}

pub fn audio_stream(label: &str) -> MediaStream {
    MediaStream::with_tracks(vec![MediaTrack::new(TrackKind::Audio, label)])
}

#[derive(Default)]
struct GraphState {
    next_id: u64,
    outputs: HashMap<ContextId, AudioNodeRef>,
    edges: Vec<(AudioNodeRef, AudioNodeRef)>,
    fail_stream_destinations: bool,
}

impl GraphState {
    fn node(&mut self, context: ContextId, kind: NodeKind) -> AudioNodeRef {
        self.next_id += 1;
        AudioNodeRef {
            context,
            id: self.next_id,
            kind,
        }
    }
}

pub struct FakeAudioGraph {
    state: Mutex<GraphState>,
}

impl FakeAudioGraph {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GraphState::default()),
        }
    }

    pub fn create_node(&self, context: ContextId, kind: NodeKind) -> AudioNodeRef {
        self.state.lock().node(context, kind)
    }

    pub fn edges(&self) -> Vec<(AudioNodeRef, AudioNodeRef)> {
        self.state.lock().edges.clone()
    }

    pub fn fail_stream_destinations(&self, fail: bool) {
        self.state.lock().fail_stream_destinations = fail;
    }
}

impl AudioGraph for FakeAudioGraph {
    fn create_context(&self) -> Result<ContextId, RecorderError> {
        let mut state = self.state.lock();
        let context = ContextId(state.outputs.len() as u64 + 1);
        let output = state.node(context, NodeKind::Output);
        state.outputs.insert(context, output);
        Ok(context)
    }

    fn destination(&self, context: ContextId) -> Result<AudioNodeRef, RecorderError> {
        self.state
            .lock()
            .outputs
            .get(&context)
            .copied()
            .ok_or_else(|| RecorderError::AudioGraph(format!("unknown context {:?}", context)))
    }

    fn create_processing_node(&self, context: ContextId) -> Result<AudioNodeRef, RecorderError> {
        Ok(self.create_node(context, NodeKind::Processing))
    }

    fn create_stream_source(
        &self,
        context: ContextId,
        stream: &MediaStream,
    ) -> Result<AudioNodeRef, RecorderError> {
        if stream.first_audio_track().is_none() {
            return Err(RecorderError::AudioGraph("stream has no audio track".into()));
        }
        Ok(self.state.lock().node(context, NodeKind::StreamSource))
    }

    fn create_stream_destination(
        &self,
        context: ContextId,
    ) -> Result<StreamDestination, RecorderError> {
        let mut state = self.state.lock();
        if state.fail_stream_destinations {
            return Err(RecorderError::AudioGraph("stream destination refused".into()));
        }
        Ok(StreamDestination {
            node: state.node(context, NodeKind::StreamDestination),
            stream: audio_stream("stream-destination"),
        })
    }

    fn connect(&self, source: AudioNodeRef, destination: AudioNodeRef) -> Result<(), RecorderError> {
        self.state.lock().edges.push((source, destination));
        Ok(())
    }
}

pub struct FakeSurface {
    pub capturable: bool,
    pub video_tracks: usize,
    /// Frame rate of every capture request, in order.
    pub frame_rates: Mutex<Vec<u32>>,
}

impl FakeSurface {
    pub fn canvas() -> Self {
        Self {
            capturable: true,
            video_tracks: 1,
            frame_rates: Mutex::new(Vec::new()),
        }
    }
}

impl VisualSurface for FakeSurface {
    fn supports_capture(&self) -> bool {
        self.capturable
    }

    fn capture_stream(&self, frame_rate: u32) -> Result<MediaStream, RecorderError> {
        self.frame_rates.lock().push(frame_rate);
        let tracks = (0..self.video_tracks)
            .map(|i| MediaTrack::new(TrackKind::Video, format!("canvas-{}", i)))
            .collect();
        Ok(MediaStream::with_tracks(tracks))
    }
}

/// What the fake encoder factory observed.
#[derive(Default)]
pub struct EncoderTrace {
    pub supported: Vec<String>,
    pub queried: Vec<String>,
    pub created: Vec<EncoderOptions>,
    pub timeslice: Option<Duration>,
    pub sender: Option<Sender<EncoderEvent>>,
    pub stop_calls: usize,
    pub fail_create: bool,
    pub fail_start: bool,
    /// Chunk queued by `stop()` before `Stopped`.
    pub flush_on_stop: Option<Vec<u8>>,
    /// Whether `stop()` queues `Stopped` itself.
    pub stopped_on_stop: bool,
}

#[derive(Clone)]
pub struct FakeEncoderFactory {
    pub available: bool,
    pub trace: Arc<Mutex<EncoderTrace>>,
}

impl FakeEncoderFactory {
    pub fn supporting(types: &[&str]) -> Self {
        let trace = EncoderTrace {
            supported: types.iter().map(|t| t.to_string()).collect(),
            stopped_on_stop: true,
            ..Default::default()
        };
        Self {
            available: true,
            trace: Arc::new(Mutex::new(trace)),
        }
    }

    /// Deliver an event as the running encoder would.
    pub fn emit(&self, event: EncoderEvent) {
        if let Some(sender) = self.trace.lock().sender.as_ref() {
            sender.send(event).ok();
        }
    }
}

impl MediaEncoderFactory for FakeEncoderFactory {
    fn is_supported(&self) -> bool {
        self.available
    }

    fn is_type_supported(&self, mime_type: &str) -> bool {
        let mut trace = self.trace.lock();
        trace.queried.push(mime_type.to_string());
        trace.supported.iter().any(|t| t == mime_type)
    }

    fn create(
        &self,
        _stream: &MediaStream,
        options: EncoderOptions,
    ) -> Result<Box<dyn MediaEncoder>, RecorderError> {
        let mut trace = self.trace.lock();
        if trace.fail_create {
            return Err(RecorderError::RecorderInitFailure("encoder rejected options".into()));
        }
        trace.created.push(options);
        Ok(Box::new(FakeEncoder {
            trace: Arc::clone(&self.trace),
        }))
    }
}

struct FakeEncoder {
    trace: Arc<Mutex<EncoderTrace>>,
}

impl MediaEncoder for FakeEncoder {
    fn start(
        &mut self,
        timeslice: Duration,
        events: Sender<EncoderEvent>,
    ) -> Result<(), RecorderError> {
        let mut trace = self.trace.lock();
        if trace.fail_start {
            return Err(RecorderError::RecorderStartFailure("device busy".into()));
        }
        trace.timeslice = Some(timeslice);
        trace.sender = Some(events);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), RecorderError> {
        let mut trace = self.trace.lock();
        trace.stop_calls += 1;
        let flush = trace.flush_on_stop.take();
        if let Some(sender) = trace.sender.as_ref() {
            if let Some(chunk) = flush {
                sender.send(EncoderEvent::DataAvailable(chunk)).ok();
            }
            if trace.stopped_on_stop {
                sender.send(EncoderEvent::Stopped).ok();
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct CollectingSink {
    pub downloads: Mutex<Vec<ArtifactFile>>,
    pub fail: bool,
}

impl FileSink for CollectingSink {
    fn download(&self, file: &ArtifactFile) -> Result<(), RecorderError> {
        if self.fail {
            return Err(RecorderError::StorageError("disk full".into()));
        }
        self.downloads.lock().push(file.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeShareTarget {
    pub can_share: bool,
    pub fail: bool,
    pub shared: Mutex<Vec<ShareData>>,
}

impl ShareTarget for FakeShareTarget {
    fn can_share(&self, _data: &ShareData) -> bool {
        self.can_share
    }

    fn share(&self, data: &ShareData) -> Result<(), RecorderError> {
        if self.fail {
            return Err(RecorderError::ShareFailure("user dismissed the share sheet".into()));
        }
        self.shared.lock().push(data.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct CollectingNotifier {
    pub alerts: Mutex<Vec<String>>,
}

impl UserNotifier for CollectingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().push(message.to_string());
    }
}
