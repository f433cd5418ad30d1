//! In-memory audio graph.
//!
//! Tracks contexts, nodes, and connections without processing any samples.
//! The edge list is inspectable so callers can verify how a graph was wired.

use std::collections::HashMap;

use parking_lot::Mutex;

use lens_capture_core::models::error::RecorderError;
use lens_capture_core::models::media::{
    AudioNodeRef, ContextId, MediaStream, MediaTrack, NodeKind, StreamDestination, TrackKind,
};
use lens_capture_core::traits::audio_graph::AudioGraph;

#[derive(Default)]
struct GraphState {
    next_context: u64,
    next_node: u64,
    outputs: HashMap<ContextId, AudioNodeRef>,
    nodes: Vec<AudioNodeRef>,
    edges: Vec<(AudioNodeRef, AudioNodeRef)>,
}

impl GraphState {
    fn add_node(&mut self, context: ContextId, kind: NodeKind) -> Result<AudioNodeRef, RecorderError> {
        if !self.outputs.contains_key(&context) {
            return Err(RecorderError::AudioGraph(format!("unknown context {:?}", context)));
        }
        self.next_node += 1;
        let node = AudioNodeRef {
            context,
            id: self.next_node,
            kind,
        };
        self.nodes.push(node);
        Ok(node)
    }
}

/// Audio graph that records its wiring instead of playing audio.
pub struct HeadlessAudioGraph {
    state: Mutex<GraphState>,
}

impl HeadlessAudioGraph {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GraphState::default()),
        }
    }

    pub fn contexts(&self) -> Vec<ContextId> {
        let mut contexts: Vec<ContextId> = self.state.lock().outputs.keys().copied().collect();
        contexts.sort();
        contexts
    }

    pub fn edges(&self) -> Vec<(AudioNodeRef, AudioNodeRef)> {
        self.state.lock().edges.clone()
    }

    /// Downstream nodes `node` is connected to, in connection order.
    pub fn connections_from(&self, node: AudioNodeRef) -> Vec<AudioNodeRef> {
        self.state
            .lock()
            .edges
            .iter()
            .filter(|(from, _)| *from == node)
            .map(|(_, to)| *to)
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.state.lock().nodes.len()
    }
}

impl Default for HeadlessAudioGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioGraph for HeadlessAudioGraph {
    fn create_context(&self) -> Result<ContextId, RecorderError> {
        let mut state = self.state.lock();
        state.next_context += 1;
        let context = ContextId(state.next_context);
        state.outputs.insert(
            context,
            AudioNodeRef {
                context,
                id: 0,
                kind: NodeKind::Output,
            },
        );
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
        self.state.lock().add_node(context, NodeKind::Processing)
    }

    fn create_stream_source(
        &self,
        context: ContextId,
        stream: &MediaStream,
    ) -> Result<AudioNodeRef, RecorderError> {
        if stream.first_audio_track().is_none() {
            return Err(RecorderError::AudioGraph(format!(
                "stream {} has no audio track",
                stream.id
            )));
        }
        self.state.lock().add_node(context, NodeKind::StreamSource)
    }

    fn create_stream_destination(
        &self,
        context: ContextId,
    ) -> Result<StreamDestination, RecorderError> {
        let node = self.state.lock().add_node(context, NodeKind::StreamDestination)?;
        let track = MediaTrack::new(TrackKind::Audio, format!("stream-destination-{}", node.id));
        Ok(StreamDestination {
            node,
            stream: MediaStream::with_tracks(vec![track]),
        })
    }

    fn connect(&self, source: AudioNodeRef, destination: AudioNodeRef) -> Result<(), RecorderError> {
        if source.context != destination.context {
            return Err(RecorderError::AudioGraph(
                "cannot connect nodes from different contexts".into(),
            ));
        }
        if source.kind == NodeKind::Output {
            return Err(RecorderError::AudioGraph("output node has no outputs".into()));
        }
        self.state.lock().edges.push((source, destination));
        Ok(())
    }
}
