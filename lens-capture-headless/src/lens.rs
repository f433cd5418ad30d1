//! Stand-in for the third-party lens renderer's audio.
//!
//! A real lens builds its own audio graph that the application cannot see.
//! `SimulatedLens` does the same through whatever [`AudioGraph`] it is given,
//! so a [`lens_capture_core::MonitoredAudioGraph`] can discover its output.

use lens_capture_core::models::error::RecorderError;
use lens_capture_core::models::media::{AudioNodeRef, ContextId};
use lens_capture_core::traits::audio_graph::AudioGraph;

/// Audio wiring created by one applied lens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedLens {
    pub context: ContextId,
    /// Sound sources, each routed through `mixer`.
    pub voices: Vec<AudioNodeRef>,
    /// Node that feeds the speakers.
    pub mixer: AudioNodeRef,
}

impl SimulatedLens {
    /// Build `voices` sound sources → gain → output in a fresh context.
    pub fn apply(graph: &dyn AudioGraph, voices: usize) -> Result<Self, RecorderError> {
        let context = graph.create_context()?;
        let mixer = graph.create_processing_node(context)?;

        let mut nodes = Vec::with_capacity(voices);
        for _ in 0..voices {
            let voice = graph.create_processing_node(context)?;
            graph.connect(voice, mixer)?;
            nodes.push(voice);
        }

        graph.connect(mixer, graph.destination(context)?)?;
        log::info!("Lens applied with {} voices in {:?}", voices, context);

        Ok(Self {
            context,
            voices: nodes,
            mixer,
        })
    }
}
