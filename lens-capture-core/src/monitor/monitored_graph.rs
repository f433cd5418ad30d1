use std::sync::Arc;

use crate::models::error::RecorderError;
use crate::models::media::{AudioNodeRef, ContextId, MediaStream, StreamDestination};
use crate::traits::audio_graph::AudioGraph;

use super::tap_registry::{AudioTap, TapRegistry};

/// Audio graph decorator that discovers lens-internal audio.
///
/// Every context created through it is recorded in the [`TapRegistry`].
/// Every connection to a context's final output also gets a parallel
/// stream destination wired from the same source node, so the signal
/// reaching the speakers can be recorded. The original connection is
/// always made, even if the tap cannot be built.
///
/// ```text
/// [lens node] ──────────────→ [output]          (original path)
///      └────────────────────→ [stream dest] ──→ TapRegistry
/// ```
pub struct MonitoredAudioGraph<G: AudioGraph> {
    inner: G,
    registry: Arc<TapRegistry>,
}

impl<G: AudioGraph> MonitoredAudioGraph<G> {
    pub fn new(inner: G) -> Self {
        Self::with_registry(inner, Arc::new(TapRegistry::new()))
    }

    pub fn with_registry(inner: G, registry: Arc<TapRegistry>) -> Self {
        Self { inner, registry }
    }

    /// Registered contexts and taps.
    pub fn registry(&self) -> Arc<TapRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    fn attach_tap(&self, source: AudioNodeRef) -> Result<AudioTap, RecorderError> {
        let destination = self.inner.create_stream_destination(source.context)?;
        self.inner.connect(source, destination.node)?;
        Ok(AudioTap {
            context: source.context,
            source,
            destination,
        })
    }
}

impl<G: AudioGraph> AudioGraph for MonitoredAudioGraph<G> {
    fn create_context(&self) -> Result<ContextId, RecorderError> {
        let context = self.inner.create_context()?;
        let index = self.registry.register_context(context);
        log::info!("Audio context created: {:?} (index {})", context, index);
        Ok(context)
    }

    fn destination(&self, context: ContextId) -> Result<AudioNodeRef, RecorderError> {
        self.inner.destination(context)
    }

    fn create_processing_node(&self, context: ContextId) -> Result<AudioNodeRef, RecorderError> {
        self.inner.create_processing_node(context)
    }

    fn create_stream_source(
        &self,
        context: ContextId,
        stream: &MediaStream,
    ) -> Result<AudioNodeRef, RecorderError> {
        self.inner.create_stream_source(context, stream)
    }

    fn create_stream_destination(
        &self,
        context: ContextId,
    ) -> Result<StreamDestination, RecorderError> {
        self.inner.create_stream_destination(context)
    }

    fn connect(&self, source: AudioNodeRef, destination: AudioNodeRef) -> Result<(), RecorderError> {
        log::debug!(
            "Connecting node {} to node {} (context index {:?})",
            source.id,
            destination.id,
            self.registry.context_index(source.context)
        );

        if destination.is_output() {
            match self.attach_tap(source) {
                Ok(tap) => {
                    log::info!("Final output connection found, tapping node {}", source.id);
                    self.registry.record_tap(tap);
                }
                Err(e) => log::warn!("Failed to tap node {}: {}", source.id, e),
            }
        }

        self.inner.connect(source, destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::NodeKind;
    use crate::test_support::FakeAudioGraph;

    #[test]
    fn contexts_are_registered_in_creation_order() {
        let graph = MonitoredAudioGraph::new(FakeAudioGraph::new());

        let first = graph.create_context().unwrap();
        let second = graph.create_context().unwrap();

        let registry = graph.registry();
        assert_eq!(registry.contexts(), vec![first, second]);
        assert_eq!(registry.tap_count(), 0);
    }

    #[test]
    fn output_connection_gets_side_tap() {
        let graph = MonitoredAudioGraph::new(FakeAudioGraph::new());
        let context = graph.create_context().unwrap();
        let gain = graph.inner().create_node(context, NodeKind::Processing);
        let output = graph.destination(context).unwrap();

        graph.connect(gain, output).unwrap();

        let taps = graph.registry().taps_for(context);
        assert_eq!(taps.len(), 1);
        assert_eq!(taps[0].source, gain);
        assert_eq!(taps[0].stream().audio_tracks().count(), 1);

        // Original path intact, plus the tap edge.
        let edges = graph.inner().edges();
        assert!(edges.contains(&(gain, output)));
        assert!(edges.contains(&(gain, taps[0].destination.node)));
        assert_eq!(edges.len(), 2);
    }

    #[test]
    fn intermediate_connections_are_not_tapped() {
        let graph = MonitoredAudioGraph::new(FakeAudioGraph::new());
        let context = graph.create_context().unwrap();
        let osc = graph.inner().create_node(context, NodeKind::Processing);
        let gain = graph.inner().create_node(context, NodeKind::Processing);

        graph.connect(osc, gain).unwrap();

        assert_eq!(graph.registry().tap_count(), 0);
        assert_eq!(graph.inner().edges(), vec![(osc, gain)]);
    }

    #[test]
    fn tap_failure_still_connects_original() {
        let fake = FakeAudioGraph::new();
        fake.fail_stream_destinations(true);
        let graph = MonitoredAudioGraph::new(fake);
        let context = graph.create_context().unwrap();
        let gain = graph.inner().create_node(context, NodeKind::Processing);
        let output = graph.destination(context).unwrap();

        assert!(graph.connect(gain, output).is_ok());

        assert_eq!(graph.registry().tap_count(), 0);
        assert_eq!(graph.inner().edges(), vec![(gain, output)]);
    }

    #[test]
    fn shared_registry_sees_taps_from_every_context() {
        let registry = Arc::new(TapRegistry::new());
        let graph = MonitoredAudioGraph::with_registry(FakeAudioGraph::new(), Arc::clone(&registry));

        for _ in 0..2 {
            let context = graph.create_context().unwrap();
            let node = graph.inner().create_node(context, NodeKind::Processing);
            let output = graph.destination(context).unwrap();
            graph.connect(node, output).unwrap();
        }

        assert_eq!(registry.contexts().len(), 2);
        assert_eq!(registry.tap_streams().len(), 2);
    }
}
