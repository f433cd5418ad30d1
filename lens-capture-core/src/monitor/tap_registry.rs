use std::collections::HashMap;

use parking_lot::Mutex;

use crate::models::media::{AudioNodeRef, ContextId, MediaStream, StreamDestination};

/// A side connection from a node that feeds a context's final output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioTap {
    pub context: ContextId,
    /// Node whose signal is being tapped.
    pub source: AudioNodeRef,
    /// Stream destination carrying the tapped signal.
    pub destination: StreamDestination,
}

impl AudioTap {
    pub fn stream(&self) -> &MediaStream {
        &self.destination.stream
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    /// Contexts in creation order.
    contexts: Vec<ContextId>,
    taps: HashMap<ContextId, Vec<AudioTap>>,
}

impl RegistryInner {
    fn register(&mut self, context: ContextId) -> usize {
        match self.contexts.iter().position(|c| *c == context) {
            Some(index) => index,
            None => {
                self.contexts.push(context);
                self.contexts.len() - 1
            }
        }
    }
}

/// Audio contexts and the tappable streams discovered in them.
///
/// Written by [`super::MonitoredAudioGraph`], read when a recording session
/// is set up. Share it with `Arc<TapRegistry>`.
#[derive(Debug, Default)]
pub struct TapRegistry {
    inner: Mutex<RegistryInner>,
}

impl TapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a context, returning its creation index. Idempotent.
    pub fn register_context(&self, context: ContextId) -> usize {
        self.inner.lock().register(context)
    }

    pub fn context_index(&self, context: ContextId) -> Option<usize> {
        self.inner.lock().contexts.iter().position(|c| *c == context)
    }

    pub fn contexts(&self) -> Vec<ContextId> {
        self.inner.lock().contexts.clone()
    }

    /// Record a tap against its context, registering the context if unseen.
    pub fn record_tap(&self, tap: AudioTap) {
        let mut inner = self.inner.lock();
        inner.register(tap.context);
        inner.taps.entry(tap.context).or_default().push(tap);
    }

    pub fn taps_for(&self, context: ContextId) -> Vec<AudioTap> {
        self.inner
            .lock()
            .taps
            .get(&context)
            .cloned()
            .unwrap_or_default()
    }

    /// Every tap, ordered by context creation and then by discovery.
    pub fn taps(&self) -> Vec<AudioTap> {
        let inner = self.inner.lock();
        inner
            .contexts
            .iter()
            .filter_map(|context| inner.taps.get(context))
            .flatten()
            .cloned()
            .collect()
    }

    pub fn tap_streams(&self) -> Vec<MediaStream> {
        self.taps().into_iter().map(|tap| tap.destination.stream).collect()
    }

    pub fn tap_count(&self) -> usize {
        self.inner.lock().taps.values().map(Vec::len).sum()
    }
}
