use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use crate::models::artifact::{OutputArtifact, ShareData};
use crate::models::error::RecorderError;
use crate::models::media::{MediaStream, StreamDestination};
use crate::models::settings::{RecorderSettings, FALLBACK_BITS_PER_SECOND};
use crate::models::state::RecordingState;
use crate::traits::audio_graph::AudioGraph;
use crate::traits::media_encoder::{EncoderEvent, EncoderOptions, MediaEncoder};
use crate::traits::recording_delegate::RecordingDelegate;
use crate::traits::visual_surface::VisualSurface;

use super::format::select_mime_type;
use super::host::RecorderHost;

/// How a share request was fulfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    /// The share sheet was unavailable or failed; the file was saved instead.
    Saved,
}

struct AssembledStreams {
    capture: MediaStream,
    mix: StreamDestination,
    combined: MediaStream,
}

/// Records a visual surface plus mixed audio into a downloadable artifact.
///
/// Data flow:
/// ```text
/// [Surface] → capture stream ── video[0] ─┐
///                                          ├→ combined stream → [Encoder] → chunks → artifact
/// [Sources] → mix destination ── audio[0] ─┘
/// ```
///
/// Encoder events arrive on a channel and are applied by
/// [`RecordingSession::process_events`], which the host event loop calls.
/// Chunks are only kept while recording; anything the encoder delivers
/// after `stop()` has returned is dropped.
pub struct RecordingSession {
    host: RecorderHost,
    settings: RecorderSettings,
    video_bits_per_second: u32,
    capture_stream: MediaStream,
    mix_destination: StreamDestination,
    combined_stream: MediaStream,
    state: RecordingState,
    mime_type: Option<String>,
    chunks: Vec<Vec<u8>>,
    encoder: Option<Box<dyn MediaEncoder>>,
    events: Option<Receiver<EncoderEvent>>,
    encoder_finished: bool,
    artifact: Option<OutputArtifact>,
    delegate: Option<Arc<dyn RecordingDelegate>>,
}

impl RecordingSession {
    /// Capture `surface`, mix `audio_sources` into one track, and return a READY session.
    ///
    /// Nothing is retained if any step fails.
    pub fn new(
        host: RecorderHost,
        surface: &dyn VisualSurface,
        audio_sources: &[MediaStream],
        video_bits_per_second: u32,
        settings: &RecorderSettings,
    ) -> Result<Self, RecorderError> {
        settings
            .validate()
            .map_err(|e| RecorderError::StreamInitFailure(format!("invalid settings: {}", e)))?;

        if !surface.supports_capture() {
            return Err(RecorderError::UnsupportedEnvironment(
                "surface stream capture is unavailable".into(),
            ));
        }
        if !host.encoders.is_supported() {
            return Err(RecorderError::UnsupportedEnvironment(
                "media recording is unavailable".into(),
            ));
        }

        let streams = Self::assemble_streams(
            host.audio.as_ref(),
            surface,
            audio_sources,
            settings.frame_rate,
        )
        .map_err(|e| {
            log::error!("Stream creation failed: {}", e);
            match e {
                RecorderError::StreamInitFailure(_) => e,
                other => RecorderError::StreamInitFailure(other.to_string()),
            }
        })?;

        let video_bits_per_second = if video_bits_per_second == 0 {
            FALLBACK_BITS_PER_SECOND
        } else {
            video_bits_per_second
        };

        Ok(Self {
            host,
            settings: settings.clone(),
            video_bits_per_second,
            capture_stream: streams.capture,
            mix_destination: streams.mix,
            combined_stream: streams.combined,
            state: RecordingState::Ready,
            mime_type: None,
            chunks: Vec::new(),
            encoder: None,
            events: None,
            encoder_finished: false,
            artifact: None,
            delegate: None,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn RecordingDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// MIME type negotiated by `start()`.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Exactly one video track followed by exactly one mixed audio track.
    pub fn combined_stream(&self) -> &MediaStream {
        &self.combined_stream
    }

    pub fn capture_stream(&self) -> &MediaStream {
        &self.capture_stream
    }

    pub fn mix_destination(&self) -> &StreamDestination {
        &self.mix_destination
    }

    pub fn video_bits_per_second(&self) -> u32 {
        self.video_bits_per_second
    }

    pub fn chunk_count(&self) -> usize {
        match &self.artifact {
            Some(artifact) => artifact.chunks().len(),
            None => self.chunks.len(),
        }
    }

    /// The finalized recording, once the encoder has finished after `stop()`.
    pub fn artifact(&self) -> Option<&OutputArtifact> {
        self.artifact.as_ref()
    }

    /// Negotiate a format and begin encoding. Transitions: ready → recording.
    ///
    /// On failure the session stays READY.
    pub fn start(&mut self) -> Result<(), RecorderError> {
        if !self.state.is_ready() {
            return Err(RecorderError::InvalidState(format!(
                "can only start from ready state, session is {}",
                self.state
            )));
        }

        let mime_type =
            select_mime_type(self.host.encoders.as_ref(), &self.settings.codec_preferences)
                .ok_or(RecorderError::NoSupportedFormat)?;
        log::info!("Using MIME type: {}", mime_type);

        let options = EncoderOptions {
            mime_type: mime_type.clone(),
            video_bits_per_second: self.video_bits_per_second,
        };
        let mut encoder = self
            .host
            .encoders
            .create(&self.combined_stream, options)
            .map_err(|e| {
                log::error!("Encoder creation failed: {}", e);
                match e {
                    RecorderError::RecorderInitFailure(_) => e,
                    other => RecorderError::RecorderInitFailure(other.to_string()),
                }
            })?;

        let (sender, receiver) = mpsc::channel();
        let timeslice = Duration::from_millis(self.settings.chunk_interval_ms);
        encoder.start(timeslice, sender).map_err(|e| {
            log::error!("Encoder start failed: {}", e);
            match e {
                RecorderError::RecorderStartFailure(_) => e,
                other => RecorderError::RecorderStartFailure(other.to_string()),
            }
        })?;

        self.chunks.clear();
        self.mime_type = Some(mime_type);
        self.encoder = Some(encoder);
        self.events = Some(receiver);
        self.encoder_finished = false;
        self.set_state(RecordingState::Recording);
        Ok(())
    }

    /// Apply every encoder event delivered so far. Returns the number handled.
    pub fn process_events(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let next = match self.events.as_ref() {
                Some(receiver) => receiver.try_recv(),
                None => break,
            };
            match next {
                Ok(event) => {
                    self.handle_event(event);
                    handled += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.events = None;
                    self.encoder_finished = true;
                    break;
                }
            }
        }

        if self.state.is_stopped() && self.encoder_finished {
            self.finalize();
        }
        handled
    }

    /// Ask the encoder to finalize. Transitions: recording → stopped.
    ///
    /// Chunks the encoder flushes while stopping are kept. The artifact is
    /// available as soon as the encoder reports it has finished.
    pub fn stop(&mut self) -> Result<(), RecorderError> {
        if !self.state.is_recording() {
            return Err(RecorderError::InvalidState(format!(
                "can only stop from recording state, session is {}",
                self.state
            )));
        }

        if let Some(encoder) = self.encoder.as_mut() {
            if let Err(e) = encoder.stop() {
                log::error!("Encoder stop failed: {}", e);
                self.encoder_finished = true;
            }
        }

        self.process_events();
        log::info!("Recorded {} chunks", self.chunks.len());
        self.set_state(RecordingState::Stopped);
        self.process_events();
        Ok(())
    }

    /// Download the artifact as `file_name` (default `recording.webm`).
    ///
    /// Returns the name the file was saved under.
    pub fn save(&mut self, file_name: Option<&str>) -> Result<String, RecorderError> {
        self.process_events();
        let artifact = self.require_artifact()?;
        let file = artifact.to_file(file_name);

        self.host.sink.download(&file)?;
        log::info!("Saved recording as {} ({} bytes)", file.name, file.bytes.len());
        Ok(file.name)
    }

    /// Offer the artifact to the OS share sheet, saving it instead if sharing
    /// is unavailable or fails. Share failures are never returned.
    pub fn share(&mut self, file_name: Option<&str>) -> Result<ShareOutcome, RecorderError> {
        self.process_events();
        let artifact = self.require_artifact()?;
        let data = ShareData::for_file(artifact.to_file(file_name));

        match self.host.share.as_ref() {
            Some(target) if target.can_share(&data) => match target.share(&data) {
                Ok(()) => return Ok(ShareOutcome::Shared),
                Err(e) => log::error!("Sharing failed: {}", e),
            },
            _ => log::info!("Sharing unavailable, saving instead"),
        }

        self.save(file_name)?;
        Ok(ShareOutcome::Saved)
    }

    // --- Internal helpers ---

    fn assemble_streams(
        audio: &dyn AudioGraph,
        surface: &dyn VisualSurface,
        audio_sources: &[MediaStream],
        frame_rate: u32,
    ) -> Result<AssembledStreams, RecorderError> {
        let capture = surface.capture_stream(frame_rate)?;

        let context = audio.create_context()?;
        let mix = audio.create_stream_destination(context)?;
        for source in audio_sources {
            let node = audio.create_stream_source(context, source)?;
            audio.connect(node, mix.node)?;
        }

        let labels: Vec<&str> = audio_sources
            .iter()
            .flat_map(|s| s.audio_tracks())
            .map(|t| t.label.as_str())
            .collect();
        log::info!("Recording audio tracks: {:?}", labels);

        let video = capture.first_video_track().cloned().ok_or_else(|| {
            RecorderError::StreamInitFailure("surface stream has no video track".into())
        })?;
        let mixed = mix.stream.first_audio_track().cloned().ok_or_else(|| {
            RecorderError::StreamInitFailure("mix destination has no audio track".into())
        })?;

        Ok(AssembledStreams {
            capture,
            combined: MediaStream::with_tracks(vec![video, mixed]),
            mix,
        })
    }

    fn handle_event(&mut self, event: EncoderEvent) {
        match event {
            EncoderEvent::DataAvailable(chunk) => {
                if chunk.is_empty() {
                    return;
                }
                if self.state.is_recording() {
                    self.chunks.push(chunk);
                } else {
                    log::debug!("Dropping late chunk of {} bytes", chunk.len());
                }
            }
            EncoderEvent::Error(message) => {
                log::error!("Encoder error: {}", message);
                if let Some(ref delegate) = self.delegate {
                    delegate.on_error(&RecorderError::Encoder(message));
                }
            }
            EncoderEvent::Stopped => self.encoder_finished = true,
        }
    }

    fn finalize(&mut self) {
        if self.artifact.is_some() {
            return;
        }
        self.encoder = None;
        self.events = None;

        let artifact = OutputArtifact::new(std::mem::take(&mut self.chunks), self.mime_type.as_deref());
        log::info!(
            "Recorder stopped: {} bytes in {} chunks ({})",
            artifact.size_bytes(),
            artifact.chunks().len(),
            artifact.mime_type()
        );

        if let Some(ref delegate) = self.delegate {
            delegate.on_artifact_ready(&artifact);
        }
        self.artifact = Some(artifact);
    }

    fn require_artifact(&self) -> Result<&OutputArtifact, RecorderError> {
        if !self.state.is_stopped() {
            return Err(RecorderError::InvalidState(format!(
                "no recording to save, session is {}",
                self.state
            )));
        }
        self.artifact.as_ref().ok_or_else(|| {
            RecorderError::InvalidState("recording has not finished finalizing".into())
        })
    }

    fn set_state(&mut self, new_state: RecordingState) {
        debug_assert!(
            self.state.can_transition_to(new_state),
            "illegal transition {} -> {}",
            self.state,
            new_state
        );
        self.state = new_state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(new_state);
        }
    }
}
