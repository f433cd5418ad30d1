use std::sync::Arc;

use crate::models::error::RecorderError;
use crate::models::media::MediaStream;
use crate::models::settings::RecorderSettings;
use crate::models::state::RecordingState;
use crate::monitor::TapRegistry;
use crate::traits::file_sink::UserNotifier;
use crate::traits::recording_delegate::RecordingDelegate;
use crate::traits::visual_surface::VisualSurface;

use super::host::RecorderHost;
use super::recording::{RecordingSession, ShareOutcome};

/// Result of a record-button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Started,
    /// Recording stopped and saved under the given name.
    Saved(String),
    /// Recording stopped; the file is saved once the encoder finishes.
    Stopping,
}

/// Owns the active recording session and drives it from a single record toggle.
///
/// A session is built on the first press, and rebuilt whenever the previous
/// one has stopped and its recording has been saved. A stopped recording
/// whose encoder is still finalizing is saved by [`RecordController::process_events`]
/// or the next press. Fatal failures raise one alert and leave the
/// controller ready for another attempt.
pub struct RecordController {
    host: RecorderHost,
    surface: Arc<dyn VisualSurface>,
    taps: Arc<TapRegistry>,
    microphone: Option<MediaStream>,
    settings: RecorderSettings,
    notifier: Arc<dyn UserNotifier>,
    delegate: Option<Arc<dyn RecordingDelegate>>,
    session: Option<RecordingSession>,
    pending_save: bool,
}

impl RecordController {
    pub fn new(
        host: RecorderHost,
        surface: Arc<dyn VisualSurface>,
        taps: Arc<TapRegistry>,
        settings: RecorderSettings,
        notifier: Arc<dyn UserNotifier>,
    ) -> Self {
        Self {
            host,
            surface,
            taps,
            microphone: None,
            settings,
            notifier,
            delegate: None,
            session: None,
            pending_save: false,
        }
    }

    /// Camera + microphone stream acquired at startup.
    pub fn set_microphone(&mut self, stream: MediaStream) {
        self.microphone = Some(stream);
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn RecordingDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> RecordingState {
        self.session
            .as_ref()
            .map(RecordingSession::state)
            .unwrap_or(RecordingState::Uninitialized)
    }

    pub fn session(&self) -> Option<&RecordingSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut RecordingSession> {
        self.session.as_mut()
    }

    /// Whether a stopped recording is still waiting to be saved.
    pub fn has_pending_save(&self) -> bool {
        self.pending_save
    }

    /// Start recording if idle, otherwise stop and save.
    ///
    /// While a stopped recording is unsaved, a press only retries the save.
    pub fn toggle(&mut self) -> Result<ToggleOutcome, RecorderError> {
        if self.state().is_recording() {
            return self.stop_and_save();
        }
        if self.pending_save {
            return Ok(match self.process_events()? {
                Some(name) => ToggleOutcome::Saved(name),
                None => ToggleOutcome::Stopping,
            });
        }

        let needs_setup = self
            .session
            .as_ref()
            .map_or(true, |session| session.state().is_stopped());
        if needs_setup {
            self.session = None;
            let session = self.setup_recorder().map_err(|e| self.report(e))?;
            self.session = Some(session);
        }

        let Some(session) = self.session.as_mut() else {
            return Err(RecorderError::InvalidState("no recording session".into()));
        };
        match session.start() {
            Ok(()) => Ok(ToggleOutcome::Started),
            Err(e) => Err(self.report(e)),
        }
    }

    /// Apply pending encoder events to the current session.
    ///
    /// Saves a stopped recording as soon as its artifact is ready and
    /// returns the saved name.
    pub fn process_events(&mut self) -> Result<Option<String>, RecorderError> {
        let file_name = self.settings.output_file_name.clone();
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        session.process_events();
        if !self.pending_save || session.artifact().is_none() {
            return Ok(None);
        }

        match session.save(Some(&file_name)) {
            Ok(name) => {
                self.pending_save = false;
                Ok(Some(name))
            }
            Err(e) => Err(self.report(e)),
        }
    }

    /// Share the last finished recording, saving it if sharing is unavailable.
    pub fn share_last(&mut self, file_name: Option<&str>) -> Result<ShareOutcome, RecorderError> {
        let Some(session) = self.session.as_mut() else {
            return Err(RecorderError::InvalidState("nothing has been recorded".into()));
        };
        session.share(file_name).map_err(|e| self.report(e))
    }

    /// Audio streams to mix, per the lens and microphone toggles.
    pub fn audio_sources(&self) -> Vec<MediaStream> {
        let mut sources = Vec::new();
        if self.settings.record_lens_audio {
            sources.extend(self.taps.tap_streams());
        }
        if self.settings.record_microphone_audio {
            if let Some(ref microphone) = self.microphone {
                sources.push(microphone.clone());
            }
        }
        sources
    }

    fn setup_recorder(&self) -> Result<RecordingSession, RecorderError> {
        let sources = self.audio_sources();
        log::info!("Setting up recorder with {} audio sources", sources.len());

        let mut session = RecordingSession::new(
            self.host.clone(),
            self.surface.as_ref(),
            &sources,
            self.settings.effective_bits_per_second(),
            &self.settings,
        )?;
        if let Some(ref delegate) = self.delegate {
            session.set_delegate(Arc::clone(delegate));
        }
        Ok(session)
    }

    fn stop_and_save(&mut self) -> Result<ToggleOutcome, RecorderError> {
        let Some(session) = self.session.as_mut() else {
            return Err(RecorderError::InvalidState("no recording session".into()));
        };
        if let Err(e) = session.stop() {
            return Err(self.report(e));
        }

        self.pending_save = true;
        match self.process_events()? {
            Some(name) => Ok(ToggleOutcome::Saved(name)),
            None => {
                log::info!("Waiting for the encoder to finish before saving");
                Ok(ToggleOutcome::Stopping)
            }
        }
    }

    fn report(&self, error: RecorderError) -> RecorderError {
        log::error!("Recording failed: {}", error);
        if error.is_fatal() {
            self.notifier.alert(error.user_message());
        }
        error
    }
}
