use crate::models::artifact::OutputArtifact;
use crate::models::error::RecorderError;
use crate::models::state::RecordingState;

/// Event delegate for recording session notifications.
///
/// All methods are called from whichever thread drives the session
/// (normally the UI thread). Keep implementations cheap.
pub trait RecordingDelegate: Send + Sync {
    /// Called after every state transition.
    fn on_state_changed(&self, state: RecordingState);

    /// Called when the encoder reports an error during an active recording.
    fn on_error(&self, error: &RecorderError);

    /// Called once the artifact is finalized after a stop.
    fn on_artifact_ready(&self, artifact: &OutputArtifact);
}
