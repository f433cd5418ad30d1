/// Recording session state machine.
///
/// State transitions:
/// ```text
/// uninitialized → ready → recording → stopped
/// ```
///
/// There is no way back from `Stopped`; recording again needs a new session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordingState {
    Uninitialized,
    Ready,
    Recording,
    Stopped,
}

impl RecordingState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Recording => "recording",
            Self::Stopped => "stopped",
        }
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(&self, next: RecordingState) -> bool {
        matches!(
            (self, next),
            (Self::Uninitialized, Self::Ready)
                | (Self::Ready, Self::Recording)
                | (Self::Recording, Self::Stopped)
        )
    }
}

impl std::fmt::Display for RecordingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
