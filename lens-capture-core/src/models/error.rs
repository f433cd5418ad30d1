use thiserror::Error;

/// Errors that can occur while wiring, recording, or persisting a lens capture.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecorderError {
    /// Capture or record capability missing from the host.
    #[error("unsupported environment: {0}")]
    UnsupportedEnvironment(String),

    #[error("stream initialization failed: {0}")]
    StreamInitFailure(String),

    #[error("no supported video format found")]
    NoSupportedFormat,

    #[error("recorder initialization failed: {0}")]
    RecorderInitFailure(String),

    #[error("recorder start failed: {0}")]
    RecorderStartFailure(String),

    #[error("share failed: {0}")]
    ShareFailure(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("audio graph error: {0}")]
    AudioGraph(String),

    /// Runtime error reported by a running encoder.
    #[error("encoder error: {0}")]
    Encoder(String),
}

impl RecorderError {
    /// Fatal errors abort the current setup or attempt and are shown to the user.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::ShareFailure(_) | Self::AudioGraph(_) | Self::Encoder(_))
    }

    /// Text for the blocking alert raised on a fatal error.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UnsupportedEnvironment(_) | Self::StreamInitFailure(_) => {
                "Sorry, recording is not supported on your device"
            }
            Self::NoSupportedFormat => "Sorry, no supported video format was found on your device",
            Self::RecorderInitFailure(_) | Self::RecorderStartFailure(_) => {
                "Failed to start recording. Please try again."
            }
            Self::StorageError(_) | Self::InvalidState(_) => {
                "Failed to save recording. Please try again."
            }
            Self::ShareFailure(_) | Self::AudioGraph(_) | Self::Encoder(_) => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_failure_is_not_fatal() {
        assert!(!RecorderError::ShareFailure("denied".into()).is_fatal());
        assert!(RecorderError::NoSupportedFormat.is_fatal());
        assert!(RecorderError::StreamInitFailure("x".into()).is_fatal());
    }

    #[test]
    fn fatal_errors_have_alert_text() {
        let errors = [
            RecorderError::UnsupportedEnvironment("no recorder".into()),
            RecorderError::StreamInitFailure("no track".into()),
            RecorderError::NoSupportedFormat,
            RecorderError::RecorderInitFailure("rejected".into()),
            RecorderError::RecorderStartFailure("busy".into()),
        ];
        for error in errors {
            assert!(error.is_fatal());
            assert!(!error.user_message().is_empty());
        }
    }
}
