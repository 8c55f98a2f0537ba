use thiserror::Error;

/// Failures surfaced by the content engine.
///
/// `Cancelled` is an intentional abort (level flush) and must not be shown to
/// the player; `MissingObjective` is a sequencing bug in the caller, not a
/// transient condition to retry.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {source}")]
    Network {
        #[source]
        source: reqwest::Error,
    },
    #[error("server error: HTTP {status}: {message}")]
    Server { status: u16, message: String },
    #[error("invalid response payload: {source}")]
    Decode {
        #[source]
        source: reqwest::Error,
    },
    #[error("request cancelled")]
    Cancelled,
    #[error("no objective recorded for level {level}; fetch the level story first")]
    MissingObjective { level: u32 },
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }

    /// Split reqwest failures into payload-decode errors vs transport errors.
    pub(crate) fn from_transport(source: reqwest::Error) -> Self {
        if source.is_decode() {
            FetchError::Decode { source }
        } else {
            FetchError::Network { source }
        }
    }
}
