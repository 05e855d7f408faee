use thiserror::Error;

/// The only text the dashboard ever shows for a failed fetch.
pub const FETCH_FAILURE_MESSAGE: &str = "Failed to fetch trends. Please try again later.";

/// Why a fetch against the trends service failed.
///
/// The variants exist for diagnostics only. The UI collapses every one of
/// them into [`FETCH_FAILURE_MESSAGE`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("trends service at {url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("trends service at {url} sent an unexpected body: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Error code for structured logs.
    pub fn error_code(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "FETCH_TRANSPORT",
            FetchError::Status { .. } => "FETCH_STATUS",
            FetchError::Decode { .. } => "FETCH_DECODE",
        }
    }

    pub fn user_message(&self) -> &'static str {
        FETCH_FAILURE_MESSAGE
    }
}
