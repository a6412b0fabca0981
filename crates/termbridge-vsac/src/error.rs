use termbridge_core::CoreError;

/// Errors returned by the VSAC client.
#[derive(Debug, thiserror::Error)]
pub enum VsacError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// VSAC answered with a non-success status.
    #[error("VSAC request failed with status {status}")]
    HttpStatus { status: u16, body: String },

    #[error("Failed to parse VSAC response: {0}")]
    Parse(String),

    /// A search bundle carried no `entry` array.
    #[error("No entries found in the response")]
    NoEntries,

    #[error(transparent)]
    InvalidId(#[from] CoreError),

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),
}

impl VsacError {
    /// Upstream status, if VSAC answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidId(_))
    }

    #[must_use]
    pub fn is_upstream_error(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::HttpStatus { .. } | Self::Parse(_)
        )
    }
}
