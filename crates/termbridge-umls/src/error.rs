use termbridge_core::CoreError;

/// Errors that can occur while talking to the UMLS Terminology Services.
#[derive(Debug, thiserror::Error)]
pub enum UmlsError {
    /// The CAS endpoint did not answer `201 Created` to the API key.
    #[error("Failed to obtain ticket-granting ticket: status {status}")]
    TgtRequestFailed {
        /// HTTP status returned by the CAS endpoint.
        status: u16,
    },

    /// The CAS endpoint answered `201` without a `Location` header.
    #[error("Ticket-granting ticket response is missing the Location header")]
    MissingTgtLocation,

    /// The TGT endpoint did not answer `200 OK` to a service ticket request.
    #[error("Failed to obtain service ticket: status {status}")]
    ServiceTicketFailed {
        /// HTTP status returned by the TGT endpoint.
        status: u16,
    },

    /// The TGT endpoint returned an empty service ticket.
    #[error("Service ticket response was empty")]
    EmptyServiceTicket,

    /// A UTS REST call returned a non-success status.
    #[error("UMLS {operation} request failed with status {status}")]
    HttpStatus {
        /// Which call failed, e.g. "search" or "atoms".
        operation: &'static str,
        /// HTTP status returned by UTS.
        status: u16,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A UTS response could not be decoded.
    #[error("Failed to parse UMLS response: {0}")]
    Parse(String),

    /// Caller-supplied data was rejected before any request was made.
    #[error(transparent)]
    InvalidInput(#[from] CoreError),

    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),
}

impl UmlsError {
    /// Returns `true` if the ticket lifecycle failed.
    #[must_use]
    pub fn is_authentication_error(&self) -> bool {
        matches!(
            self,
            Self::TgtRequestFailed { .. }
                | Self::MissingTgtLocation
                | Self::ServiceTicketFailed { .. }
                | Self::EmptyServiceTicket
        )
    }

    /// Returns `true` if the request was rejected before reaching UMLS.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Returns `true` if UMLS (or the network to it) failed.
    #[must_use]
    pub fn is_upstream_error(&self) -> bool {
        self.is_authentication_error()
            || matches!(
                self,
                Self::HttpStatus { .. } | Self::Network(_) | Self::Parse(_)
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UmlsError::TgtRequestFailed { status: 401 };
        assert_eq!(
            err.to_string(),
            "Failed to obtain ticket-granting ticket: status 401"
        );

        let err = UmlsError::HttpStatus {
            operation: "search",
            status: 500,
        };
        assert_eq!(err.to_string(), "UMLS search request failed with status 500");

        let err = UmlsError::from(CoreError::invalid_input("search term must not be empty"));
        assert_eq!(err.to_string(), "Invalid input: search term must not be empty");
    }

    #[test]
    fn test_error_predicates() {
        assert!(UmlsError::MissingTgtLocation.is_authentication_error());
        assert!(UmlsError::ServiceTicketFailed { status: 500 }.is_upstream_error());
        assert!(!UmlsError::ServiceTicketFailed { status: 500 }.is_client_error());

        let invalid = UmlsError::from(CoreError::invalid_identifier("CUI", "a/b"));
        assert!(invalid.is_client_error());
        assert!(!invalid.is_upstream_error());
    }
}
