use thiserror::Error;

/// A failed round-trip. `detail` is for the log; only the kind's summary is
/// shown to the user.
#[derive(Debug, Clone, Error)]
#[error("{kind:?}: {detail}")]
pub struct CompletionError {
    pub kind: CompletionErrorKind,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionErrorKind {
    /// Connection could not be established.
    Unreachable,
    Timeout,
    /// Credentials missing, invalid, or lacking permission.
    Auth,
    RateLimited,
    /// Any other non-success 4xx.
    Rejected { status: u16 },
    Server { status: u16 },
    /// The body could not be read or decoded.
    Malformed,
}

impl CompletionErrorKind {
    pub fn summary(self) -> String {
        match self {
            CompletionErrorKind::Unreachable => {
                "The gift wrapping service is unreachable right now. Please check your connection and try again.".to_string()
            }
            CompletionErrorKind::Timeout => {
                "The service took too long to answer. Please try again in a moment.".to_string()
            }
            CompletionErrorKind::Auth => {
                "The service rejected the request. Please check that the API key is valid and allowed to use the Generative Language API.".to_string()
            }
            CompletionErrorKind::RateLimited => {
                "The service is busy right now (too many requests). Please wait a moment and try again.".to_string()
            }
            CompletionErrorKind::Rejected { status } => {
                format!("The service rejected the request (HTTP {status}).")
            }
            CompletionErrorKind::Server { status } => {
                format!("The service had an internal problem (HTTP {status}). Please try again shortly.")
            }
            CompletionErrorKind::Malformed => {
                "The service sent a reply I couldn't understand. Please try again.".to_string()
            }
        }
    }
}

impl CompletionError {
    pub fn new(kind: CompletionErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn unreachable(detail: impl Into<String>) -> Self {
        Self::new(CompletionErrorKind::Unreachable, detail)
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(CompletionErrorKind::Timeout, detail)
    }

    pub fn auth(detail: impl Into<String>) -> Self {
        Self::new(CompletionErrorKind::Auth, detail)
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::new(CompletionErrorKind::Malformed, detail)
    }

    /// Classifies a non-success HTTP status and its error message.
    pub fn from_status(status: u16, message: &str) -> Self {
        let kind = match status {
            400 if message.to_ascii_lowercase().contains("api key not valid") => {
                CompletionErrorKind::Auth
            }
            401 | 403 => CompletionErrorKind::Auth,
            429 => CompletionErrorKind::RateLimited,
            500..=599 => CompletionErrorKind::Server { status },
            _ => CompletionErrorKind::Rejected { status },
        };
        Self::new(kind, format!("HTTP {status}: {message}"))
    }

    pub fn user_message(&self) -> String {
        format!("⚠️ Oops! Something went wrong: {}", self.kind.summary())
    }
}
