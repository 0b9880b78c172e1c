pub mod client;
mod error;
pub mod mock_client;

pub use client::{interpret_response, ApiClient};
pub use error::{CompletionError, CompletionErrorKind};
pub use mock_client::MockApiClient;

use crate::types::Turn;
use async_trait::async_trait;

/// What the completion service made of a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Reply(String),
    /// The prompt or the reply was withheld by the service's safety filter.
    Blocked { reason: String },
    /// Generation ended without text for a reason other than a normal stop.
    Stopped { reason: String },
    Empty,
}

/// Seam to the external generative-language service.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, transcript: &[Turn]) -> Result<Completion, CompletionError>;
}
