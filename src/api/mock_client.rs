use super::{Completion, CompletionBackend, CompletionError};
use crate::types::Turn;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// Scripted stand-in for the completion service.
///
/// Replies are handed out in order; every transcript it receives is recorded.
#[derive(Clone, Default)]
pub struct MockApiClient {
    responses: Arc<Mutex<VecDeque<Result<Completion, CompletionError>>>>,
    requests: Arc<Mutex<Vec<Vec<Turn>>>>,
}

impl MockApiClient {
    pub fn new(responses: Vec<Result<Completion, CompletionError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            requests: Arc::default(),
        }
    }

    pub fn replying(texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|text| Ok(Completion::Reply(text.to_string())))
                .collect(),
        )
    }

    pub fn push_response(&self, response: Result<Completion, CompletionError>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }

    pub fn requests(&self) -> Vec<Vec<Turn>> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl CompletionBackend for MockApiClient {
    async fn complete(&self, transcript: &[Turn]) -> Result<Completion, CompletionError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(transcript.to_vec());

        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                Err(CompletionError::unreachable(
                    "MockApiClient: No more responses configured",
                ))
            })
    }
}
