use crate::api::CompletionBackend;
use crate::config::Persona;
use crate::types::Turn;
use std::sync::Arc;

/// A submission that has been accepted and is waiting for its reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    pub epoch: u64,
    pub transcript: Vec<Turn>,
}

/// Observable copy of the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub transcript: Vec<Turn>,
    pub awaiting_reply: bool,
    pub choices: Vec<String>,
}

/// Owns the transcript, the interaction lock and the suggested choices.
///
/// `awaiting_reply` is true exactly while one request is in flight; every
/// input-producing operation is a no-op while it is set. `epoch` advances on
/// each reset so replies to a cleared conversation can be recognised.
pub struct ConversationManager {
    pub(super) client: Arc<dyn CompletionBackend>,
    pub(super) greeting: Option<String>,
    pub(super) initial_choices: Vec<String>,
    pub(super) transcript: Vec<Turn>,
    pub(super) choices: Vec<String>,
    pub(super) awaiting_reply: bool,
    pub(super) epoch: u64,
}

impl ConversationManager {
    pub fn new<B>(client: B, persona: &Persona) -> Self
    where
        B: CompletionBackend + 'static,
    {
        Self::with_seed(
            Arc::new(client),
            persona.greeting.clone(),
            persona.initial_choices.clone(),
        )
    }

    /// Creates a session seeded with an optional greeting turn and choices.
    pub fn with_seed(
        client: Arc<dyn CompletionBackend>,
        greeting: Option<String>,
        initial_choices: Vec<String>,
    ) -> Self {
        let mut manager = Self {
            client,
            greeting,
            initial_choices,
            transcript: Vec::new(),
            choices: Vec::new(),
            awaiting_reply: false,
            epoch: 0,
        };
        manager.seed();
        manager
    }

    pub(super) fn seed(&mut self) {
        self.transcript.clear();
        if let Some(greeting) = &self.greeting {
            self.transcript.push(Turn::assistant(greeting.clone()));
        }
        self.choices = self.initial_choices.clone();
        self.awaiting_reply = false;
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn client(&self) -> Arc<dyn CompletionBackend> {
        Arc::clone(&self.client)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            transcript: self.transcript.clone(),
            awaiting_reply: self.awaiting_reply,
            choices: self.choices.clone(),
        }
    }
}
