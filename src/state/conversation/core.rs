use super::choices::split_offered_choices;
use super::{ConversationManager, PendingTurn};
use crate::api::{Completion, CompletionBackend};
use crate::types::Turn;
use std::sync::Arc;

pub const SAFETY_FALLBACK: &str = "I'm sorry, I can't help with that topic. Let's stick to gift wrapping! What are you wrapping today? 🎁";
pub const EMPTY_REPLY_FALLBACK: &str =
    "Sorry, I had trouble thinking of an idea right now. Could you try rephrasing?";

impl ConversationManager {
    /// Accepts a free-text submission and locks the session.
    ///
    /// Returns `None` without touching state when the text is blank or a
    /// reply is already pending.
    pub fn begin_user_text(&mut self, text: &str) -> Option<PendingTurn> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if self.awaiting_reply {
            tracing::debug!("submission ignored while a reply is pending");
            return None;
        }

        self.transcript.push(Turn::user(text));
        self.choices.clear();
        self.awaiting_reply = true;
        tracing::debug!(
            epoch = self.epoch,
            turns = self.transcript.len(),
            "submission accepted"
        );

        Some(PendingTurn {
            epoch: self.epoch,
            transcript: self.transcript.clone(),
        })
    }

    /// Same as [`begin_user_text`](Self::begin_user_text) for a suggested choice.
    pub fn begin_choice(&mut self, choice: &str) -> Option<PendingTurn> {
        self.begin_user_text(choice)
    }

    /// Appends the reply for a pending submission and releases the lock.
    ///
    /// Replies carrying an epoch from before the last reset are dropped.
    pub fn complete_turn(&mut self, epoch: u64, reply: Turn) -> Option<&Turn> {
        if epoch != self.epoch || !self.awaiting_reply {
            tracing::debug!(
                reply_epoch = epoch,
                current_epoch = self.epoch,
                "discarding stale reply"
            );
            return None;
        }

        let (text, offered) = split_offered_choices(reply.text());
        self.transcript.push(Turn::assistant(text));
        self.choices = offered;
        self.awaiting_reply = false;
        self.transcript.last()
    }

    /// Clears the conversation back to its seeded state.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.seed();
        tracing::info!(epoch = self.epoch, "conversation reset");
    }

    /// Hides the suggested choices once the user starts typing.
    pub fn note_typing(&mut self) {
        if !self.awaiting_reply {
            self.choices.clear();
        }
    }

    pub async fn submit_user_text(&mut self, text: &str) -> Option<&Turn> {
        let pending = self.begin_user_text(text)?;
        self.finish(pending).await
    }

    pub async fn select_choice(&mut self, choice: &str) -> Option<&Turn> {
        let pending = self.begin_choice(choice)?;
        self.finish(pending).await
    }

    async fn finish(&mut self, pending: PendingTurn) -> Option<&Turn> {
        let client = Arc::clone(&self.client);
        let reply = request_completion(client.as_ref(), &pending.transcript).await;
        self.complete_turn(pending.epoch, reply)
    }
}

/// Runs one round-trip and folds every outcome into an assistant turn.
pub async fn request_completion(backend: &dyn CompletionBackend, transcript: &[Turn]) -> Turn {
    match backend.complete(transcript).await {
        Ok(Completion::Reply(text)) => Turn::assistant(text),
        Ok(Completion::Blocked { reason }) => {
            tracing::warn!(%reason, "reply blocked by safety filter");
            Turn::assistant(SAFETY_FALLBACK)
        }
        Ok(Completion::Stopped { reason }) => {
            tracing::warn!(%reason, "reply stopped early");
            Turn::assistant(format!(
                "Hmm, my response stopped unexpectedly (Reason: {reason}). Could you try asking differently?"
            ))
        }
        Ok(Completion::Empty) => {
            tracing::warn!("reply had no text");
            Turn::assistant(EMPTY_REPLY_FALLBACK)
        }
        Err(error) => {
            tracing::warn!(kind = ?error.kind, detail = %error.detail, "completion failed");
            Turn::assistant(error.user_message())
        }
    }
}
