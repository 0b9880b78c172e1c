use crate::runtime::UiUpdate;
use crate::state::{request_completion, ConversationManager, PendingTurn};
use tokio::sync::mpsc;

/// Owned per-session context passed into every `RuntimeMode` callback.
pub struct RuntimeContext {
    pub conversation: ConversationManager,
    update_tx: mpsc::UnboundedSender<UiUpdate>,
}

impl RuntimeContext {
    pub fn new(conversation: ConversationManager, update_tx: mpsc::UnboundedSender<UiUpdate>) -> Self {
        Self {
            conversation,
            update_tx,
        }
    }

    /// Accepts free text and dispatches it. Returns false when the
    /// conversation rejected the submission (blank, or a reply is pending).
    pub fn submit_text(&mut self, text: &str) -> bool {
        match self.conversation.begin_user_text(text) {
            Some(pending) => {
                self.start_turn(pending);
                true
            }
            None => false,
        }
    }

    pub fn submit_choice(&mut self, choice: &str) -> bool {
        match self.conversation.begin_choice(choice) {
            Some(pending) => {
                self.start_turn(pending);
                true
            }
            None => false,
        }
    }

    /// Runs the round-trip for `pending` on its own task. The reply comes
    /// back as `UiUpdate::TurnSettled`.
    pub fn start_turn(&self, pending: PendingTurn) {
        let client = self.conversation.client();
        let update_tx = self.update_tx.clone();
        tokio::spawn(async move {
            let turn = request_completion(client.as_ref(), &pending.transcript).await;
            let settled = UiUpdate::TurnSettled {
                epoch: pending.epoch,
                turn,
            };
            if update_tx.send(settled).is_err() {
                tracing::debug!("event loop closed before reply settled");
            }
        });
    }
}
