mod conversation;

pub use conversation::{
    request_completion, split_offered_choices, ConversationManager, PendingTurn,
    SessionSnapshot, EMPTY_REPLY_FALLBACK, SAFETY_FALLBACK,
};
