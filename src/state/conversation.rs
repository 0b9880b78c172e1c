mod choices;
mod core;
mod state;


pub use self::core::{request_completion, EMPTY_REPLY_FALLBACK, SAFETY_FALLBACK};
pub use choices::split_offered_choices;
pub use state::{ConversationManager, PendingTurn, SessionSnapshot};
