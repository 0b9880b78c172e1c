pub mod context;
pub mod frontend;
pub mod r#loop;
pub mod mode;

use crate::types::Turn;

/// Messages from background tasks back to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    /// A round-trip finished; `epoch` is the session epoch it was issued in.
    TurnSettled { epoch: u64, turn: Turn },
}
