//! Events that drive the thinking engine

use super::state::RunId;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // Caller events
    Start { run_id: RunId, prompt: String },
    Reset,

    // Timer events
    Tick { run_id: RunId },
    SettleElapsed { run_id: RunId },
}

impl Event {
    /// Whether this event came from a scheduled timer
    pub fn is_timer(&self) -> bool {
        matches!(self, Event::Tick { .. } | Event::SettleElapsed { .. })
    }
}
