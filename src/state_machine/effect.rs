//! Effects produced by state transitions

use super::state::RunId;
use crate::catalog::PromptCategory;
use std::time::Duration;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Abort the pending timer, if any
    CancelTimer,

    /// Schedule the next step tick
    ScheduleTick { run_id: RunId, delay: Duration },

    /// Schedule the end of the settling delay
    ScheduleSettle { run_id: RunId, delay: Duration },

    /// Publish the new snapshot to watchers
    PublishSnapshot,

    /// Notify subscribers that a run began
    NotifyStarted {
        run_id: RunId,
        category: PromptCategory,
        total_steps: usize,
    },

    /// Notify subscribers that a step completed
    NotifyStepCompleted { run_id: RunId, index: usize },

    /// Notify subscribers that the final answer is available
    NotifyAnswerReady {
        run_id: RunId,
        final_response: String,
    },

    /// Notify subscribers that thinking has ended
    NotifyFinished { run_id: RunId },

    /// Notify subscribers that the engine was cleared
    NotifyReset,
}

impl Effect {
    pub fn schedule_tick(run_id: RunId, delay: Duration) -> Self {
        Effect::ScheduleTick { run_id, delay }
    }

    pub fn schedule_settle(run_id: RunId, delay: Duration) -> Self {
        Effect::ScheduleSettle { run_id, delay }
    }

    pub fn is_schedule(&self) -> bool {
        matches!(
            self,
            Effect::ScheduleTick { .. } | Effect::ScheduleSettle { .. }
        )
    }
}
