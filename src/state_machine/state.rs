//! Thinking process state types

use crate::catalog::{script, PromptCategory, StepTemplate};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Run identity
// ============================================================================

/// Identifies one thinking run. Timer events carry it so that a timer from a
/// superseded run can never touch the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Steps and runs
// ============================================================================

/// One unit of simulated reasoning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThinkingStep {
    pub id: String,
    pub content: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl ThinkingStep {
    /// The preliminary finding, only once the step has completed
    pub fn revealed_response(&self) -> Option<&str> {
        if self.completed {
            self.response.as_deref()
        } else {
            None
        }
    }

    /// Copy of this step as a renderer may see it
    pub fn revealed(&self) -> Self {
        Self {
            response: self.revealed_response().map(str::to_string),
            ..self.clone()
        }
    }
}

impl From<&StepTemplate> for ThinkingStep {
    fn from(template: &StepTemplate) -> Self {
        Self {
            id: template.id.to_string(),
            content: template.content.to_string(),
            completed: false,
            response: Some(template.response.to_string()),
        }
    }
}

/// Transient state of one thinking run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThinkingRun {
    pub run_id: RunId,
    pub category: PromptCategory,
    pub steps: Vec<ThinkingStep>,
    /// Number of completed steps
    pub current_step: usize,
    pub final_response: Option<String>,
}

impl ThinkingRun {
    /// Fresh run from the category's script, every step incomplete
    pub fn new(run_id: RunId, category: PromptCategory) -> Self {
        Self {
            run_id,
            category,
            steps: script(category).steps.iter().map(ThinkingStep::from).collect(),
            current_step: 0,
            final_response: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_step >= self.steps.len()
    }

    /// Mark the next step complete. Returns its index, or `None` if every
    /// step was already complete.
    pub fn complete_next(&mut self) -> Option<usize> {
        let index = self.current_step;
        let step = self.steps.get_mut(index)?;
        step.completed = true;
        self.current_step += 1;
        Some(index)
    }
}

// ============================================================================
// Engine State
// ============================================================================

/// Thinking engine state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ThinkingState {
    /// No run in progress. Holds the last finished run so its steps and
    /// final answer stay visible until the next start or reset.
    Idle { last: Option<ThinkingRun> },

    /// Steps advancing on the tick timer
    Running { run: ThinkingRun },

    /// Every step complete and the answer set, waiting out the settling delay
    Settling { run: ThinkingRun },
}

impl Default for ThinkingState {
    fn default() -> Self {
        ThinkingState::Idle { last: None }
    }
}

impl ThinkingState {
    /// Whether a run is in progress (running or settling)
    pub fn is_thinking(&self) -> bool {
        matches!(
            self,
            ThinkingState::Running { .. } | ThinkingState::Settling { .. }
        )
    }

    /// The run currently shown, live or finished
    pub fn run(&self) -> Option<&ThinkingRun> {
        match self {
            ThinkingState::Idle { last } => last.as_ref(),
            ThinkingState::Running { run } | ThinkingState::Settling { run } => Some(run),
        }
    }

    /// Run id that timer events must match, if any timer is expected
    pub fn live_run_id(&self) -> Option<RunId> {
        match self {
            ThinkingState::Idle { .. } => None,
            ThinkingState::Running { run } | ThinkingState::Settling { run } => Some(run.run_id),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThinkingState::Idle { .. } => "idle",
            ThinkingState::Running { .. } => "running",
            ThinkingState::Settling { .. } => "settling",
        }
    }

    /// Read-only copy of the observable fields. Pending steps carry no
    /// response.
    pub fn snapshot(&self) -> ThinkingSnapshot {
        let is_thinking = self.is_thinking();
        match self.run() {
            Some(run) => ThinkingSnapshot {
                run_id: Some(run.run_id),
                category: Some(run.category),
                is_thinking,
                steps: run.steps.iter().map(ThinkingStep::revealed).collect(),
                current_step: run.current_step,
                final_response: run.final_response.clone(),
            },
            None => ThinkingSnapshot::default(),
        }
    }
}

/// What a renderer sees
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThinkingSnapshot {
    pub run_id: Option<RunId>,
    pub category: Option<PromptCategory>,
    pub is_thinking: bool,
    pub steps: Vec<ThinkingStep>,
    pub current_step: usize,
    pub final_response: Option<String>,
}

impl ThinkingSnapshot {
    /// Empty, not thinking, no answer
    pub fn is_cleared(&self) -> bool {
        !self.is_thinking
            && self.steps.is_empty()
            && self.current_step == 0
            && self.final_response.is_none()
    }
}
