//! Pure state transition function
//!
//! Given the same state, config and event this always yields the same new
//! state and effects. Timers, channels and logging live in the runtime.

use super::state::{RunId, ThinkingRun, ThinkingState};
use super::{Effect, Event};
use crate::catalog::script;
use crate::classify::classify;
use crate::config::EngineConfig;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ThinkingState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ThinkingState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Stale timer for run {run_id} while {state}")]
    StaleTimer { run_id: RunId, state: &'static str },
}

/// Pure transition function
pub fn transition(
    state: &ThinkingState,
    config: &EngineConfig,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Caller events - accepted from every state
        // ============================================================

        // Any + Start -> Running (fresh run, supersedes any live one)
        (_, Event::Start { run_id, prompt }) => {
            let category = classify(&prompt);
            let run = ThinkingRun::new(run_id, category);
            let total_steps = run.steps.len();

            Ok(TransitionResult::new(ThinkingState::Running { run })
                .with_effect(Effect::CancelTimer)
                .with_effect(Effect::PublishSnapshot)
                .with_effect(Effect::NotifyStarted {
                    run_id,
                    category,
                    total_steps,
                })
                .with_effect(Effect::schedule_tick(run_id, config.tick_interval)))
        }

        // Any + Reset -> Idle, cleared
        (_, Event::Reset) => Ok(TransitionResult::new(ThinkingState::Idle { last: None })
            .with_effect(Effect::CancelTimer)
            .with_effect(Effect::PublishSnapshot)
            .with_effect(Effect::NotifyReset)),

        // ============================================================
        // Step advancement
        // ============================================================

        // Running + Tick -> Running (more steps) or Settling (last step)
        (ThinkingState::Running { run }, Event::Tick { run_id }) if run.run_id == run_id => {
            let mut run = run.clone();
            let completed = run.complete_next();
            let step_effects = completed.map(|index| Effect::NotifyStepCompleted { run_id, index });

            if run.is_complete() {
                let final_response = script(run.category).final_response.to_string();
                run.final_response = Some(final_response.clone());

                Ok(TransitionResult::new(ThinkingState::Settling { run })
                    .with_effect(Effect::PublishSnapshot)
                    .with_effects(step_effects)
                    .with_effect(Effect::NotifyAnswerReady {
                        run_id,
                        final_response,
                    })
                    .with_effect(Effect::schedule_settle(run_id, config.settling_delay)))
            } else {
                Ok(TransitionResult::new(ThinkingState::Running { run })
                    .with_effect(Effect::PublishSnapshot)
                    .with_effects(step_effects)
                    .with_effect(Effect::schedule_tick(run_id, config.tick_interval)))
            }
        }

        // Settling + SettleElapsed -> Idle, keeping the finished run
        (ThinkingState::Settling { run }, Event::SettleElapsed { run_id })
            if run.run_id == run_id =>
        {
            Ok(TransitionResult::new(ThinkingState::Idle {
                last: Some(run.clone()),
            })
            .with_effect(Effect::PublishSnapshot)
            .with_effect(Effect::NotifyFinished { run_id }))
        }

        // ============================================================
        // Stale timers
        // ============================================================
        (state, Event::Tick { run_id } | Event::SettleElapsed { run_id }) => {
            Err(TransitionError::StaleTimer {
                run_id,
                state: state.name(),
            })
        }
    }
}
