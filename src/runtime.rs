//! Runtime for driving thinking runs
//!
//! `ThinkingEngine` is the handle a chat session holds. The engine state
//! lives in a spawned `EngineRuntime` task; the handle talks to it over a
//! command channel and observes it through a snapshot watch plus a
//! notification broadcast.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

use executor::EngineRuntime;
pub use traits::*;

use crate::catalog::PromptCategory;
use crate::config::EngineConfig;
use crate::state_machine::{Event, RunId, ThinkingSnapshot, ThinkingStep};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Errors surfaced to engine callers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Thinking engine has stopped")]
    Stopped,
    #[error("Run {run_id} was superseded before it finished")]
    Superseded { run_id: RunId },
}

/// Lifecycle notifications for subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineNotification {
    Started {
        run_id: RunId,
        category: PromptCategory,
        total_steps: usize,
    },
    StepCompleted {
        run_id: RunId,
        index: usize,
        step: ThinkingStep,
    },
    AnswerReady {
        run_id: RunId,
        final_response: String,
    },
    /// Settling delay over, `is_thinking` is now false
    Finished {
        run_id: RunId,
    },
    Reset,
}

/// An event for the executor, optionally acknowledged once applied
#[derive(Debug)]
pub(crate) struct Command {
    event: Event,
    ack: Option<oneshot::Sender<()>>,
}

impl Command {
    pub(crate) fn timer(event: Event) -> Self {
        Self { event, ack: None }
    }

    fn acknowledged(event: Event) -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                event,
                ack: Some(tx),
            },
            rx,
        )
    }
}

/// Handle to one chat session's thinking engine
pub struct ThinkingEngine {
    config: EngineConfig,
    command_tx: mpsc::Sender<Command>,
    snapshot_rx: watch::Receiver<ThinkingSnapshot>,
    notify_tx: broadcast::Sender<EngineNotification>,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ThinkingEngine {
    /// Spawn an engine on the current tokio runtime using real timers
    pub fn spawn(config: EngineConfig) -> Self {
        Self::with_scheduler(config, TokioScheduler)
    }

    pub fn with_scheduler<S: Scheduler + 'static>(config: EngineConfig, scheduler: S) -> Self {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (snapshot_tx, snapshot_rx) = watch::channel(ThinkingSnapshot::default());
        let (notify_tx, _) = broadcast::channel(128);
        let shutdown = CancellationToken::new();

        let runtime = EngineRuntime::new(
            config,
            scheduler,
            command_rx,
            command_tx.clone(),
            snapshot_tx,
            notify_tx.clone(),
            shutdown.clone(),
        );
        let task = tokio::spawn(runtime.run());

        Self {
            config,
            command_tx,
            snapshot_rx,
            notify_tx,
            shutdown,
            task: Some(task),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Begin a run for `prompt`, superseding any run in progress. Resolves
    /// once the new run is visible in `snapshot()`.
    ///
    /// # Errors
    ///
    /// `EngineError::Stopped` if the engine task has exited.
    pub async fn start(&self, prompt: impl Into<String>) -> Result<RunId, EngineError> {
        let run_id = RunId::new();
        self.send(Event::Start {
            run_id,
            prompt: prompt.into(),
        })
        .await?;
        Ok(run_id)
    }

    /// Abort any run and clear all observable state.
    ///
    /// # Errors
    ///
    /// `EngineError::Stopped` if the engine task has exited.
    pub async fn reset(&self) -> Result<(), EngineError> {
        self.send(Event::Reset).await
    }

    async fn send(&self, event: Event) -> Result<(), EngineError> {
        let (command, ack) = Command::acknowledged(event);
        self.command_tx
            .send(command)
            .await
            .map_err(|_| EngineError::Stopped)?;
        ack.await.map_err(|_| EngineError::Stopped)
    }

    /// Current observable state (an owned copy)
    pub fn snapshot(&self) -> ThinkingSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver that wakes on every published snapshot
    pub fn watch(&self) -> watch::Receiver<ThinkingSnapshot> {
        self.snapshot_rx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineNotification> {
        self.notify_tx.subscribe()
    }

    /// Wait until `run_id` has finished thinking and return its final answer.
    ///
    /// # Errors
    ///
    /// `EngineError::Superseded` if another run starts or the engine is reset
    /// first; `EngineError::Stopped` if the engine shuts down.
    pub async fn wait_for_answer(&self, run_id: RunId) -> Result<String, EngineError> {
        let mut rx = self.snapshot_rx.clone();
        loop {
            {
                let snapshot = rx.borrow_and_update();
                if snapshot.run_id != Some(run_id) {
                    return Err(EngineError::Superseded { run_id });
                }
                if !snapshot.is_thinking {
                    if let Some(answer) = &snapshot.final_response {
                        return Ok(answer.clone());
                    }
                }
            }
            rx.changed().await.map_err(|_| EngineError::Stopped)?;
        }
    }

    /// Stop the engine and wait for its task to exit. Any pending timer is
    /// cancelled.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Thinking engine task ended abnormally");
            }
        }
    }
}

impl Drop for ThinkingEngine {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
