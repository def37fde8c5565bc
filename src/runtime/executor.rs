//! Thinking engine executor

use super::traits::{EventSink, Scheduler, TimerHandle};
use super::{Command, EngineNotification};

use crate::config::EngineConfig;
use crate::state_machine::{transition, Effect, Event, ThinkingSnapshot, ThinkingState};
use tokio::sync::{broadcast, mpsc, watch};
use tokio_util::sync::CancellationToken;

/// Owns the engine state and the single live timer. All mutation happens
/// inside `run`, one command at a time.
pub struct EngineRuntime<S>
where
    S: Scheduler + 'static,
{
    config: EngineConfig,
    state: ThinkingState,
    scheduler: S,
    command_rx: mpsc::Receiver<Command>,
    /// Handed to timers so they can report back
    sink: EventSink,
    snapshot_tx: watch::Sender<ThinkingSnapshot>,
    notify_tx: broadcast::Sender<EngineNotification>,
    shutdown: CancellationToken,
    /// The only pending timer, if any
    timer: Option<TimerHandle>,
}

impl<S> EngineRuntime<S>
where
    S: Scheduler + 'static,
{
    pub(crate) fn new(
        config: EngineConfig,
        scheduler: S,
        command_rx: mpsc::Receiver<Command>,
        command_tx: mpsc::Sender<Command>,
        snapshot_tx: watch::Sender<ThinkingSnapshot>,
        notify_tx: broadcast::Sender<EngineNotification>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config,
            state: ThinkingState::default(),
            scheduler,
            command_rx,
            sink: EventSink::new(command_tx),
            snapshot_tx,
            notify_tx,
            shutdown,
            timer: None,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            tick = ?self.config.tick_interval,
            settle = ?self.config.settling_delay,
            "Starting thinking engine"
        );

        loop {
            tokio::select! {
                biased;
                () = self.shutdown.cancelled() => break,
                command = self.command_rx.recv() => {
                    let Some(Command { event, ack }) = command else {
                        break;
                    };
                    self.process_event(event);
                    if let Some(ack) = ack {
                        let _ = ack.send(());
                    }
                }
            }
        }

        // Teardown: nothing may fire into a session that no longer exists
        self.cancel_timer();
        tracing::info!("Thinking engine stopped");
    }

    fn process_event(&mut self, event: Event) {
        let from_timer = event.is_timer();
        let result = match transition(&self.state, &self.config, event) {
            Ok(r) => r,
            Err(e) => {
                // A timer that lost the race with start/reset lands here
                tracing::debug!(error = %e, from_timer, state = self.state.name(), "Ignoring event");
                return;
            }
        };

        let old_state = std::mem::replace(&mut self.state, result.new_state);
        if old_state.name() != self.state.name() {
            tracing::debug!(from = old_state.name(), to = self.state.name(), "State change");
        }

        for effect in result.effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::CancelTimer => self.cancel_timer(),

            Effect::ScheduleTick { run_id, delay } => {
                self.schedule(delay, Event::Tick { run_id });
            }

            Effect::ScheduleSettle { run_id, delay } => {
                self.schedule(delay, Event::SettleElapsed { run_id });
            }

            Effect::PublishSnapshot => {
                self.snapshot_tx.send_replace(self.state.snapshot());
            }

            Effect::NotifyStarted {
                run_id,
                category,
                total_steps,
            } => {
                tracing::info!(run_id = %run_id, category = %category, total_steps, "Thinking started");
                self.notify(EngineNotification::Started {
                    run_id,
                    category,
                    total_steps,
                });
            }

            Effect::NotifyStepCompleted { run_id, index } => {
                let Some(step) = self.state.run().and_then(|run| run.steps.get(index)).cloned()
                else {
                    tracing::warn!(run_id = %run_id, index, "Completed step missing from state");
                    return;
                };
                tracing::debug!(run_id = %run_id, index, step_id = %step.id, "Step completed");
                self.notify(EngineNotification::StepCompleted {
                    run_id,
                    index,
                    step,
                });
            }

            Effect::NotifyAnswerReady {
                run_id,
                final_response,
            } => {
                tracing::info!(run_id = %run_id, "Final answer ready");
                self.notify(EngineNotification::AnswerReady {
                    run_id,
                    final_response,
                });
            }

            Effect::NotifyFinished { run_id } => {
                tracing::info!(run_id = %run_id, "Thinking finished");
                self.notify(EngineNotification::Finished { run_id });
            }

            Effect::NotifyReset => {
                tracing::info!("Thinking reset");
                self.notify(EngineNotification::Reset);
            }
        }
    }

    /// Replace the pending timer. The previous one is aborted first, so at
    /// most one timer is ever live.
    fn schedule(&mut self, delay: std::time::Duration, event: Event) {
        self.cancel_timer();
        self.timer = Some(self.scheduler.schedule(delay, event, self.sink.clone()));
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            if !timer.is_finished() {
                tracing::debug!("Cancelling pending timer");
            }
            timer.abort();
        }
    }

    fn notify(&self, notification: EngineNotification) {
        // No subscribers is fine
        let _ = self.notify_tx.send(notification);
    }
}
