//! Trait abstractions for runtime timers
//!
//! The engine only needs "deliver this event after that delay". Abstracting
//! it lets tests count and inspect every timer that fires.

use super::Command;
use crate::state_machine::Event;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Where a fired timer delivers its event
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::Sender<Command>,
}

impl EventSink {
    pub(crate) fn new(tx: mpsc::Sender<Command>) -> Self {
        Self { tx }
    }

    /// Hand the event to the engine. Returns false if the engine is gone.
    pub async fn deliver(&self, event: Event) -> bool {
        self.tx.send(Command::timer(event)).await.is_ok()
    }
}

/// A pending timer. Aborted when dropped, so replacing the engine's only
/// handle is enough to cancel the previous timer.
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            task: tokio::spawn(future),
        }
    }

    pub fn abort(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Source of delayed events
pub trait Scheduler: Send + Sync {
    /// Deliver `event` to `sink` once `delay` has elapsed, unless the
    /// returned handle is aborted or dropped first.
    fn schedule(&self, delay: Duration, event: Event, sink: EventSink) -> TimerHandle;
}

impl<T: Scheduler + ?Sized> Scheduler for Arc<T> {
    fn schedule(&self, delay: Duration, event: Event, sink: EventSink) -> TimerHandle {
        (**self).schedule(delay, event, sink)
    }
}

// ============================================================================
// Production Adapter
// ============================================================================

/// Timers backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, event: Event, sink: EventSink) -> TimerHandle {
        TimerHandle::spawn(async move {
            tokio::time::sleep(delay).await;
            if !sink.deliver(event).await {
                tracing::debug!("Timer fired after engine stopped");
            }
        })
    }
}
