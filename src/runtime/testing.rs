//! Mock implementations for testing
//!
//! These mocks record timer activity so tests can assert on it directly.

use super::traits::*;
use crate::state_machine::{Event, RunId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Recording Scheduler
// ============================================================================

/// Tokio-backed scheduler that records every timer it schedules and every
/// timer that actually fires
#[derive(Clone, Default)]
pub struct RecordingScheduler {
    scheduled: Arc<AtomicUsize>,
    fired: Arc<Mutex<Vec<Event>>>,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheduled_count(&self) -> usize {
        self.scheduled.load(Ordering::SeqCst)
    }

    pub fn fired(&self) -> Vec<Event> {
        self.fired.lock().unwrap().clone()
    }

    pub fn fired_count(&self) -> usize {
        self.fired.lock().unwrap().len()
    }

    /// Number of fired timers that belonged to `run_id`
    pub fn fired_for(&self, run_id: RunId) -> usize {
        self.fired()
            .iter()
            .filter(|e| match e {
                Event::Tick { run_id: id } | Event::SettleElapsed { run_id: id } => *id == run_id,
                _ => false,
            })
            .count()
    }
}

impl Scheduler for RecordingScheduler {
    fn schedule(&self, delay: Duration, event: Event, sink: EventSink) -> TimerHandle {
        self.scheduled.fetch_add(1, Ordering::SeqCst);
        let fired = self.fired.clone();
        TimerHandle::spawn(async move {
            tokio::time::sleep(delay).await;
            fired.lock().unwrap().push(event.clone());
            sink.deliver(event).await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{script, PromptCategory};
    use crate::config::EngineConfig;
    use crate::runtime::{EngineError, EngineNotification, ThinkingEngine};
    use tokio::time::{sleep, Instant};

    const TICK: Duration = Duration::from_millis(5000);
    const SETTLE: Duration = Duration::from_millis(1000);

    fn engine() -> (ThinkingEngine, RecordingScheduler) {
        let scheduler = RecordingScheduler::new();
        let engine = ThinkingEngine::with_scheduler(EngineConfig::default(), scheduler.clone());
        (engine, scheduler)
    }

    /// Sleep to the middle of tick `n` (after `n` ticks have fired)
    async fn sleep_ticks(n: u32) {
        sleep(TICK * n + TICK / 2).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_visible_immediately() {
        let (engine, _) = engine();
        let run_id = engine.start("My blood sugar is odd").await.unwrap();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.run_id, Some(run_id));
        assert_eq!(snapshot.category, Some(PromptCategory::Glucose));
        assert!(snapshot.is_thinking);
        assert_eq!(snapshot.steps.len(), 8);
        assert!(snapshot.steps.iter().all(|s| !s.completed));
        assert!(snapshot.steps.iter().all(|s| s.response.is_none()));
        assert_eq!(snapshot.current_step, 0);
        assert!(snapshot.final_response.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_steps_advance_one_per_tick() {
        let (engine, _) = engine();
        engine.start("what should I eat").await.unwrap();

        sleep_ticks(3).await;
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.current_step, 3);
        let flags: Vec<_> = snapshot.steps.iter().map(|s| s.completed).collect();
        assert_eq!(flags, [true, true, true, false, false, false, false, false]);
        assert!(snapshot.steps[2].revealed_response().is_some());
        assert!(snapshot.steps[3].revealed_response().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_run_timing_and_answer() {
        let (engine, _) = engine();
        let begin = Instant::now();
        let run_id = engine
            .start("My blood sugar has been high after dinner")
            .await
            .unwrap();

        let answer = engine.wait_for_answer(run_id).await.unwrap();
        let elapsed = begin.elapsed();

        assert_eq!(answer, script(PromptCategory::Glucose).final_response);
        let expected = engine.config().worst_case_duration(8);
        assert!(elapsed >= expected, "finished early: {elapsed:?}");
        assert!(elapsed < expected + Duration::from_millis(50), "finished late: {elapsed:?}");

        let snapshot = engine.snapshot();
        assert!(!snapshot.is_thinking);
        assert!(snapshot.steps.iter().all(|s| s.completed));
        assert_eq!(snapshot.current_step, 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_answer_set_before_settling_ends() {
        let (engine, _) = engine();
        engine.start("insulin").await.unwrap();

        // after the 8th tick but inside the settling delay
        sleep(TICK * 8 + SETTLE / 2).await;
        let snapshot = engine.snapshot();
        assert!(snapshot.is_thinking);
        assert_eq!(
            snapshot.final_response.as_deref(),
            Some(script(PromptCategory::Medication).final_response)
        );

        sleep(SETTLE).await;
        assert!(!engine.snapshot().is_thinking);
        assert!(engine.snapshot().final_response.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_notifications_in_order() {
        let (engine, _) = engine();
        let mut rx = engine.subscribe();
        let run_id = engine.start("workout plan").await.unwrap();
        engine.wait_for_answer(run_id).await.unwrap();

        let mut seen = Vec::new();
        while let Ok(n) = rx.try_recv() {
            seen.push(n);
        }

        assert!(matches!(
            seen.first(),
            Some(EngineNotification::Started { category: PromptCategory::Exercise, total_steps: 8, .. })
        ));
        let indices: Vec<_> = seen
            .iter()
            .filter_map(|n| match n {
                EngineNotification::StepCompleted { index, step, .. } => {
                    assert!(step.completed);
                    Some(*index)
                }
                _ => None,
            })
            .collect();
        assert_eq!(indices, (0..8).collect::<Vec<_>>());
        assert!(matches!(seen[seen.len() - 2], EngineNotification::AnswerReady { .. }));
        assert_eq!(seen.last(), Some(&EngineNotification::Finished { run_id }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_never_goes_backwards() {
        let (engine, _) = engine();
        let mut watch = engine.watch();
        let run_id = engine.start("hello").await.unwrap();

        let mut last_step = 0;
        let mut last_flags = vec![false; 8];
        loop {
            watch.changed().await.unwrap();
            let snapshot = watch.borrow_and_update().clone();
            assert!(snapshot.current_step >= last_step);
            for (was, now) in last_flags.iter().zip(snapshot.steps.iter()) {
                assert!(!*was || now.completed);
            }
            last_step = snapshot.current_step;
            last_flags = snapshot.steps.iter().map(|s| s.completed).collect();
            if !snapshot.is_thinking {
                assert_eq!(snapshot.run_id, Some(run_id));
                break;
            }
        }
        assert_eq!(last_step, 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_supersedes_running_timer() {
        let (engine, scheduler) = engine();
        let first = engine.start("glucose").await.unwrap();
        sleep_ticks(2).await;
        assert_eq!(scheduler.fired_for(first), 2);

        let second = engine.start("meal ideas").await.unwrap();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.run_id, Some(second));
        assert_eq!(snapshot.category, Some(PromptCategory::Diet));
        assert_eq!(snapshot.current_step, 0);
        assert!(snapshot.steps.iter().all(|s| !s.completed));

        let answer = engine.wait_for_answer(second).await.unwrap();
        assert_eq!(answer, script(PromptCategory::Diet).final_response);

        // The first run's timer never fired again
        assert_eq!(scheduler.fired_for(first), 2);
        assert_eq!(scheduler.fired_for(second), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_during_settling_cancels_settle_timer() {
        let (engine, scheduler) = engine();
        let first = engine.start("glucose").await.unwrap();

        sleep(TICK * 8 + SETTLE / 2).await;
        assert!(engine.snapshot().is_thinking);
        assert!(engine.snapshot().final_response.is_some());
        assert_eq!(scheduler.fired_for(first), 8);

        let second = engine.start("insulin dose").await.unwrap();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.run_id, Some(second));
        assert_eq!(snapshot.category, Some(PromptCategory::Medication));
        assert_eq!(snapshot.current_step, 0);
        assert!(snapshot.final_response.is_none());

        let answer = engine.wait_for_answer(second).await.unwrap();
        assert_eq!(answer, script(PromptCategory::Medication).final_response);

        // The first run's settle timer never fired
        assert_eq!(scheduler.fired_for(first), 8);
        assert_eq!(scheduler.fired_for(second), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_superseded_run_fails() {
        let (engine, _) = engine();
        let first = engine.start("diet").await.unwrap();
        engine.start("exercise").await.unwrap();

        assert_eq!(
            engine.wait_for_answer(first).await,
            Err(EngineError::Superseded { run_id: first })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_mid_run_clears_and_stops_timer() {
        let (engine, scheduler) = engine();
        engine.start("blood pressure").await.unwrap();
        sleep_ticks(3).await;
        let fired_before = scheduler.fired_count();

        engine.reset().await.unwrap();
        let cleared = engine.snapshot();
        assert!(cleared.is_cleared());

        engine.reset().await.unwrap();
        assert_eq!(engine.snapshot(), cleared);

        sleep(TICK * 20).await;
        assert_eq!(scheduler.fired_count(), fired_before);
        assert!(engine.snapshot().is_cleared());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_when_idle_is_noop() {
        let (engine, scheduler) = engine();
        engine.reset().await.unwrap();
        assert!(engine.snapshot().is_cleared());
        assert_eq!(scheduler.scheduled_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_fails_pending_wait() {
        let (engine, _) = engine();
        let run_id = engine.start("glucose").await.unwrap();
        let (wait, reset) = tokio::join!(engine.wait_for_answer(run_id), async {
            sleep(TICK).await;
            engine.reset().await
        });
        reset.unwrap();
        assert_eq!(wait, Err(EngineError::Superseded { run_id }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_run_kept_until_next_start() {
        let (engine, _) = engine();
        let run_id = engine.start("medication").await.unwrap();
        engine.wait_for_answer(run_id).await.unwrap();

        sleep(TICK * 10).await;
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.run_id, Some(run_id));
        assert!(snapshot.final_response.is_some());
        assert!(!snapshot.is_thinking);

        let next = engine.start("hi").await.unwrap();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.run_id, Some(next));
        assert!(snapshot.final_response.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_timer() {
        let (engine, scheduler) = engine();
        engine.start("glucose").await.unwrap();
        sleep_ticks(1).await;
        let fired_before = scheduler.fired_count();

        engine.shutdown().await;
        sleep(TICK * 20).await;
        assert_eq!(scheduler.fired_count(), fired_before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_engine() {
        let (engine, scheduler) = engine();
        let watch = engine.watch();
        engine.start("glucose").await.unwrap();
        drop(engine);

        sleep(TICK * 20).await;
        assert_eq!(scheduler.fired_count(), 0);
        assert!(watch.has_changed().is_err());
    }
}
