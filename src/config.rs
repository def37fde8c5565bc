//! Engine timing configuration

use std::time::Duration;

/// Default pause between step completions
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(5000);

/// Default pause between the last step and leaving the thinking view
pub const DEFAULT_SETTLING_DELAY: Duration = Duration::from_millis(1000);

const TICK_INTERVAL_VAR: &str = "GLUCO_TICK_INTERVAL_MS";
const SETTLING_DELAY_VAR: &str = "GLUCO_SETTLING_DELAY_MS";

/// Timing for the thinking engine (immutable once the engine is spawned)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub tick_interval: Duration,
    /// Must stay shorter than `tick_interval`
    pub settling_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            settling_delay: DEFAULT_SETTLING_DELAY,
        }
    }
}

impl EngineConfig {
    /// A settling delay not shorter than `tick_interval` is clamped to a
    /// fifth of the tick.
    pub fn new(tick_interval: Duration, settling_delay: Duration) -> Self {
        Self {
            tick_interval,
            settling_delay,
        }
        .clamp_settling_delay()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key: &str| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unparseable or zero values
    /// fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let tick_interval = read_millis(&lookup, TICK_INTERVAL_VAR, DEFAULT_TICK_INTERVAL);
        let settling_delay = read_millis(&lookup, SETTLING_DELAY_VAR, DEFAULT_SETTLING_DELAY);
        Self::new(tick_interval, settling_delay)
    }

    fn clamp_settling_delay(mut self) -> Self {
        if self.settling_delay >= self.tick_interval {
            tracing::warn!(
                tick_ms = duration_ms(self.tick_interval),
                settle_ms = duration_ms(self.settling_delay),
                "Settling delay must be shorter than the tick interval, clamping"
            );
            self.settling_delay = self.tick_interval / 5;
        }
        self
    }

    /// Upper bound on how long a run of `steps` steps keeps `is_thinking` set
    pub fn worst_case_duration(&self, steps: usize) -> Duration {
        let steps = u32::try_from(steps).unwrap_or(u32::MAX);
        self.tick_interval
            .saturating_mul(steps)
            .saturating_add(self.settling_delay)
    }
}

fn read_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Duration {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Duration::from_millis(ms),
        _ => {
            tracing::warn!(var = key, value = %raw, "Invalid duration, using default");
            default
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
