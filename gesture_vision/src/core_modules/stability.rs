// THEORY:
// The `stability` module adds memory to the classifier. Raw finger counts flicker from
// frame to frame; a count only becomes an input event once the same non-zero count has
// been held for `required_hold_secs`. It then stays armed until a consumer takes it.
//
// The state is an explicit tagged enum instead of a set of loose flags:
//
//   Settling { last }            count changed, or no hand
//   Holding  { count, held, .. } same count seen again, time accumulating
//   Armed    { count, held }     held long enough; waiting to be consumed
//
// Every tick either continues the current hold (same non-zero count) or falls back to
// `Settling` with the new count and a zero hold. The tick that first sees a count adds
// nothing; hold time accumulates from the second matching tick on. Consuming an armed
// trigger returns to an un-armed `Holding` with a zero hold. Whether that hold may arm
// again is the `RetriggerPolicy`: `RequireRelease` latches it until the count changes,
// while `RepeatAfterHold` lets a sustained gesture fire again after another full hold.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The output of the gesture engine: a confirmed finger count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GestureEvent {
    pub finger_count: u8,
}

/// What happens to a gesture that is still being held after its trigger was consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetriggerPolicy {
    /// The hold never re-arms until the count changes (or the hand leaves).
    #[default]
    RequireRelease,
    /// The hold restarts from zero and re-arms after another full hold.
    RepeatAfterHold,
}

/// Calibration for the hold-to-confirm filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Seconds a count must be held before it arms.
    pub required_hold_secs: f32,
    pub retrigger: RetriggerPolicy,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            required_hold_secs: 0.2,
            retrigger: RetriggerPolicy::default(),
        }
    }
}

/// Persistent debounce state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    /// The last observed count, not yet confirmed by a second matching tick.
    Settling { last: u8 },
    /// The same count has been seen on consecutive ticks.
    Holding {
        count: u8,
        /// Seconds accumulated so far.
        held: f32,
        /// A consumed hold that may not arm again.
        latched: bool,
    },
    /// The count was held long enough and is waiting to be consumed.
    Armed { count: u8, held: f32 },
}

impl Default for GestureState {
    fn default() -> Self {
        GestureState::Settling { last: 0 }
    }
}

impl GestureState {
    /// The count the current hold (or settle) refers to.
    pub fn last_stable_count(&self) -> u8 {
        match *self {
            GestureState::Settling { last } => last,
            GestureState::Holding { count, .. } | GestureState::Armed { count, .. } => count,
        }
    }

    /// Seconds the current count has been held.
    pub fn hold_time(&self) -> f32 {
        match *self {
            GestureState::Settling { .. } => 0.0,
            GestureState::Holding { held, .. } | GestureState::Armed { held, .. } => held,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, GestureState::Armed { .. })
    }
}

/// Diagnostic summary of the filter, as shown on the preview overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoldStatus {
    Detecting,
    /// `progress` is hold / required, capped at 1.0.
    Holding { count: u8, progress: f32 },
    Locked { count: u8 },
}

impl std::fmt::Display for HoldStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HoldStatus::Detecting => write!(f, "Detecting..."),
            HoldStatus::Holding { count, .. } => write!(f, "Hold: {count}"),
            HoldStatus::Locked { count } => write!(f, "LOCKED: {count}"),
        }
    }
}

/// Owns the `GestureState` and advances it once per tick.
#[derive(Debug, Clone, Default)]
pub struct StabilityFilter {
    config: StabilityConfig,
    state: GestureState,
}

impl StabilityFilter {
    pub fn new(config: StabilityConfig) -> Self {
        Self {
            config,
            state: GestureState::default(),
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn config(&self) -> &StabilityConfig {
        &self.config
    }

    /// Feeds one tick's raw count and the seconds elapsed since the previous tick.
    ///
    /// `elapsed_secs` is added to the hold only when the count matches the one seen
    /// on the previous tick, so the first tick of a new count contributes nothing.
    pub fn observe(&mut self, raw_count: u8, elapsed_secs: f32) -> HoldStatus {
        // NaN and negative frame times contribute nothing.
        let elapsed = elapsed_secs.max(0.0);
        let last = self.state.last_stable_count();

        if raw_count == 0 || raw_count != last {
            if raw_count != last {
                debug!(from = last, to = raw_count, "finger count changed");
            }
            self.state = GestureState::Settling { last: raw_count };
            return self.status();
        }

        self.state = match self.state {
            GestureState::Settling { last } => self.hold(last, elapsed, false),
            GestureState::Holding {
                count,
                held,
                latched,
            } => self.hold(count, held + elapsed, latched),
            GestureState::Armed { count, held } => GestureState::Armed {
                count,
                held: held + elapsed,
            },
        };
        self.status()
    }

    /// Takes the armed trigger, if any. At most one event per hold.
    pub fn consume_trigger(&mut self) -> Option<GestureEvent> {
        let GestureState::Armed { count, .. } = self.state else {
            return None;
        };

        self.state = GestureState::Holding {
            count,
            held: 0.0,
            latched: self.config.retrigger == RetriggerPolicy::RequireRelease,
        };
        info!(finger_count = count, "gesture consumed");
        Some(GestureEvent {
            finger_count: count,
        })
    }

    /// Drops any hold or pending trigger.
    pub fn reset(&mut self) {
        if self.state != GestureState::default() {
            debug!("gesture state reset");
        }
        self.state = GestureState::default();
    }

    pub fn status(&self) -> HoldStatus {
        match self.state {
            GestureState::Settling { .. } => HoldStatus::Detecting,
            GestureState::Holding { count, held, .. } => HoldStatus::Holding {
                count,
                progress: self.progress(held),
            },
            GestureState::Armed { count, .. } => HoldStatus::Locked { count },
        }
    }

    fn hold(&self, count: u8, held: f32, latched: bool) -> GestureState {
        if !latched && held >= self.config.required_hold_secs {
            info!(finger_count = count, held, "gesture locked");
            GestureState::Armed { count, held }
        } else {
            GestureState::Holding {
                count,
                held,
                latched,
            }
        }
    }

    fn progress(&self, held: f32) -> f32 {
        if self.config.required_hold_secs <= 0.0 {
            return 1.0;
        }
        (held / self.config.required_hold_secs).min(1.0)
    }
}
