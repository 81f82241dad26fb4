//! Monotonic simulated clock.
//!
//! The clock only advances when the engine explicitly moves time forward,
//! which keeps every run deterministic and replayable.

/// Tick-based simulated clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SimClock {
    now: u64,
}

impl SimClock {
    /// Create a new clock at tick 0.
    pub fn new() -> Self {
        Self { now: 0 }
    }

    /// Current time in ticks.
    #[inline(always)]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Jump forward to an absolute tick, e.g. the next arrival after idling.
    #[inline(always)]
    pub fn advance_to(&mut self, t: u64) {
        debug_assert!(t >= self.now);
        self.now = t;
    }

    /// Advance by the length of a slice. Returns the new time.
    #[inline(always)]
    pub fn advance_by(&mut self, dt: u64) -> u64 {
        self.now = self.now.saturating_add(dt);
        self.now
    }
}
