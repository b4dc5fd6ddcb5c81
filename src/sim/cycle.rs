//! Day/night cycle clock
//!
//! Maps elapsed play time to a repeating `[0, 1)` progress and reports each
//! new cycle exactly once. The new-cycle event is handed back to the caller
//! instead of invoking a stored callback, so whatever the caller does with it
//! (resetting the fleet) cannot re-enter the manager.

/// Largest `f32` below 1
const ONE_BELOW: f32 = 1.0 - f32::EPSILON / 2.0;

/// Result of one cycle update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleTick {
    /// `floor(elapsed / period)`
    pub index: i64,
    /// Position within the current cycle, in `[0, 1)`
    pub progress: f32,
    /// True the first time `index` is observed
    pub new_cycle: bool,
}

/// Tracks which cycle was last observed
#[derive(Debug, Clone)]
pub struct CycleManager {
    period: f32,
    /// `None` until the first update, so cycle 0 is reported once
    last_index: Option<i64>,
}

impl CycleManager {
    pub fn new(period: f32) -> Self {
        if !(period > 0.0 && period.is_finite()) {
            log::warn!("Cycle period {period} is degenerate; progress will stay at 0");
        }
        Self {
            period,
            last_index: None,
        }
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    /// Last cycle index observed, if any
    pub fn current_index(&self) -> Option<i64> {
        self.last_index
    }

    /// Advance to `elapsed` seconds of play time
    pub fn update(&mut self, elapsed: f32) -> CycleTick {
        let (index, progress) = if self.period > 0.0 && self.period.is_finite() && elapsed.is_finite() {
            let (elapsed, period) = (elapsed as f64, self.period as f64);
            let index = (elapsed / period).floor() as i64;
            // Measured from the start of `index` so the two never disagree
            let progress = ((elapsed - index as f64 * period) / period) as f32;
            (index, progress.clamp(0.0, ONE_BELOW))
        } else {
            (0, 0.0)
        };

        let new_cycle = self.last_index != Some(index);
        if new_cycle {
            self.last_index = Some(index);
        }

        CycleTick {
            index,
            progress,
            new_cycle,
        }
    }

    /// Advance and invoke `on_new_cycle` once if a boundary was crossed
    pub fn update_with(&mut self, elapsed: f32, on_new_cycle: impl FnOnce(i64)) -> f32 {
        let tick = self.update(elapsed);
        if tick.new_cycle {
            on_new_cycle(tick.index);
        }
        tick.progress
    }
}
