//! Per-core CPU utilization from cumulative tick counters.
//!
//! `/proc/stat` only exposes counters accumulated since boot, so a usage
//! percentage needs two samples. [`CounterState`] keeps the previous sample
//! of every core and is owned by the collector for the daemon's lifetime.

use std::collections::HashMap;

/// Last observed `(total_ticks, idle_ticks)` per core index.
#[derive(Debug, Clone, Default)]
pub struct CounterState {
    prev: HashMap<usize, (u64, u64)>,
}

impl CounterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Utilization of `core` since the previous call for the same core.
    ///
    /// Returns 0.0 on the first call for a core and whenever the total did
    /// not advance (counter reset). Otherwise returns
    /// `100 * (diff_total - diff_idle) / diff_total` clamped to `[0, 100]`.
    /// The stored baseline is replaced with the new sample in every case.
    pub fn compute(&mut self, core: usize, total: u64, idle_total: u64) -> f64 {
        let prev = self.prev.insert(core, (total, idle_total));

        let Some((prev_total, prev_idle)) = prev else {
            return 0.0;
        };

        let diff_total = total as i128 - prev_total as i128;
        if diff_total <= 0 {
            return 0.0;
        }
        let diff_idle = idle_total as i128 - prev_idle as i128;

        let pct = 100.0 * (diff_total - diff_idle) as f64 / diff_total as f64;
        pct.clamp(0.0, 100.0)
    }

    /// Previous sample for `core`, if any.
    pub fn baseline(&self, core: usize) -> Option<(u64, u64)> {
        self.prev.get(&core).copied()
    }

    /// Number of cores with a stored baseline.
    pub fn len(&self) -> usize {
        self.prev.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prev.is_empty()
    }
}
