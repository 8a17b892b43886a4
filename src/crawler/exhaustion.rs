//! Exhaustion detection for the crawl loop

/// Tracks consecutive non-productive expansions
#[derive(Debug, Clone)]
pub struct ExhaustionMonitor {
    threshold: u32,
    consecutive_empty: u32,
}

impl ExhaustionMonitor {
    /// Creates a monitor that halts after `threshold` consecutive empties
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            consecutive_empty: 0,
        }
    }

    /// Records an expansion that produced no new name
    pub fn record_empty(&mut self) {
        self.consecutive_empty = self.consecutive_empty.saturating_add(1);
    }

    /// Records an expansion that produced at least one new name
    pub fn record_productive(&mut self) {
        self.consecutive_empty = 0;
    }

    /// Returns `true` once the empty streak reaches the threshold
    pub fn should_halt(&self) -> bool {
        self.consecutive_empty >= self.threshold
    }

    /// Current empty streak
    pub fn streak(&self) -> u32 {
        self.consecutive_empty
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}
