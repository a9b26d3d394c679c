//! Phase timing
//!
//! Measures the phases of a discovery run for debug logging.

use std::time::{Duration, Instant};

/// Records the duration of consecutive phases
#[derive(Debug)]
pub struct PhaseTimer {
    label: String,
    start: Instant,
    last: Instant,
    phases: Vec<(&'static str, Duration)>,
}

impl PhaseTimer {
    /// Start timing a run
    pub fn start(label: impl Into<String>) -> Self {
        let now = Instant::now();
        Self {
            label: label.into(),
            start: now,
            last: now,
            phases: Vec::new(),
        }
    }

    /// Close the current phase under `name`
    pub fn phase(&mut self, name: &'static str) {
        let now = Instant::now();
        let elapsed = now - self.last;
        tracing::debug!("{} {}: {}ms", self.label, name, elapsed.as_millis());
        self.phases.push((name, elapsed));
        self.last = now;
    }

    pub fn phases(&self) -> &[(&'static str, Duration)] {
        &self.phases
    }

    /// Time since the run started
    pub fn total(&self) -> Duration {
        self.start.elapsed()
    }
}
