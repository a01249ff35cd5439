//! Time utilities for the simulation loop
//!
//! Built on `tokio::time::Instant` rather than `std::time::Instant` so the
//! tick timer follows the runtime clock, including paused clocks in tests.

use tokio::time::Instant;

/// How often the reconciliation loop wakes to poll for corrections and
/// elapsed tick time. Well below the tick interval so correction handling
/// stays prompt without a hot spin.
pub const LOOP_POLL_MS: u64 = 50;

/// A simple timer for measuring elapsed time between simulation ticks
#[derive(Debug, Clone)]
pub struct TickTimer {
    start: Instant,
}

impl TickTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Milliseconds elapsed since creation or the last reset
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    pub fn reset(&mut self) {
        self.start = Instant::now();
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new()
    }
}
