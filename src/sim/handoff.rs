//! Single-slot correction handoff between server task and client loop
//!
//! The server's task writes corrections and the reconciliation loop reads
//! them; both sides go through one mutex-guarded slot so the read-then-clear
//! in the loop is atomic with respect to the writer. Policy for a correction
//! arriving while the previous one is unconsumed: last writer wins, and the
//! displaced correction is handed back so the writer can log the conflict.

use parking_lot::Mutex;

use super::TickUpdate;

/// Shared slot holding at most one pending correction
#[derive(Debug, Default)]
pub struct CorrectionSlot {
    pending: Mutex<Option<TickUpdate>>,
}

impl CorrectionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deposit a correction. Returns the previously pending correction if it
    /// had not been consumed yet (last-writer-wins).
    pub fn offer(&self, correction: TickUpdate) -> Option<TickUpdate> {
        self.pending.lock().replace(correction)
    }

    /// Atomically take and clear the pending correction, if any.
    pub fn take(&self) -> Option<TickUpdate> {
        self.pending.lock().take()
    }
}
