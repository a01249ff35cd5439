//! Authoritative server task: recomputes state and emits corrections

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use super::handoff::CorrectionSlot;
use super::{SimError, TickUpdate};

/// Server-side simulator. Owns `position` exclusively; only the task running
/// [`AuthoritativeSimulator::run`] ever mutates it.
pub struct AuthoritativeSimulator {
    position: i64,
    speed: i64,
    update_rx: mpsc::Receiver<TickUpdate>,
    corrections: Arc<CorrectionSlot>,
}

impl AuthoritativeSimulator {
    pub fn new(
        speed: i64,
        update_rx: mpsc::Receiver<TickUpdate>,
        corrections: Arc<CorrectionSlot>,
    ) -> Self {
        Self {
            position: 0,
            speed,
            update_rx,
            corrections,
        }
    }

    /// Process client updates in delivery order until the client hangs up.
    /// Transit latency has already been paid on the uplink, so each update is
    /// evaluated as soon as it arrives.
    pub async fn run(mut self) {
        while let Some(update) = self.update_rx.recv().await {
            if let Some(correction) = self.evaluate(&update) {
                if let Some(displaced) = self.corrections.offer(correction) {
                    let conflict = SimError::HandoffConflict {
                        pending: displaced.id,
                        incoming: update.id,
                    };
                    warn!(error = %conflict, "Correction displaced before the client consumed it");
                }
            }
        }
    }

    /// Recompute the position for one client update. Returns a correction
    /// when the server's result disagrees with the client's claim.
    fn evaluate(&mut self, update: &TickUpdate) -> Option<TickUpdate> {
        let move_distance = update.delta_ms as i64 * self.speed;
        self.position += move_distance;

        info!(
            tick = update.id,
            position = self.position,
            "Processing update on server"
        );

        if self.position != update.position {
            info!(
                tick = update.id,
                client_position = update.position,
                server_position = self.position,
                "Server and client disagree, sending correction"
            );
            Some(TickUpdate {
                id: update.id,
                delta_ms: update.delta_ms,
                position: self.position,
                state: update.state,
            })
        } else {
            info!(tick = update.id, "Client and server agree");
            None
        }
    }
}
