//! Predicting client: optimistic tick advance and history replay

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::history::UpdateHistory;
use super::{ActivityState, SimError, TickUpdate};

/// Latent one-way channel from client to server.
///
/// Each dispatched update travels on its own task that sleeps for the
/// configured delay before delivery, so in-flight updates overlap without
/// ever blocking the client's tick loop.
#[derive(Clone)]
pub struct Uplink {
    tx: mpsc::Sender<TickUpdate>,
    delay: Duration,
}

impl Uplink {
    pub fn new(tx: mpsc::Sender<TickUpdate>, delay: Duration) -> Self {
        Self { tx, delay }
    }

    /// Fire-and-forget send; never awaited by the caller.
    pub fn dispatch(&self, update: TickUpdate) {
        let tx = self.tx.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(update).await.is_err() {
                debug!("Server hung up, dropping in-flight update");
            }
        });
    }
}

/// Client-side simulator: advances position every tick, records each tick in
/// the history ring, and replays that history when the server corrects it.
pub struct PredictiveSimulator {
    position: i64,
    speed: i64,
    next_id: u64,
    history: UpdateHistory,
    uplink: Uplink,
}

impl PredictiveSimulator {
    pub fn new(speed: i64, uplink: Uplink) -> Self {
        Self {
            position: 0,
            speed,
            next_id: 0,
            history: UpdateHistory::new(),
            uplink,
        }
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Record the initial update (tick 0, position 0). Called exactly once
    /// before the loop starts; not sent to the server.
    pub fn bootstrap(&mut self) {
        self.history.record(TickUpdate {
            id: self.next_id,
            delta_ms: 0,
            position: self.position,
            state: ActivityState::Moving,
        });
        self.next_id += 1;

        info!("Player starts at position 0 and begins moving");
    }

    /// Process one simulation tick: move by `elapsed_ms * speed`, record the
    /// resulting update, and dispatch it to the server.
    pub fn advance_tick(&mut self, elapsed_ms: u64) {
        let move_distance = elapsed_ms as i64 * self.speed;
        self.position += move_distance;

        let update = TickUpdate {
            id: self.next_id,
            delta_ms: elapsed_ms,
            position: self.position,
            state: ActivityState::Moving,
        };

        info!(
            tick = update.id,
            distance = move_distance,
            position = self.position,
            "Processing update on client"
        );

        self.history.record(update.clone());
        self.uplink.dispatch(update);
        self.next_id += 1;
    }

    /// Apply an authoritative correction: rewrite the corrected tick's
    /// position, then replay every later tick's stored delta on top of it.
    ///
    /// Replayed interim positions are not written back into the history
    /// slots; only the corrected tick itself is rewritten.
    pub fn reconcile(&mut self, correction: &TickUpdate) {
        if !self.history.valid_for(correction.id, self.next_id) {
            // Detection only: the lookup below still reads whatever occupies
            // the slot, same as an unguarded ring.
            let stale = SimError::StaleTick {
                id: correction.id,
                next_id: self.next_id,
            };
            warn!(error = %stale, "Correction targets an evicted tick");
        }

        let predicted = self.history.get(correction.id).map(|u| u.position);
        info!(
            tick = correction.id,
            current_tick = self.next_id,
            predicted = ?predicted,
            authoritative = correction.position,
            "Correction received from server"
        );

        self.history
            .overwrite_position(correction.id, correction.position);
        self.position = correction.position;

        for id in correction.id + 1..self.next_id {
            if let Some(past) = self.history.get(id) {
                let move_distance = past.delta_ms as i64 * self.speed;
                self.position += move_distance;

                info!(
                    tick = id,
                    distance = move_distance,
                    position = self.position,
                    "Replaying update on client"
                );
            }
        }

        info!(
            position = self.position,
            "Done correcting player's position"
        );
    }

    #[cfg(test)]
    pub(crate) fn history(&self) -> &UpdateHistory {
        &self.history
    }
}
