//! Reconciliation loop driving the predicting client

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::info;

use crate::util::time::{TickTimer, LOOP_POLL_MS};

use super::client::PredictiveSimulator;
use super::handoff::CorrectionSlot;

/// Drives the client simulation: consumes pending corrections, then advances
/// a tick whenever the tick interval has elapsed.
pub struct Session {
    client: PredictiveSimulator,
    corrections: Arc<CorrectionSlot>,
    timer: TickTimer,
    tick_interval_ms: u64,
}

impl Session {
    pub fn new(
        client: PredictiveSimulator,
        corrections: Arc<CorrectionSlot>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            client,
            corrections,
            timer: TickTimer::new(),
            tick_interval_ms: tick_interval.as_millis() as u64,
        }
    }

    /// Record the initial update and start the tick clock.
    pub fn bootstrap(&mut self) {
        self.client.bootstrap();
        self.timer.reset();
    }

    /// Run until externally terminated. Wakes on a short poll interval
    /// instead of spinning; observable ordering per iteration is unchanged.
    pub async fn run(mut self) {
        info!("Starting game");

        let mut poll = interval(Duration::from_millis(LOOP_POLL_MS));
        poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            poll.tick().await;
            self.step();
        }
    }

    /// One loop iteration: corrections first, then at most one new tick.
    pub fn step(&mut self) {
        if let Some(correction) = self.corrections.take() {
            self.client.reconcile(&correction);
        }

        let elapsed = self.timer.elapsed_ms();
        if elapsed >= self.tick_interval_ms {
            self.client.advance_tick(elapsed);
            self.timer.reset();
        }
    }

    pub fn client_position(&self) -> i64 {
        self.client.position()
    }

    #[cfg(test)]
    pub(crate) fn client(&self) -> &PredictiveSimulator {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::client::Uplink;
    use crate::sim::{ActivityState, TickUpdate};
    use tokio::sync::mpsc;
    use tokio::time::advance;

    fn test_session(tick_ms: u64) -> (Session, Arc<CorrectionSlot>) {
        let (tx, _rx) = mpsc::channel(32);
        let uplink = Uplink::new(tx, Duration::from_millis(3500));
        let client = PredictiveSimulator::new(1, uplink);
        let corrections = Arc::new(CorrectionSlot::new());
        let session = Session::new(client, corrections.clone(), Duration::from_millis(tick_ms));
        (session, corrections)
    }

    #[tokio::test(start_paused = true)]
    async fn tick_fires_only_after_the_interval_elapses() {
        let (mut session, _corrections) = test_session(1000);
        session.bootstrap();

        advance(Duration::from_millis(999)).await;
        session.step();
        assert_eq!(session.client().next_id(), 1);
        assert_eq!(session.client_position(), 0);

        advance(Duration::from_millis(1)).await;
        session.step();
        assert_eq!(session.client().next_id(), 2);
        assert_eq!(session.client_position(), 1000);

        // Timer was reset, so another full interval is required.
        advance(Duration::from_millis(500)).await;
        session.step();
        assert_eq!(session.client().next_id(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn correction_is_applied_before_the_due_tick() {
        let (mut session, corrections) = test_session(1000);
        session.bootstrap();

        for _ in 0..2 {
            advance(Duration::from_millis(1000)).await;
            session.step();
        }
        assert_eq!(session.client_position(), 2000);

        corrections.offer(TickUpdate {
            id: 1,
            delta_ms: 1000,
            position: 5000,
            state: ActivityState::Moving,
        });

        advance(Duration::from_millis(1000)).await;
        session.step();

        // Reconcile ran first (5000 + replayed 1000), then tick 3 moved
        // another 1000. Had the tick run first, tick 3 would have been
        // recorded at 3000 instead of 7000.
        assert_eq!(session.client_position(), 7000);
        assert_eq!(session.client().history().get(3).unwrap().position, 7000);
        assert!(corrections.take().is_none());
    }
}
