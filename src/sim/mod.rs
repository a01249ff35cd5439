//! Client-side prediction and server reconciliation simulation

pub mod client;
pub mod handoff;
pub mod history;
pub mod server;
pub mod session;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::Config;

use client::{PredictiveSimulator, Uplink};
use handoff::CorrectionSlot;
use server::AuthoritativeSimulator;
use session::Session;

/// Buffered capacity of the client-to-server update channel
const UPLINK_CHANNEL_CAPACITY: usize = 64;

/// What the entity is doing during a tick. Only movement is simulated today;
/// more activities slot in as new variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityState {
    Moving,
}

/// One entry of state history: the entity's state after a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickUpdate {
    /// Strictly increasing tick identifier, assigned by the client
    pub id: u64,
    /// Milliseconds elapsed since the previous tick (0 for tick 0)
    pub delta_ms: u64,
    /// Entity position after this tick
    pub position: i64,
    pub state: ActivityState,
}

/// Abnormal (but survivable) simulation conditions. Client/server
/// disagreement is not in here; corrections are the protocol working as
/// intended.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("tick {id} has been evicted from history (current tick {next_id})")]
    StaleTick { id: u64, next_id: u64 },

    #[error("correction for tick {incoming} displaced unconsumed correction for tick {pending}")]
    HandoffConflict { pending: u64, incoming: u64 },
}

/// Wire up a client session and its authoritative server from configuration.
/// The server half must be spawned onto its own task.
pub fn build(config: &Config) -> (Session, AuthoritativeSimulator) {
    let (update_tx, update_rx) = mpsc::channel(UPLINK_CHANNEL_CAPACITY);
    let corrections = Arc::new(CorrectionSlot::new());

    let uplink = Uplink::new(update_tx, config.server_delay);
    let client = PredictiveSimulator::new(config.client_speed, uplink);
    let server = AuthoritativeSimulator::new(config.server_speed, update_rx, corrections.clone());
    let session = Session::new(client, corrections, config.tick_interval);

    (session, server)
}
