use ecosys_protocol::{CoinView, InitRequest, PlayerView, RewardEvent, TickRequest};
use thiserror::Error;

use super::{Decisions, Oracle, OracleError};
use crate::world::{SimulationState, WorldGeometry};

/// Startup failure. The simulation cannot run without an oracle.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("oracle initialization failed: {0}")]
    Init(#[from] OracleError),

    #[error("oracle rejected initialization")]
    Rejected,
}

/// Sole channel between simulation state and the oracle.
pub struct DecisionBridge<O> {
    oracle: O,
}

impl<O: Oracle> DecisionBridge<O> {
    /// Send world geometry and agent names. Any failure is fatal.
    pub fn initialize(
        mut oracle: O,
        world: &WorldGeometry,
        names: &[String],
    ) -> Result<Self, BridgeError> {
        let request = InitRequest {
            bounds: world.bounds(),
            store: world.store().into(),
            recharge: world.recharge().into(),
            players: names.to_vec(),
        };
        let response = oracle.init(&request)?;
        if !response.ok {
            return Err(BridgeError::Rejected);
        }
        tracing::info!(players = names.len(), "oracle initialized");
        Ok(Self { oracle })
    }

    /// Ask for this tick's decisions. `None` means the oracle failed or answered
    /// `ok: false`; callers treat that as zero intent and keep stale display text.
    pub fn tick(&mut self, tick: u64, dt: f32, state: &SimulationState) -> Option<Decisions> {
        let request = snapshot(tick, dt, state);
        match self.oracle.tick(&request) {
            Ok(response) if response.ok => Some(response.decisions),
            Ok(_) => {
                tracing::warn!(tick, "oracle reported an unsuccessful tick");
                None
            }
            Err(err) => {
                tracing::warn!(tick, error = %err, "oracle tick failed");
                None
            }
        }
    }

    /// Best effort; failures are logged and dropped.
    pub fn reward(&mut self, event: &RewardEvent) {
        if let Err(err) = self.oracle.reward(event) {
            tracing::warn!(
                agent = %event.name,
                reason = %event.reason,
                error = %err,
                "reward delivery failed"
            );
        }
    }

    pub fn forward(&mut self, events: &[RewardEvent]) {
        for event in events {
            self.reward(event);
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    /// Last chance for the oracle to persist. Consumes the bridge so no call can follow.
    pub fn shutdown(mut self) -> O {
        match self.oracle.save() {
            Ok(()) => tracing::info!("oracle saved"),
            Err(err) => tracing::warn!(error = %err, "oracle save failed"),
        }
        self.oracle
    }
}

/// Build the oracle's view of the world. Death counters, boost timers and display
/// text stay out of it.
pub fn snapshot(tick: u64, dt: f32, state: &SimulationState) -> TickRequest {
    let world = &state.world;
    TickRequest {
        tick,
        dt,
        bounds: world.bounds(),
        store: world.store().into(),
        recharge: world.recharge().into(),
        coins: state
            .coins
            .iter()
            .map(|c| CoinView {
                x: c.position.x,
                y: c.position.y,
            })
            .collect(),
        players: state
            .agents
            .iter()
            .map(|a| {
                (
                    a.name.clone(),
                    PlayerView {
                        x: a.position.x,
                        y: a.position.y,
                        vx: a.velocity.x,
                        vy: a.velocity.y,
                        health: a.health,
                        energy: a.energy,
                        coins: a.coins,
                        food: a.food,
                        intel: a.intel,
                        perf: a.performance,
                    },
                )
            })
            .collect(),
    }
}
