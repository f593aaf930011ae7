//! Oracle integrations - the external decision makers that steer agents.
//!
//! The engine talks to an oracle only through [`DecisionBridge`], which owns it and
//! turns its failure modes into degraded-but-live behaviour.

mod bridge;
mod heuristic;
mod process;
mod scripted;

use std::collections::BTreeMap;

use ecosys_protocol::{
    Decision, InitRequest, InitResponse, RewardEvent, TickRequest, TickResponse, WireError,
};
use thiserror::Error;

pub use bridge::{snapshot, BridgeError, DecisionBridge};
pub use heuristic::{HeuristicOracle, RewardTally};
pub use process::ProcessOracle;
pub use scripted::{ScriptedOracle, TickFailure};

/// Per-agent decisions for one tick, keyed by agent name.
pub type Decisions = BTreeMap<String, Decision>;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("failed to start oracle `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("oracle i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("oracle protocol error: {0}")]
    Wire(#[from] WireError),

    #[error("oracle closed its output")]
    Closed,

    #[error("oracle failure: {0}")]
    Failed(String),
}

/// Blocking decision maker. One call at a time, no call overlaps another.
pub trait Oracle {
    /// Called once before the first tick.
    fn init(&mut self, request: &InitRequest) -> Result<InitResponse, OracleError>;

    /// Called exactly once per simulation step.
    fn tick(&mut self, request: &TickRequest) -> Result<TickResponse, OracleError>;

    /// Fire-and-forget shaping signal.
    fn reward(&mut self, event: &RewardEvent) -> Result<(), OracleError>;

    /// Persist whatever the oracle has learned.
    fn save(&mut self) -> Result<(), OracleError>;
}

impl<O: Oracle + ?Sized> Oracle for Box<O> {
    fn init(&mut self, request: &InitRequest) -> Result<InitResponse, OracleError> {
        (**self).init(request)
    }

    fn tick(&mut self, request: &TickRequest) -> Result<TickResponse, OracleError> {
        (**self).tick(request)
    }

    fn reward(&mut self, event: &RewardEvent) -> Result<(), OracleError> {
        (**self).reward(event)
    }

    fn save(&mut self) -> Result<(), OracleError> {
        (**self).save()
    }
}
