//! Deterministic agent ecosystem simulation.
//!
//! A fixed-step world of named agents that move, eat, recharge and die under the
//! direction of an external [`Oracle`], which receives shaped rewards in return.

#![forbid(unsafe_code)]

pub mod clock;
pub mod config;
pub mod drops;
pub mod economy;
pub mod leaderboard;
pub mod lifecycle;
pub mod math;
pub mod observability;
pub mod oracle;
pub mod reward;
pub mod rng;
pub mod sim;
pub mod steering;
pub mod world;

pub use clock::{FixedClock, TickContext};
pub use config::SimConfig;
pub use drops::{CrateEffects, CrateSpawner};
pub use economy::Economy;
pub use leaderboard::{leaderboard, LeaderboardRow};
pub use lifecycle::Lifecycle;
pub use math::Vec2;
pub use observability::{EventLog, LoggedEvent, SimEvent, SimEventKind};
pub use oracle::{
    DecisionBridge, Decisions, HeuristicOracle, Oracle, OracleError, ProcessOracle,
    ScriptedOracle, TickFailure,
};
pub use reward::RewardLedger;
pub use rng::{DeterministicRng, SplitMix64};
pub use sim::{SimError, Simulation, TickReport};
pub use steering::Steering;
pub use world::{Agent, Coin, Crate, CrateKind, Rect, SimulationState, WorldError, WorldGeometry};
