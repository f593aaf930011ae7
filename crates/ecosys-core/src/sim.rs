//! The fixed-step pipeline tying the subsystems together.
//!
//! Per step: crate timer, oracle decisions, intent, separation and motion, decay and
//! respawn, then per-agent transactions and pickups. Rewards gathered along the way
//! are forwarded to the oracle once the step is complete.

use ecosys_protocol::RewardEvent;
use thiserror::Error;

use crate::clock::{FixedClock, TickContext};
use crate::config::SimConfig;
use crate::drops::{CrateEffects, CrateSpawner};
use crate::economy::Economy;
use crate::lifecycle::Lifecycle;
use crate::math::Vec2;
use crate::observability::{EventLog, SimEvent, SimEventKind};
use crate::oracle::{BridgeError, DecisionBridge, Decisions, Oracle};
use crate::reward::RewardLedger;
use crate::rng::SplitMix64;
use crate::steering::{assign_intent, Steering};
use crate::world::{Coin, Crate, SimulationState, WorldError};

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// Outcome of one fixed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    /// The oracle failed or answered `ok: false`; agents coasted on zero intent.
    pub degraded: bool,
}

pub struct Simulation<O: Oracle> {
    config: SimConfig,
    state: SimulationState,
    clock: FixedClock,
    bridge: DecisionBridge<O>,
    steering: Steering,
    lifecycle: Lifecycle,
    economy: Economy,
    spawner: CrateSpawner,
    crate_effects: CrateEffects,
    rng: SplitMix64,
    ledger: RewardLedger,
    events: Vec<SimEvent>,
    /// Manual spawns waiting to be folded into the next step's events
    pending: Vec<SimEvent>,
    event_log: Option<EventLog>,
}

impl<O: Oracle> Simulation<O> {
    /// Build the world and initialize the oracle. Fails if either is unusable.
    pub fn new(config: SimConfig, oracle: O) -> Result<Self, SimError> {
        let state = SimulationState::from_config(&config.world, &config.agents)?;
        let bridge = DecisionBridge::initialize(oracle, &state.world, &state.agent_names())?;

        tracing::info!(
            agents = state.agents.len(),
            seed = config.seed,
            width = state.world.width(),
            height = state.world.height(),
            "simulation ready"
        );

        Ok(Self {
            clock: FixedClock::new(config.clock),
            steering: Steering::new(config.steering, &config.rewards),
            lifecycle: Lifecycle::new(config.lifecycle, &config.rewards),
            economy: Economy::new(config.economy, &config.rewards),
            spawner: CrateSpawner::new(config.crates),
            crate_effects: CrateEffects::new(config.crates, &config.rewards),
            rng: SplitMix64::new(config.seed),
            ledger: RewardLedger::new(),
            events: Vec::new(),
            pending: Vec::new(),
            event_log: None,
            config,
            state,
            bridge,
        })
    }

    /// Append every tick's events to `log`.
    pub fn set_event_log(&mut self, log: EventLog) {
        self.event_log = Some(log);
    }

    /// Feed one frame of elapsed wall time and run as many whole steps as it covers.
    pub fn frame(&mut self, elapsed: f64) -> Vec<TickReport> {
        self.frame_limited(elapsed, u64::MAX)
    }

    /// Like [`Simulation::frame`], but run at most `max_steps`. Unused time stays in
    /// the accumulator for the next frame.
    pub fn frame_limited(&mut self, elapsed: f64, max_steps: u64) -> Vec<TickReport> {
        self.clock.accumulate(elapsed);
        let mut reports = Vec::new();
        while (reports.len() as u64) < max_steps {
            let Some(ctx) = self.clock.next_step() else {
                break;
            };
            reports.push(self.run_step(ctx));
        }
        reports
    }

    /// Run exactly one step, ignoring the accumulator.
    pub fn step_once(&mut self) -> TickReport {
        let ctx = self.clock.force_step();
        self.run_step(ctx)
    }

    fn run_step(&mut self, ctx: TickContext) -> TickReport {
        let TickContext { tick, dt_seconds: dt } = ctx;
        self.ledger.clear();
        self.events.clear();
        self.events.append(&mut self.pending);

        let spawned = self
            .spawner
            .advance(self.clock.dt(), &mut self.rng, &self.state.world);
        if let Some(spawned) = spawned {
            let event = self.push_crate(tick, spawned);
            self.events.push(event);
        }

        let decisions = self.bridge.tick(tick, dt, &self.state);
        if decisions.is_none() {
            self.events.push(SimEvent::new(
                tick,
                SimEventKind::OracleDegraded,
                None,
                "no decisions this tick",
            ));
        }

        assign_intent(
            &mut self.state.agents,
            decisions.as_ref(),
            self.steering.config().boost_multiplier,
        );
        self.steering
            .step(dt, &mut self.state.agents, &self.state.world, &mut self.ledger);
        self.lifecycle.step(
            tick,
            dt,
            &mut self.state.agents,
            self.state.world.center(),
            &mut self.ledger,
            &mut self.events,
        );

        let state = &mut self.state;
        for agent in state.agents.iter_mut() {
            self.economy
                .apply_transactions(agent, &state.world, dt, &mut self.ledger);
            self.economy
                .collect_coins(tick, agent, &mut state.coins, &mut self.ledger, &mut self.events);
            self.crate_effects
                .collect(tick, agent, &mut state.crates, &mut self.ledger, &mut self.events);
        }
        state.tick = tick;

        self.bridge.forward(self.ledger.events());
        if let Some(decisions) = &decisions {
            apply_display(state, decisions);
        }

        tracing::trace!(
            tick,
            rewards = self.ledger.len(),
            events = self.events.len(),
            coins = state.coins.len(),
            crates = state.crates.len(),
            "step complete"
        );

        if let Some(log) = &self.event_log {
            if let Err(err) = log.append(&self.events) {
                tracing::warn!(tick, error = %err, "failed to append events");
            }
        }

        TickReport {
            tick,
            degraded: decisions.is_none(),
        }
    }

    /// Drop a coin at `(x, y)`, kept slightly inside the world edge.
    pub fn place_coin(&mut self, x: f32, y: f32) {
        let position = self
            .state
            .world
            .clamp_with_margin(Vec2::new(x, y), self.config.economy.coin_margin);
        self.state.coins.push(Coin { position });
    }

    /// Drop a random-kind crate at `(x, y)`.
    pub fn place_crate(&mut self, x: f32, y: f32) {
        let spawned = self
            .spawner
            .manual_crate(Vec2::new(x, y), &mut self.rng, &self.state.world);
        let event = self.push_crate(self.state.tick, spawned);
        self.pending.push(event);
    }

    /// Same as a timer spawn, on demand. The timer itself is left alone.
    pub fn spawn_random_crate(&mut self) {
        let spawned = self.spawner.random_crate(&mut self.rng, &self.state.world);
        let event = self.push_crate(self.state.tick, spawned);
        self.pending.push(event);
    }

    fn push_crate(&mut self, tick: u64, spawned: Crate) -> SimEvent {
        tracing::info!(
            kind = spawned.kind.label(),
            x = spawned.position.x,
            y = spawned.position.y,
            tick,
            "crate spawned"
        );
        self.state.crates.push(spawned);
        SimEvent::new(tick, SimEventKind::CrateSpawned, None, spawned.kind.label())
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    /// Last completed tick.
    pub fn tick(&self) -> u64 {
        self.state.tick
    }

    /// Rewards produced by the most recent step.
    pub fn rewards(&self) -> &[RewardEvent] {
        self.ledger.events()
    }

    /// Events from the most recent step, including manual spawns made before it.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn crate_timer(&self) -> f64 {
        self.spawner.remaining()
    }

    pub fn oracle(&self) -> &O {
        self.bridge.oracle()
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        self.bridge.oracle_mut()
    }

    /// Ask the oracle to save once, then hand back the final state and the oracle.
    pub fn shutdown(self) -> (SimulationState, O) {
        tracing::info!(tick = self.state.tick, "simulation shutting down");
        let oracle = self.bridge.shutdown();
        (self.state, oracle)
    }
}

/// Copy display text from a successful response. Agents the oracle skipped get a
/// placeholder HUD and no intent.
fn apply_display(state: &mut SimulationState, decisions: &Decisions) {
    for agent in state.agents.iter_mut() {
        match decisions.get(&agent.name) {
            Some(decision) => {
                agent.hud = decision.hud.clone();
                agent.intent = decision.intent.clone();
            }
            None => {
                agent.hud = format!("{} | ...", agent.name);
                agent.intent.clear();
            }
        }
    }
}
