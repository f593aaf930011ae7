//! Steering & motion integration: oracle intent + pairwise separation.
//!
//! Order per tick:
//! 1. velocity = oracle intent (x boost multiplier while a speed boost is active)
//! 2. separation acceleration from the positions at the start of the tick
//! 3. velocity += accel * dt, then the speed cap
//! 4. position += velocity * dt, then the bounds clamp

use std::collections::BTreeMap;

use crate::config::{RewardConfig, SteeringConfig};
use crate::math::Vec2;
use crate::oracle::Decisions;
use crate::reward::{reason, RewardLedger};
use crate::world::{Agent, WorldGeometry};

/// Overwrite each agent's velocity with its oracle intent. Agents without a decision,
/// or every agent when the oracle failed this tick, get zero. So does a decision
/// with a NaN or infinite component.
pub fn assign_intent(agents: &mut [Agent], decisions: Option<&Decisions>, boost_multiplier: f32) {
    for agent in agents.iter_mut() {
        let intent = decisions
            .and_then(|d| d.get(&agent.name))
            .map(|d| Vec2::new(d.vx, d.vy))
            .filter(|v| v.is_finite())
            .unwrap_or(Vec2::ZERO);
        let boost = if agent.speed_boost > 0.0 {
            boost_multiplier
        } else {
            1.0
        };
        agent.velocity = intent * boost;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Cell(i32, i32);

/// Separation solver with a spatial hash for neighbour queries.
///
/// Neighbours are visited in agent order, so results match a brute-force pass over
/// all pairs bit for bit.
pub struct Steering {
    config: SteeringConfig,
    too_close_penalty: f64,
    cell_size: f32,
    buckets: BTreeMap<Cell, Vec<usize>>,
    scratch_neighbors: Vec<usize>,
    scratch_accel: Vec<Vec2>,
}

impl Steering {
    pub fn new(config: SteeringConfig, rewards: &RewardConfig) -> Self {
        Self {
            config,
            too_close_penalty: rewards.too_close,
            cell_size: config.separation_radius.max(1e-3),
            buckets: BTreeMap::new(),
            scratch_neighbors: Vec::new(),
            scratch_accel: Vec::new(),
        }
    }

    pub fn config(&self) -> SteeringConfig {
        self.config
    }

    /// Separation acceleration per agent, from the current positions only.
    ///
    /// Emits one `too_close` penalty for the pushed agent per close neighbour.
    pub fn separation(&mut self, agents: &[Agent], ledger: &mut RewardLedger) -> &[Vec2] {
        let radius = self.config.separation_radius.max(0.0);
        self.scratch_accel.clear();
        self.scratch_accel.resize(agents.len(), Vec2::ZERO);
        if radius <= 0.0 {
            return &self.scratch_accel;
        }

        self.cell_size = radius.max(1e-3);
        self.rebuild_buckets(agents);

        let radius2 = radius * radius;
        let min_dist2 = self.config.min_distance * self.config.min_distance;

        for i in 0..agents.len() {
            let agent = &agents[i];
            let cell = cell_for(agent.position, self.cell_size);

            self.scratch_neighbors.clear();
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if let Some(bucket) = self.buckets.get(&Cell(cell.0 + dx, cell.1 + dy)) {
                        self.scratch_neighbors.extend_from_slice(bucket);
                    }
                }
            }
            self.scratch_neighbors.sort_unstable();

            let mut accel = Vec2::ZERO;
            for &j in self.scratch_neighbors.iter() {
                if i == j {
                    continue;
                }
                let delta = agent.position - agents[j].position;
                let dist2 = delta.length_squared();
                if dist2 >= radius2 || dist2 <= min_dist2 {
                    continue;
                }
                let dist = dist2.sqrt();
                let weight = (radius - dist) / radius;
                accel += (delta / dist) * (self.config.separation_strength * weight);
                ledger.push(
                    &agent.name,
                    -self.too_close_penalty * weight as f64,
                    reason::TOO_CLOSE,
                );
            }

            self.scratch_accel[i] = accel.clamp_length(self.config.max_accel);
        }

        &self.scratch_accel
    }

    /// Apply separation, integrate velocity and position, clamp to the world.
    pub fn step(
        &mut self,
        dt_seconds: f32,
        agents: &mut [Agent],
        world: &WorldGeometry,
        ledger: &mut RewardLedger,
    ) {
        let dt = dt_seconds.max(0.0);
        self.separation(agents, ledger);

        for (agent, accel) in agents.iter_mut().zip(self.scratch_accel.iter().copied()) {
            agent.velocity = (agent.velocity + accel * dt).clamp_length(self.config.max_speed);
            agent.position = world.clamp(agent.position + agent.velocity * dt);
        }
    }

    fn rebuild_buckets(&mut self, agents: &[Agent]) {
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
        for (idx, agent) in agents.iter().enumerate() {
            let cell = cell_for(agent.position, self.cell_size);
            self.buckets.entry(cell).or_default().push(idx);
        }
        self.buckets.retain(|_, bucket| !bucket.is_empty());
    }
}

fn cell_for(p: Vec2, cell_size: f32) -> Cell {
    let cs = cell_size.max(1e-6);
    Cell((p.x / cs).floor() as i32, (p.y / cs).floor() as i32)
}
