//! Vitals decay, death detection and in-place respawn.

use crate::config::{LifecycleConfig, RewardConfig};
use crate::math::Vec2;
use crate::observability::{SimEvent, SimEventKind};
use crate::reward::{reason, RewardLedger};
use crate::world::{Agent, MAX_INTEL, MAX_VITAL};

pub struct Lifecycle {
    config: LifecycleConfig,
    death_reward: f64,
}

impl Lifecycle {
    pub fn new(config: LifecycleConfig, rewards: &RewardConfig) -> Self {
        Self {
            config,
            death_reward: rewards.death,
        }
    }

    /// Energy drain multiplier; higher intel drains slower, never below the floor.
    pub fn stamina_factor(&self, intel: f32) -> f32 {
        (1.0 - self.config.intel_drain_relief * (intel / MAX_INTEL))
            .clamp(self.config.min_stamina_factor, 1.0)
    }

    /// Decay one agent. Returns true if it died (and has already been respawned).
    pub fn decay(
        &self,
        agent: &mut Agent,
        dt: f32,
        respawn_at: Vec2,
        ledger: &mut RewardLedger,
    ) -> bool {
        if agent.speed_boost > 0.0 {
            agent.speed_boost = (agent.speed_boost - dt).max(0.0);
        }

        let energy_drain = self.config.base_energy_drain * self.stamina_factor(agent.intel);
        agent.energy = (agent.energy - energy_drain * dt).clamp(0.0, MAX_VITAL);

        let health_drain = if agent.energy <= 0.0 {
            self.config.starving_health_drain
        } else {
            self.config.health_drain
        };
        agent.health = (agent.health - health_drain * dt).clamp(0.0, MAX_VITAL);

        if agent.health > 0.0 {
            return false;
        }

        agent.deaths += 1;
        agent.position = respawn_at;
        agent.velocity = Vec2::ZERO;
        agent.health = self.config.respawn_health.clamp(0.0, MAX_VITAL);
        agent.energy = self.config.respawn_energy.clamp(0.0, MAX_VITAL);
        agent.coins = agent.coins.saturating_sub(self.config.death_coin_penalty);
        agent.status.clear();
        ledger.push(&agent.name, self.death_reward, reason::DEATH);
        true
    }

    pub fn step(
        &self,
        tick: u64,
        dt: f32,
        agents: &mut [Agent],
        respawn_at: Vec2,
        ledger: &mut RewardLedger,
        events: &mut Vec<SimEvent>,
    ) {
        for agent in agents.iter_mut() {
            if self.decay(agent, dt, respawn_at, ledger) {
                tracing::debug!(agent = %agent.name, deaths = agent.deaths, tick, "agent died");
                events.push(SimEvent::new(
                    tick,
                    SimEventKind::Death,
                    Some(&agent.name),
                    format!("death #{}", agent.deaths),
                ));
            }
        }
    }
}
