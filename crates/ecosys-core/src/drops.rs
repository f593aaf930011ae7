//! Mystery crates: timed and manual spawning, pickup effects.

use crate::config::{CrateConfig, RewardConfig};
use crate::math::Vec2;
use crate::observability::{SimEvent, SimEventKind};
use crate::reward::{reason, RewardLedger};
use crate::rng::DeterministicRng;
use crate::world::{Agent, Crate, CrateKind, WorldGeometry};

impl CrateKind {
    pub fn random(rng: &mut impl DeterministicRng) -> Self {
        Self::ALL[rng.index(Self::ALL.len())]
    }
}

/// Countdown timer for automatic spawns.
#[derive(Debug, Clone)]
pub struct CrateSpawner {
    config: CrateConfig,
    remaining: f64,
}

impl CrateSpawner {
    pub fn new(config: CrateConfig) -> Self {
        Self {
            config,
            remaining: config.first_spawn_delay,
        }
    }

    /// Seconds until the next automatic spawn.
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Count down by `dt`; when the timer expires, return a crate and draw a new interval.
    pub fn advance(
        &mut self,
        dt: f64,
        rng: &mut impl DeterministicRng,
        world: &WorldGeometry,
    ) -> Option<Crate> {
        self.remaining -= dt;
        if self.remaining > 0.0 {
            return None;
        }
        let spawned = self.random_crate(rng, world);
        self.remaining = rng.range_f64(self.config.min_interval, self.config.max_interval);
        Some(spawned)
    }

    /// Random kind at a random position inside the spawn margin.
    pub fn random_crate(&self, rng: &mut impl DeterministicRng, world: &WorldGeometry) -> Crate {
        let margin = self.config.spawn_margin;
        let x = rng.range_f32(margin, world.width() - margin);
        let y = rng.range_f32(margin, world.height() - margin);
        Crate {
            position: world.clamp_with_margin(Vec2::new(x, y), margin),
            kind: CrateKind::random(rng),
        }
    }

    /// Random kind at a caller-chosen position, clamped to the manual margin.
    pub fn manual_crate(
        &self,
        at: Vec2,
        rng: &mut impl DeterministicRng,
        world: &WorldGeometry,
    ) -> Crate {
        Crate {
            position: world.clamp_with_margin(at, self.config.manual_margin),
            kind: CrateKind::random(rng),
        }
    }
}

/// What happens when an agent reaches a crate.
pub struct CrateEffects {
    config: CrateConfig,
    rewards: RewardConfig,
}

impl CrateEffects {
    pub fn new(config: CrateConfig, rewards: &RewardConfig) -> Self {
        Self {
            config,
            rewards: *rewards,
        }
    }

    /// Apply exactly one effect for `kind`.
    pub fn apply(&self, agent: &mut Agent, kind: CrateKind, ledger: &mut RewardLedger) {
        let cfg = &self.config;
        match kind {
            CrateKind::SmallCoinBundle => {
                agent.coins += cfg.coin_bundle;
                agent.performance += cfg.coin_bundle_performance;
                agent.status = format!("CRATE: +{} coins", cfg.coin_bundle);
                ledger.push(&agent.name, self.rewards.crate_coins, reason::CRATE_COINS);
            }
            CrateKind::FoodRation => {
                agent.add_food(1);
                agent.performance += cfg.performance;
                agent.status = "CRATE: +1 food".to_string();
                ledger.push(&agent.name, self.rewards.crate_food, reason::CRATE_FOOD);
            }
            CrateKind::SpeedBoost => {
                agent.speed_boost = agent.speed_boost.max(cfg.speed_boost_seconds);
                agent.performance += cfg.performance;
                agent.status = format!("CRATE: speed x1.5 ({}s)", cfg.speed_boost_seconds);
                ledger.push(&agent.name, self.rewards.crate_speed, reason::CRATE_SPEED);
            }
            CrateKind::HealBurst => {
                agent.heal(cfg.heal_amount);
                agent.performance += cfg.performance;
                agent.status = format!("CRATE: +{} health", cfg.heal_amount);
                ledger.push(&agent.name, self.rewards.crate_heal, reason::CRATE_HEAL);
            }
        }
    }

    /// Open every crate within reach. Removal and effect happen together.
    pub fn collect(
        &self,
        tick: u64,
        agent: &mut Agent,
        crates: &mut Vec<Crate>,
        ledger: &mut RewardLedger,
        events: &mut Vec<SimEvent>,
    ) {
        let reach2 = self.config.pickup_radius * self.config.pickup_radius;
        let mut i = 0;
        while i < crates.len() {
            if agent.position.distance_squared(crates[i].position) > reach2 {
                i += 1;
                continue;
            }
            let opened = crates.remove(i);
            self.apply(agent, opened.kind, ledger);
            tracing::debug!(agent = %agent.name, kind = opened.kind.label(), tick, "crate opened");
            events.push(SimEvent::new(
                tick,
                SimEventKind::CrateCollected,
                Some(&agent.name),
                opened.kind.label(),
            ));
        }
    }
}
