//! Zone transactions and coin pickups.

use crate::config::{EconomyConfig, RewardConfig};
use crate::observability::{SimEvent, SimEventKind};
use crate::reward::{reason, RewardLedger};
use crate::world::{Agent, Coin, WorldGeometry, MAX_VITAL};

pub struct Economy {
    config: EconomyConfig,
    rewards: RewardConfig,
}

impl Economy {
    pub fn new(config: EconomyConfig, rewards: &RewardConfig) -> Self {
        Self {
            config,
            rewards: *rewards,
        }
    }

    /// Food an agent tries to keep in stock: one unit, plus one per intel step, capped.
    pub fn reserve_target(&self, intel: f32) -> u32 {
        let steps = (intel / self.config.intel_per_reserve_step.max(f32::EPSILON)).floor();
        (1 + steps.max(0.0) as u32).min(self.config.max_food_reserve)
    }

    /// Store, recharge and maintenance rules, in that order.
    pub fn apply_transactions(
        &self,
        agent: &mut Agent,
        world: &WorldGeometry,
        dt: f32,
        ledger: &mut RewardLedger,
    ) {
        let cfg = &self.config;

        if world.store().contains(agent.position) {
            if agent.coins >= cfg.food_price && agent.food < self.reserve_target(agent.intel) {
                agent.coins -= cfg.food_price;
                agent.add_food(1);
                agent.gain_intel(cfg.intel_per_trade);
                ledger.push(&agent.name, self.rewards.buy_food_reserve, reason::BUY_FOOD_RESERVE);
            }

            let low_health = agent.health <= cfg.eat_health_threshold;
            let low_energy = agent.energy <= cfg.eat_energy_threshold;
            if agent.food > 0 && (low_health || low_energy) {
                agent.food -= 1;
                agent.heal(cfg.food_heal);
                agent.restore_energy(cfg.food_energy);
                agent.gain_intel(cfg.intel_per_trade);
                ledger.push(&agent.name, self.rewards.eat_food_delayed, reason::EAT_FOOD_DELAYED);
            }
        }

        if world.recharge().contains(agent.position) {
            let before = agent.energy;
            agent.energy = (agent.energy + cfg.recharge_rate * dt).clamp(0.0, MAX_VITAL);
            if agent.energy > before {
                ledger.push(&agent.name, self.rewards.recharge, reason::RECHARGE);
            }
        }

        if agent.food >= 1
            && agent.health > cfg.eat_health_threshold
            && agent.energy > cfg.eat_energy_threshold
        {
            ledger.push(
                &agent.name,
                self.rewards.maintain_food_reserve,
                reason::MAINTAIN_FOOD_RESERVE,
            );
        }
    }

    /// Pick up every coin within reach. Each coin is removed before its reward is granted.
    pub fn collect_coins(
        &self,
        tick: u64,
        agent: &mut Agent,
        coins: &mut Vec<Coin>,
        ledger: &mut RewardLedger,
        events: &mut Vec<SimEvent>,
    ) {
        let reach2 = self.config.coin_pickup_radius * self.config.coin_pickup_radius;
        let mut i = 0;
        while i < coins.len() {
            if agent.position.distance_squared(coins[i].position) > reach2 {
                i += 1;
                continue;
            }
            coins.remove(i);
            agent.coins += 1;
            agent.performance += self.config.coin_performance;
            agent.gain_intel(self.config.coin_intel);
            ledger.push(&agent.name, self.rewards.collect_coin, reason::COLLECT_COIN);
            events.push(SimEvent::new(
                tick,
                SimEventKind::CoinCollected,
                Some(&agent.name),
                format!("coins={}", agent.coins),
            ));
        }
    }
}
