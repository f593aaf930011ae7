//! Simulation configuration loading and management.
//!
//! Every field has a default, so an empty YAML document (or no file at all) yields the
//! reference tuning: a 2048x2048 world, 25 agents and the reference reward magnitudes.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::world::Rect;

/// Top-level configuration, usually loaded from `ecosys.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for every random draw the engine makes
    pub seed: u64,
    pub world: WorldConfig,
    pub agents: AgentsConfig,
    pub clock: ClockConfig,
    pub steering: SteeringConfig,
    pub lifecycle: LifecycleConfig,
    pub economy: EconomyConfig,
    pub crates: CrateConfig,
    /// Reward shaping magnitudes sent to the oracle
    pub rewards: RewardConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 1337,
            world: WorldConfig::default(),
            agents: AgentsConfig::default(),
            clock: ClockConfig::default(),
            steering: SteeringConfig::default(),
            lifecycle: LifecycleConfig::default(),
            economy: EconomyConfig::default(),
            crates: CrateConfig::default(),
            rewards: RewardConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    /// Load from `path` when it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config")
    }
}

/// Static world geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub store: Rect,
    pub recharge: Rect,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 2048.0,
            height: 2048.0,
            store: Rect::new(0.0, 0.0, 360.0, 360.0),
            recharge: Rect::new(2048.0 - 360.0, 0.0, 360.0, 360.0),
        }
    }
}

/// Who lives in the world and where they start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    pub count: usize,
    pub name_prefix: String,
    /// Columns of the starting grid
    pub columns: usize,
    /// Explicit names; overrides `count` and `name_prefix` when non-empty
    pub names: Vec<String>,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            count: 25,
            name_prefix: "Player".to_string(),
            columns: 5,
            names: Vec::new(),
        }
    }
}

impl AgentsConfig {
    /// Agent names in creation order.
    pub fn resolve_names(&self) -> Vec<String> {
        if !self.names.is_empty() {
            return self.names.clone();
        }
        (1..=self.count)
            .map(|i| format!("{}{}", self.name_prefix, i))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Fixed step length in seconds
    pub dt: f64,
    /// Longest frame the accumulator will accept
    pub max_frame: f64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            max_frame: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    pub separation_radius: f32,
    pub separation_strength: f32,
    /// Cap on separation acceleration (units/s^2)
    pub max_accel: f32,
    /// Cap on final velocity (units/s)
    pub max_speed: f32,
    /// Pairs closer than this are skipped
    pub min_distance: f32,
    pub boost_multiplier: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            separation_radius: 80.0,
            separation_strength: 320.0,
            max_accel: 600.0,
            max_speed: 220.0,
            min_distance: 1.0,
            boost_multiplier: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub base_energy_drain: f32,
    /// Fraction of drain removed at intel 100
    pub intel_drain_relief: f32,
    pub min_stamina_factor: f32,
    pub health_drain: f32,
    /// Health drain while energy is exhausted
    pub starving_health_drain: f32,
    pub respawn_health: f32,
    pub respawn_energy: f32,
    pub death_coin_penalty: u32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            base_energy_drain: 4.0,
            intel_drain_relief: 0.12,
            min_stamina_factor: 0.7,
            health_drain: 1.0,
            starving_health_drain: 6.0,
            respawn_health: 100.0,
            respawn_energy: 60.0,
            death_coin_penalty: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub food_price: u32,
    pub max_food_reserve: u32,
    /// Intel needed per extra unit of food reserve
    pub intel_per_reserve_step: f32,
    pub eat_health_threshold: f32,
    pub eat_energy_threshold: f32,
    pub food_heal: f32,
    pub food_energy: f32,
    /// Energy per second inside the recharge zone
    pub recharge_rate: f32,
    pub intel_per_trade: f32,
    pub coin_pickup_radius: f32,
    pub coin_intel: f32,
    pub coin_performance: f32,
    /// Manually placed coins are kept this far from the edges
    pub coin_margin: f32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            food_price: 5,
            max_food_reserve: 3,
            intel_per_reserve_step: 40.0,
            eat_health_threshold: 70.0,
            eat_energy_threshold: 60.0,
            food_heal: 25.0,
            food_energy: 20.0,
            recharge_rate: 30.0,
            intel_per_trade: 0.5,
            coin_pickup_radius: 40.0,
            coin_intel: 0.25,
            coin_performance: 0.5,
            coin_margin: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrateConfig {
    /// Seconds before the first automatic spawn
    pub first_spawn_delay: f64,
    pub min_interval: f64,
    pub max_interval: f64,
    /// Edge margin for timer spawns
    pub spawn_margin: f32,
    /// Edge margin for manual placement
    pub manual_margin: f32,
    pub pickup_radius: f32,
    pub coin_bundle: u32,
    pub heal_amount: f32,
    pub speed_boost_seconds: f32,
    pub coin_bundle_performance: f32,
    pub performance: f32,
}

impl Default for CrateConfig {
    fn default() -> Self {
        Self {
            first_spawn_delay: 10.0,
            min_interval: 12.0,
            max_interval: 22.0,
            spawn_margin: 60.0,
            manual_margin: 20.0,
            pickup_radius: 45.0,
            coin_bundle: 3,
            heal_amount: 30.0,
            speed_boost_seconds: 8.0,
            coin_bundle_performance: 1.0,
            performance: 0.8,
        }
    }
}

/// Reward magnitudes. `too_close` is scaled by the neighbour weight and sent negated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub buy_food_reserve: f64,
    pub eat_food_delayed: f64,
    pub recharge: f64,
    pub maintain_food_reserve: f64,
    pub too_close: f64,
    pub death: f64,
    pub collect_coin: f64,
    pub crate_coins: f64,
    pub crate_food: f64,
    pub crate_speed: f64,
    pub crate_heal: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            buy_food_reserve: 0.8,
            eat_food_delayed: 1.0,
            recharge: 0.2,
            maintain_food_reserve: 0.02,
            too_close: 0.02,
            death: -2.0,
            collect_coin: 1.0,
            crate_coins: 1.2,
            crate_food: 1.0,
            crate_speed: 0.8,
            crate_heal: 0.8,
        }
    }
}
