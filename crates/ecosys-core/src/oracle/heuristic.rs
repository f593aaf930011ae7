//! In-process rule-based oracle.
//!
//! A fixed policy with no learning: rewards are tallied for inspection and saving, never
//! fed back into decisions.
//!
//! Priorities per agent: recharge when nearly out of energy, visit the store when a
//! meal or a purchase is due, chase the nearest coin while short of the food price,
//! otherwise drift or wander on a per-agent random stream.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ecosys_protocol::{
    CoinView, Decision, InitRequest, InitResponse, PlayerView, RewardEvent, TickRequest,
    TickResponse, ZoneRect,
};
use serde::{Deserialize, Serialize};

use super::{Oracle, OracleError};
use crate::math::Vec2;
use crate::rng::{derive_seed, DeterministicRng, SplitMix64};

const SPEED: f32 = 155.0;
const LOW_ENERGY: f32 = 15.0;
/// Number of discrete fallback actions: idle, 8 drift directions, wander, and idle fillers.
const ACTION_COUNT: usize = 17;
const WANDER_ACTION: usize = 14;

const DRIFT: [(f32, f32); 8] = [
    (0.0, -1.0),
    (0.0, 1.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (-1.0, -1.0),
    (1.0, -1.0),
    (-1.0, 1.0),
    (1.0, 1.0),
];

/// Reward totals received for one agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardTally {
    pub total: f64,
    pub events: u64,
    pub by_reason: BTreeMap<String, f64>,
}

impl RewardTally {
    fn record(&mut self, value: f64, reason: &str) {
        self.total += value;
        self.events += 1;
        *self.by_reason.entry(reason.to_string()).or_default() += value;
    }
}

#[derive(Serialize)]
struct SavedState<'a> {
    saved_at: DateTime<Utc>,
    tick: u64,
    food_price: u32,
    agents: &'a BTreeMap<String, RewardTally>,
}

pub struct HeuristicOracle {
    seed: u64,
    food_price: u32,
    save_path: Option<PathBuf>,
    autosave_every: Option<u64>,
    last_tick: u64,
    streams: BTreeMap<String, SplitMix64>,
    tallies: BTreeMap<String, RewardTally>,
}

impl HeuristicOracle {
    pub fn new(seed: u64, food_price: u32) -> Self {
        Self {
            seed,
            food_price,
            save_path: None,
            autosave_every: None,
            last_tick: 0,
            streams: BTreeMap::new(),
            tallies: BTreeMap::new(),
        }
    }

    /// Write reward tallies to `path` on save, and every `autosave_every` ticks if set.
    pub fn with_save_path(mut self, path: impl AsRef<Path>, autosave_every: Option<u64>) -> Self {
        self.save_path = Some(path.as_ref().to_path_buf());
        self.autosave_every = autosave_every.filter(|n| *n > 0);
        self
    }

    pub fn tally(&self, agent: &str) -> Option<&RewardTally> {
        self.tallies.get(agent)
    }

    fn stream(&mut self, name: &str) -> &mut SplitMix64 {
        let seed = self.seed;
        self.streams
            .entry(name.to_string())
            .or_insert_with(|| SplitMix64::new(derive_seed(seed, name_seed(name), 0)))
    }

    fn decide(
        &mut self,
        name: &str,
        p: &PlayerView,
        coins: &[CoinView],
        store: ZoneRect,
        recharge: ZoneRect,
    ) -> Decision {
        let here = Vec2::new(p.x, p.y);
        let price = self.food_price;

        let needs_store = (p.coins >= price && (p.health < 85.0 || p.energy < 70.0))
            || (p.food > 0 && (p.health < 80.0 || p.energy < 80.0));

        let (velocity, intent) = if p.energy < LOW_ENERGY {
            (toward(here, zone_center(recharge)), "recharge")
        } else if needs_store {
            (toward(here, zone_center(store)), "go_store")
        } else if let Some(coin) = nearest_coin(here, coins).filter(|_| p.coins < price) {
            (toward(here, coin), "seek_coin")
        } else {
            let rng = self.stream(name);
            match rng.index(ACTION_COUNT) {
                a @ 1..=8 => {
                    let (dx, dy) = DRIFT[a - 1];
                    (Vec2::new(dx, dy) * SPEED, "drift")
                }
                WANDER_ACTION => {
                    let angle = rng.next_f32_unit() * std::f32::consts::TAU;
                    (Vec2::new(angle.cos(), angle.sin()) * SPEED, "wander")
                }
                _ => (Vec2::ZERO, "idle"),
            }
        };

        Decision {
            vx: velocity.x,
            vy: velocity.y,
            hud: format!(
                "{} | H:{} E:{} C:{} F:{} P:{} Act:{}",
                name, p.health as i32, p.energy as i32, p.coins, p.food, p.perf as i32, intent
            ),
            intent: intent.to_string(),
        }
    }

    fn write_save(&self, path: &Path) -> Result<(), OracleError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let state = SavedState {
            saved_at: Utc::now(),
            tick: self.last_tick,
            food_price: self.food_price,
            agents: &self.tallies,
        };
        let json = serde_json::to_string_pretty(&state)
            .map_err(|e| OracleError::Failed(format!("serialize save: {e}")))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl Oracle for HeuristicOracle {
    fn init(&mut self, request: &InitRequest) -> Result<InitResponse, OracleError> {
        for name in &request.players {
            self.stream(name);
            self.tallies.entry(name.clone()).or_default();
        }
        Ok(InitResponse { ok: true })
    }

    fn tick(&mut self, request: &TickRequest) -> Result<TickResponse, OracleError> {
        self.last_tick = request.tick;
        let mut decisions = BTreeMap::new();
        for (name, player) in &request.players {
            let decision = self.decide(name, player, &request.coins, request.store, request.recharge);
            decisions.insert(name.clone(), decision);
        }

        if let Some(every) = self.autosave_every {
            if request.tick % every == 0 {
                if let Err(err) = self.save() {
                    tracing::warn!(tick = request.tick, error = %err, "autosave failed");
                }
            }
        }

        Ok(TickResponse {
            ok: true,
            decisions,
        })
    }

    fn reward(&mut self, event: &RewardEvent) -> Result<(), OracleError> {
        self.tallies
            .entry(event.name.clone())
            .or_default()
            .record(event.value, &event.reason);
        Ok(())
    }

    fn save(&mut self) -> Result<(), OracleError> {
        match &self.save_path {
            Some(path) => self.write_save(path),
            None => Ok(()),
        }
    }
}

fn name_seed(name: &str) -> u64 {
    name.bytes().map(u64::from).sum()
}

fn zone_center(zone: ZoneRect) -> Vec2 {
    Vec2::new(zone.x + zone.w * 0.5, zone.y + zone.h * 0.5)
}

fn toward(from: Vec2, to: Vec2) -> Vec2 {
    let delta = to - from;
    let len = delta.length();
    if len == 0.0 {
        Vec2::ZERO
    } else {
        delta / len * SPEED
    }
}

fn nearest_coin(from: Vec2, coins: &[CoinView]) -> Option<Vec2> {
    coins
        .iter()
        .map(|c| Vec2::new(c.x, c.y))
        .min_by(|a, b| from.distance_squared(*a).total_cmp(&from.distance_squared(*b)))
}
