//! World model: static geometry plus the dynamic entity lists.
//!
//! Pure data. Stages in [`crate::sim`] mutate it; nothing here has behaviour beyond
//! construction, lookup and clamping helpers.

use ecosys_protocol::{Bounds, ZoneRect};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{AgentsConfig, WorldConfig};
use crate::math::Vec2;

pub const MAX_VITAL: f32 = 100.0;
pub const MAX_INTEL: f32 = 100.0;
pub const MAX_FOOD: u32 = 9;

#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error("world bounds must be positive, got {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },

    #[error("{zone} zone lies outside the world bounds")]
    ZoneOutOfBounds { zone: &'static str },

    #[error("store and recharge zones overlap")]
    ZonesOverlap,

    #[error("world has no agents")]
    NoAgents,

    #[error("agent name must not be empty")]
    EmptyAgentName,

    #[error("duplicate agent name: {0}")]
    DuplicateAgent(String),
}

/// Axis-aligned rectangle; containment is inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Positive-area intersection. Rectangles sharing only an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    fn within(&self, width: f32, height: f32) -> bool {
        self.w >= 0.0
            && self.h >= 0.0
            && self.x >= 0.0
            && self.y >= 0.0
            && self.x + self.w <= width
            && self.y + self.h <= height
    }
}

impl From<Rect> for ZoneRect {
    fn from(r: Rect) -> Self {
        ZoneRect {
            x: r.x,
            y: r.y,
            w: r.w,
            h: r.h,
        }
    }
}

/// Immutable for the process lifetime once validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldGeometry {
    width: f32,
    height: f32,
    store: Rect,
    recharge: Rect,
}

impl WorldGeometry {
    pub fn new(width: f32, height: f32, store: Rect, recharge: Rect) -> Result<Self, WorldError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(WorldError::InvalidBounds { width, height });
        }
        if !store.within(width, height) {
            return Err(WorldError::ZoneOutOfBounds { zone: "store" });
        }
        if !recharge.within(width, height) {
            return Err(WorldError::ZoneOutOfBounds { zone: "recharge" });
        }
        if store.overlaps(&recharge) {
            return Err(WorldError::ZonesOverlap);
        }
        Ok(Self {
            width,
            height,
            store,
            recharge,
        })
    }

    pub fn from_config(config: &WorldConfig) -> Result<Self, WorldError> {
        Self::new(config.width, config.height, config.store, config.recharge)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn store(&self) -> Rect {
        self.store
    }

    pub fn recharge(&self) -> Rect {
        self.recharge
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            w: self.width,
            h: self.height,
        }
    }

    /// Clamp into `[0, W] x [0, H]`.
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        self.clamp_with_margin(p, 0.0)
    }

    /// Clamp into the world shrunk by `margin` on every side. A margin wider than half
    /// the world collapses onto the centre line; a NaN coordinate lands on it too.
    pub fn clamp_with_margin(&self, p: Vec2, margin: f32) -> Vec2 {
        let mx = margin.clamp(0.0, self.width * 0.5);
        let my = margin.clamp(0.0, self.height * 0.5);
        Vec2::new(
            clamp_axis(p.x, mx, self.width - mx),
            clamp_axis(p.y, my, self.height - my),
        )
    }
}

fn clamp_axis(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_nan() {
        (lo + hi) * 0.5
    } else {
        v.clamp(lo, hi)
    }
}

/// A named participant. Created at world-init and reset in place on death, never removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub name: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub health: f32,
    pub energy: f32,
    pub coins: u32,
    pub food: u32,
    pub intel: f32,
    pub performance: f32,
    pub deaths: u32,
    /// Seconds left on the speed multiplier
    pub speed_boost: f32,
    pub hud: String,
    pub intent: String,
    /// Transient pickup message, cleared on death
    pub status: String,
}

impl Agent {
    pub fn new(name: impl Into<String>, position: Vec2) -> Self {
        Self {
            name: name.into(),
            position,
            velocity: Vec2::ZERO,
            health: MAX_VITAL,
            energy: MAX_VITAL,
            coins: 0,
            food: 0,
            intel: 0.0,
            performance: 0.0,
            deaths: 0,
            speed_boost: 0.0,
            hud: String::new(),
            intent: String::new(),
            status: String::new(),
        }
    }

    pub fn gain_intel(&mut self, amount: f32) {
        self.intel = (self.intel + amount).clamp(0.0, MAX_INTEL);
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).clamp(0.0, MAX_VITAL);
    }

    pub fn restore_energy(&mut self, amount: f32) {
        self.energy = (self.energy + amount).clamp(0.0, MAX_VITAL);
    }

    pub fn add_food(&mut self, amount: u32) {
        self.food = self.food.saturating_add(amount).min(MAX_FOOD);
    }

    /// HUD text with the transient status appended, as shown on hover.
    pub fn display_hud(&self) -> String {
        if self.status.is_empty() {
            self.hud.clone()
        } else {
            format!("{} [{}]", self.hud, self.status)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coin {
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrateKind {
    SmallCoinBundle,
    FoodRation,
    SpeedBoost,
    HealBurst,
}

impl CrateKind {
    pub const ALL: [CrateKind; 4] = [
        CrateKind::SmallCoinBundle,
        CrateKind::FoodRation,
        CrateKind::SpeedBoost,
        CrateKind::HealBurst,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CrateKind::SmallCoinBundle => "small_coin_bundle",
            CrateKind::FoodRation => "food_ration",
            CrateKind::SpeedBoost => "speed_boost",
            CrateKind::HealBurst => "heal_burst",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crate {
    pub position: Vec2,
    pub kind: CrateKind,
}

/// Everything the fixed-step pipeline reads and writes.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub world: WorldGeometry,
    pub agents: Vec<Agent>,
    pub coins: Vec<Coin>,
    pub crates: Vec<Crate>,
    /// Last completed tick; 0 before the first step
    pub tick: u64,
}

impl SimulationState {
    /// Build the world and lay agents out on the starting grid.
    pub fn new(world: WorldGeometry, names: &[String], columns: usize) -> Result<Self, WorldError> {
        if names.is_empty() {
            return Err(WorldError::NoAgents);
        }
        let mut seen = std::collections::BTreeSet::new();
        for name in names {
            if name.is_empty() {
                return Err(WorldError::EmptyAgentName);
            }
            if !seen.insert(name.as_str()) {
                return Err(WorldError::DuplicateAgent(name.clone()));
            }
        }

        let agents = names
            .iter()
            .enumerate()
            .map(|(i, name)| Agent::new(name.clone(), grid_position(&world, i, names.len(), columns)))
            .collect();

        Ok(Self {
            world,
            agents,
            coins: Vec::new(),
            crates: Vec::new(),
            tick: 0,
        })
    }

    pub fn from_config(world: &WorldConfig, agents: &AgentsConfig) -> Result<Self, WorldError> {
        let geometry = WorldGeometry::from_config(world)?;
        Self::new(geometry, &agents.resolve_names(), agents.columns)
    }

    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.name == name)
    }

    pub fn agent_mut(&mut self, name: &str) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.name == name)
    }

    pub fn agent_names(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.name.clone()).collect()
    }
}

/// Starting grid: 200 units in from the sides, 300 from top and bottom.
fn grid_position(world: &WorldGeometry, index: usize, count: usize, columns: usize) -> Vec2 {
    let columns = columns.max(1);
    let rows = count.div_ceil(columns).max(1);
    let col = (index % columns) as f32;
    let row = (index / columns) as f32;

    let x_step = if columns > 1 {
        (world.width() - 400.0) / (columns - 1) as f32
    } else {
        0.0
    };
    let y_step = if rows > 1 {
        (world.height() - 600.0) / (rows - 1) as f32
    } else {
        0.0
    };
    world.clamp(Vec2::new(200.0 + col * x_step, 300.0 + row * y_step))
}
