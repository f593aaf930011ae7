use serde::{Deserialize, Serialize};

/// World extent. The playable area is `[0, w] x [0, h]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub w: f32,
    pub h: f32,
}

/// Axis-aligned zone rectangle as seen by the oracle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoinView {
    pub x: f32,
    pub y: f32,
}

/// Per-agent observation sent with every tick.
///
/// Only the fields the oracle is allowed to see; lifecycle counters and display
/// state stay inside the engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub health: f32,
    pub energy: f32,
    pub coins: u32,
    pub food: u32,
    pub intel: f32,
    pub perf: f32,
}
