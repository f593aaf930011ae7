use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Bounds, CoinView, PlayerView, ZoneRect};

/// Sent once at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InitRequest {
    pub bounds: Bounds,
    pub store: ZoneRect,
    pub recharge: ZoneRect,
    pub players: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InitResponse {
    #[serde(default)]
    pub ok: bool,
}

/// World snapshot for one simulation step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickRequest {
    pub tick: u64,
    pub dt: f32,
    pub bounds: Bounds,
    pub store: ZoneRect,
    pub recharge: ZoneRect,
    pub coins: Vec<CoinView>,
    pub players: BTreeMap<String, PlayerView>,
}

/// Oracle answer to a [`TickRequest`].
///
/// `decisions` is required: a response without it is malformed, not empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TickResponse {
    #[serde(default)]
    pub ok: bool,
    pub decisions: BTreeMap<String, Decision>,
}

/// Movement intent and display text for one agent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    #[serde(default)]
    pub vx: f32,
    #[serde(default)]
    pub vy: f32,
    #[serde(default)]
    pub hud: String,
    #[serde(default)]
    pub intent: String,
}

/// Shaped reward signal. Negative values are penalties.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RewardEvent {
    pub name: String,
    pub value: f64,
    pub reason: String,
}

impl RewardEvent {
    pub fn new(name: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            reason: reason.into(),
        }
    }
}

/// Envelope for out-of-process oracles. Serialized with an `op` tag:
/// `{"op":"tick","tick":1,...}`, `{"op":"save"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OracleCall {
    Init(InitRequest),
    Tick(TickRequest),
    Reward(RewardEvent),
    Save,
}
