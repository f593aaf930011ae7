use std::collections::BTreeMap;

use ecosys_protocol::{
    Decision, InitRequest, InitResponse, RewardEvent, TickRequest, TickResponse,
};

use super::{Oracle, OracleError};

/// How a scripted tick should misbehave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFailure {
    /// Transport-level error.
    Error,
    /// Well-formed response with `ok: false`.
    NotOk,
}

/// Oracle that replays fixed decisions and records every call it receives.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    decisions: BTreeMap<String, Decision>,
    per_tick: BTreeMap<u64, BTreeMap<String, Decision>>,
    failures: BTreeMap<u64, TickFailure>,
    reject_init: bool,
    fail_init: bool,
    fail_rewards: bool,
    fail_save: bool,

    pub init_requests: Vec<InitRequest>,
    pub last_request: Option<TickRequest>,
    pub ticks_seen: Vec<u64>,
    pub rewards: Vec<RewardEvent>,
    pub saves: usize,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decision returned for `agent` on every tick without an override.
    pub fn with_decision(mut self, agent: &str, decision: Decision) -> Self {
        self.decisions.insert(agent.to_string(), decision);
        self
    }

    /// Decision returned for `agent` only on `tick`.
    pub fn with_decision_at(mut self, tick: u64, agent: &str, decision: Decision) -> Self {
        self.per_tick
            .entry(tick)
            .or_default()
            .insert(agent.to_string(), decision);
        self
    }

    pub fn failing_at(mut self, tick: u64, failure: TickFailure) -> Self {
        self.failures.insert(tick, failure);
        self
    }

    pub fn rejecting_init(mut self) -> Self {
        self.reject_init = true;
        self
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn failing_rewards(mut self) -> Self {
        self.fail_rewards = true;
        self
    }

    pub fn failing_save(mut self) -> Self {
        self.fail_save = true;
        self
    }

    pub fn rewards_for<'a>(&'a self, agent: &'a str) -> impl Iterator<Item = &'a RewardEvent> + 'a {
        self.rewards.iter().filter(move |r| r.name == agent)
    }
}

impl Oracle for ScriptedOracle {
    fn init(&mut self, request: &InitRequest) -> Result<InitResponse, OracleError> {
        self.init_requests.push(request.clone());
        if self.fail_init {
            return Err(OracleError::Failed("scripted init failure".into()));
        }
        Ok(InitResponse {
            ok: !self.reject_init,
        })
    }

    fn tick(&mut self, request: &TickRequest) -> Result<TickResponse, OracleError> {
        self.ticks_seen.push(request.tick);
        self.last_request = Some(request.clone());

        match self.failures.get(&request.tick) {
            Some(TickFailure::Error) => {
                return Err(OracleError::Failed(format!(
                    "scripted failure at tick {}",
                    request.tick
                )))
            }
            Some(TickFailure::NotOk) => {
                return Ok(TickResponse {
                    ok: false,
                    decisions: BTreeMap::new(),
                })
            }
            None => {}
        }

        let mut decisions = self.decisions.clone();
        if let Some(overrides) = self.per_tick.get(&request.tick) {
            decisions.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        Ok(TickResponse {
            ok: true,
            decisions,
        })
    }

    fn reward(&mut self, event: &RewardEvent) -> Result<(), OracleError> {
        self.rewards.push(event.clone());
        if self.fail_rewards {
            return Err(OracleError::Failed("scripted reward failure".into()));
        }
        Ok(())
    }

    fn save(&mut self) -> Result<(), OracleError> {
        self.saves += 1;
        if self.fail_save {
            return Err(OracleError::Failed("scripted save failure".into()));
        }
        Ok(())
    }
}
