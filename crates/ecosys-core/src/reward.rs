//! Reward events gathered during a tick and forwarded to the oracle at its end.

use ecosys_protocol::RewardEvent;

/// Reason codes understood by oracles.
pub mod reason {
    pub const BUY_FOOD_RESERVE: &str = "buy_food_reserve";
    pub const EAT_FOOD_DELAYED: &str = "eat_food_delayed";
    pub const RECHARGE: &str = "recharge";
    pub const MAINTAIN_FOOD_RESERVE: &str = "maintain_food_reserve";
    pub const TOO_CLOSE: &str = "too_close";
    pub const DEATH: &str = "death";
    pub const COLLECT_COIN: &str = "collect_coin";
    pub const CRATE_COINS: &str = "crate_coins3";
    pub const CRATE_FOOD: &str = "crate_food1";
    pub const CRATE_SPEED: &str = "crate_speed";
    pub const CRATE_HEAL: &str = "crate_heal30";
}

#[derive(Debug, Clone, Default)]
pub struct RewardLedger {
    events: Vec<RewardEvent>,
}

impl RewardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, agent: &str, value: f64, reason: &str) {
        self.events.push(RewardEvent::new(agent, value, reason));
    }

    pub fn events(&self) -> &[RewardEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Sum of values for one agent and reason.
    pub fn total(&self, agent: &str, reason: &str) -> f64 {
        self.matching(agent, reason).map(|e| e.value).sum()
    }

    pub fn count(&self, agent: &str, reason: &str) -> usize {
        self.matching(agent, reason).count()
    }

    fn matching<'a>(
        &'a self,
        agent: &'a str,
        reason: &'a str,
    ) -> impl Iterator<Item = &'a RewardEvent> + 'a {
        self.events
            .iter()
            .filter(move |e| e.name == agent && e.reason == reason)
    }
}
