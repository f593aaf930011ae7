use ecosys_core::config::{LifecycleConfig, RewardConfig};
use ecosys_core::observability::SimEventKind;
use ecosys_core::reward::reason;
use ecosys_core::{Agent, Lifecycle, RewardLedger, Vec2};

const CENTER: Vec2 = Vec2::new(1024.0, 1024.0);

fn lifecycle() -> Lifecycle {
    Lifecycle::new(LifecycleConfig::default(), &RewardConfig::default())
}

fn agent() -> Agent {
    Agent::new("Player1", Vec2::new(300.0, 400.0))
}

#[test]
fn stamina_factor_falls_with_intel_down_to_the_floor() {
    let lifecycle = lifecycle();
    assert_eq!(lifecycle.stamina_factor(0.0), 1.0);
    assert!((lifecycle.stamina_factor(100.0) - 0.88).abs() < 1e-6);

    let steep = Lifecycle::new(
        LifecycleConfig {
            intel_drain_relief: 0.5,
            ..LifecycleConfig::default()
        },
        &RewardConfig::default(),
    );
    assert_eq!(steep.stamina_factor(100.0), 0.7);
}

#[test]
fn drains_energy_then_health() {
    let mut agent = agent();
    let mut ledger = RewardLedger::new();

    let died = lifecycle().decay(&mut agent, 1.0, CENTER, &mut ledger);

    assert!(!died);
    assert_eq!(agent.energy, 96.0);
    assert_eq!(agent.health, 99.0);
    assert!(ledger.is_empty());
}

#[test]
fn starving_agents_lose_health_faster() {
    let mut agent = agent();
    agent.energy = 0.0;
    let mut ledger = RewardLedger::new();

    lifecycle().decay(&mut agent, 0.5, CENTER, &mut ledger);

    assert_eq!(agent.energy, 0.0);
    assert_eq!(agent.health, 97.0);
}

#[test]
fn death_resets_the_agent_in_place() {
    let mut agent = agent();
    agent.health = 0.05;
    agent.energy = 0.0;
    agent.coins = 3;
    agent.velocity = Vec2::new(50.0, -20.0);
    agent.status = "CRATE: +1 food".to_string();
    agent.intel = 12.0;
    let mut ledger = RewardLedger::new();

    let died = lifecycle().decay(&mut agent, 1.0 / 60.0, CENTER, &mut ledger);

    assert!(died);
    assert_eq!(agent.deaths, 1);
    assert_eq!(agent.position, CENTER);
    assert_eq!(agent.velocity, Vec2::ZERO);
    assert_eq!(agent.health, 100.0);
    assert_eq!(agent.energy, 60.0);
    assert_eq!(agent.coins, 2);
    assert!(agent.status.is_empty());
    assert_eq!(agent.intel, 12.0);
    assert_eq!(ledger.total("Player1", reason::DEATH), -2.0);
}

#[test]
fn death_penalty_never_goes_below_zero_coins() {
    let mut agent = agent();
    agent.health = 0.01;
    let mut ledger = RewardLedger::new();

    assert!(lifecycle().decay(&mut agent, 1.0, CENTER, &mut ledger));
    assert_eq!(agent.coins, 0);
}

#[test]
fn speed_boost_counts_down_to_zero() {
    let mut agent = agent();
    agent.speed_boost = 8.0;
    let mut ledger = RewardLedger::new();

    lifecycle().decay(&mut agent, 0.5, CENTER, &mut ledger);
    assert_eq!(agent.speed_boost, 7.5);

    agent.speed_boost = 0.25;
    lifecycle().decay(&mut agent, 0.5, CENTER, &mut ledger);
    assert_eq!(agent.speed_boost, 0.0);
}

#[test]
fn step_reports_each_death_as_an_event() {
    let mut agents = vec![agent(), Agent::new("Player2", Vec2::new(10.0, 10.0))];
    agents[1].health = 0.01;
    let mut ledger = RewardLedger::new();
    let mut events = Vec::new();

    lifecycle().step(42, 1.0, &mut agents, CENTER, &mut ledger, &mut events);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, SimEventKind::Death);
    assert_eq!(events[0].agent.as_deref(), Some("Player2"));
    assert_eq!(events[0].tick, 42);
    assert_eq!(agents[0].deaths, 0);
    assert_eq!(agents[1].deaths, 1);
}
