use ecosys_core::config::{EconomyConfig, RewardConfig, WorldConfig};
use ecosys_core::observability::SimEventKind;
use ecosys_core::reward::reason;
use ecosys_core::{Agent, Coin, Economy, RewardLedger, Vec2, WorldGeometry};

const DT: f32 = 1.0 / 60.0;

fn world() -> WorldGeometry {
    WorldGeometry::from_config(&WorldConfig::default()).unwrap()
}

fn economy() -> Economy {
    Economy::new(EconomyConfig::default(), &RewardConfig::default())
}

fn agent_at(position: Vec2) -> Agent {
    Agent::new("Player1", position)
}

fn in_store() -> Agent {
    agent_at(world().store().center())
}

#[test]
fn buys_food_when_below_reserve() {
    let mut agent = in_store();
    agent.coins = 5;
    let mut ledger = RewardLedger::new();

    economy().apply_transactions(&mut agent, &world(), DT, &mut ledger);

    assert_eq!(agent.coins, 0);
    assert_eq!(agent.food, 1);
    assert_eq!(agent.intel, 0.5);
    assert_eq!(ledger.count("Player1", reason::BUY_FOOD_RESERVE), 1);
    assert_eq!(ledger.total("Player1", reason::BUY_FOOD_RESERVE), 0.8);
    assert_eq!(ledger.count("Player1", reason::EAT_FOOD_DELAYED), 0);
}

#[test]
fn eats_when_health_is_low() {
    let mut agent = in_store();
    agent.health = 50.0;
    agent.food = 1;
    let mut ledger = RewardLedger::new();

    economy().apply_transactions(&mut agent, &world(), DT, &mut ledger);

    assert_eq!(agent.food, 0);
    assert_eq!(agent.health, 75.0);
    assert_eq!(agent.energy, 100.0);
    assert_eq!(agent.intel, 0.5);
    assert_eq!(ledger.total("Player1", reason::EAT_FOOD_DELAYED), 1.0);
    assert_eq!(ledger.count("Player1", reason::BUY_FOOD_RESERVE), 0);
    assert_eq!(ledger.count("Player1", reason::MAINTAIN_FOOD_RESERVE), 0);
}

#[test]
fn buy_and_eat_can_fire_in_one_tick() {
    let mut agent = in_store();
    agent.coins = 7;
    agent.energy = 40.0;
    let mut ledger = RewardLedger::new();

    economy().apply_transactions(&mut agent, &world(), DT, &mut ledger);

    assert_eq!(agent.coins, 2);
    assert_eq!(agent.food, 0);
    assert_eq!(agent.energy, 60.0);
    assert_eq!(agent.intel, 1.0);
    let reasons: Vec<&str> = ledger.events().iter().map(|e| e.reason.as_str()).collect();
    assert_eq!(reasons, [reason::BUY_FOOD_RESERVE, reason::EAT_FOOD_DELAYED]);
}

#[test]
fn reserve_target_grows_with_intel_and_caps_at_three() {
    let economy = economy();
    assert_eq!(economy.reserve_target(0.0), 1);
    assert_eq!(economy.reserve_target(39.9), 1);
    assert_eq!(economy.reserve_target(40.0), 2);
    assert_eq!(economy.reserve_target(80.0), 3);
    assert_eq!(economy.reserve_target(100.0), 3);

    let mut agent = in_store();
    agent.coins = 10;
    agent.food = 1;
    agent.intel = 45.0;
    let mut ledger = RewardLedger::new();
    economy.apply_transactions(&mut agent, &world(), DT, &mut ledger);
    assert_eq!(agent.food, 2);
    assert_eq!(agent.coins, 5);

    // reserve satisfied, nothing more to buy
    economy.apply_transactions(&mut agent, &world(), DT, &mut ledger);
    assert_eq!(agent.food, 2);
    assert_eq!(agent.coins, 5);
}

#[test]
fn recharge_rewards_only_actual_gain() {
    let world = world();
    let mut agent = agent_at(world.recharge().center());
    agent.energy = 50.0;
    let mut ledger = RewardLedger::new();

    economy().apply_transactions(&mut agent, &world, 0.5, &mut ledger);
    assert_eq!(agent.energy, 65.0);
    assert_eq!(ledger.total("Player1", reason::RECHARGE), 0.2);

    ledger.clear();
    agent.energy = 100.0;
    economy().apply_transactions(&mut agent, &world, 0.5, &mut ledger);
    assert_eq!(agent.energy, 100.0);
    assert!(ledger.is_empty());
}

#[test]
fn outside_zones_only_the_maintenance_bonus_fires() {
    let world = world();
    let mut agent = agent_at(world.center());
    agent.coins = 12;
    let before = agent.clone();
    let mut ledger = RewardLedger::new();

    economy().apply_transactions(&mut agent, &world, DT, &mut ledger);
    economy().apply_transactions(&mut agent, &world, DT, &mut ledger);
    assert_eq!(agent, before);
    assert!(ledger.is_empty());

    agent.food = 1;
    let before = agent.clone();
    economy().apply_transactions(&mut agent, &world, DT, &mut ledger);
    economy().apply_transactions(&mut agent, &world, DT, &mut ledger);
    assert_eq!(agent, before);
    assert_eq!(ledger.count("Player1", reason::MAINTAIN_FOOD_RESERVE), 2);
    assert_eq!(ledger.len(), 2);
}

#[test]
fn coins_within_reach_are_collected_once() {
    let mut agent = agent_at(Vec2::new(1000.0, 1000.0));
    let mut coins = vec![
        Coin {
            position: Vec2::new(1040.0, 1000.0),
        },
        Coin {
            position: Vec2::new(1000.0, 1050.0),
        },
    ];
    let mut ledger = RewardLedger::new();
    let mut events = Vec::new();

    economy().collect_coins(7, &mut agent, &mut coins, &mut ledger, &mut events);

    assert_eq!(coins.len(), 1);
    assert_eq!(coins[0].position, Vec2::new(1000.0, 1050.0));
    assert_eq!(agent.coins, 1);
    assert_eq!(agent.performance, 0.5);
    assert_eq!(agent.intel, 0.25);
    assert_eq!(ledger.total("Player1", reason::COLLECT_COIN), 1.0);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, SimEventKind::CoinCollected);
    assert_eq!(events[0].tick, 7);

    let mut other = agent_at(Vec2::new(1040.0, 1000.0));
    economy().collect_coins(7, &mut other, &mut coins, &mut ledger, &mut events);
    assert_eq!(other.coins, 0);
}
