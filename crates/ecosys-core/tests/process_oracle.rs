#![cfg(unix)]

use ecosys_core::config::SimConfig;
use ecosys_core::{Oracle, OracleError, ProcessOracle, Simulation};
use ecosys_protocol::RewardEvent;

const ANSWERING: &str = r#"
while IFS= read -r line; do
  case "$line" in
    *'"op":"init"'*) echo '{"ok":true}' ;;
    *'"op":"tick"'*) echo '{"ok":true,"decisions":{"Player1":{"vx":30.0,"vy":0.0,"hud":"from sh","intent":"east"}}}' ;;
  esac
done
"#;

const GARBLED: &str = r#"
while IFS= read -r line; do
  case "$line" in
    *'"op":"init"'*) echo '{"ok":true}' ;;
    *'"op":"tick"'*) echo 'not json at all' ;;
  esac
done
"#;

fn shell(script: &str) -> ProcessOracle {
    match ProcessOracle::spawn("sh", &["-c".to_string(), script.to_string()]) {
        Ok(oracle) => oracle,
        Err(err) => panic!("failed to start sh: {err}"),
    }
}

fn one_agent() -> SimConfig {
    let mut config = SimConfig::default();
    config.agents.count = 1;
    config
}

#[test]
fn child_process_drives_the_simulation() {
    let mut sim = match Simulation::new(one_agent(), shell(ANSWERING)) {
        Ok(sim) => sim,
        Err(err) => panic!("{err}"),
    };

    for _ in 0..3 {
        assert!(!sim.step_once().degraded);
    }
    let agent = &sim.state().agents[0];
    assert_eq!(agent.hud, "from sh");
    assert_eq!(agent.intent, "east");
    assert!(agent.position.x > 200.0);

    sim.oracle_mut()
        .reward(&RewardEvent::new("Player1", 0.5, "manual"))
        .unwrap();
    assert!(!sim.step_once().degraded);
    sim.shutdown();
}

#[test]
fn malformed_tick_lines_degrade_the_step() {
    let mut sim = match Simulation::new(one_agent(), shell(GARBLED)) {
        Ok(sim) => sim,
        Err(err) => panic!("{err}"),
    };

    let report = sim.step_once();
    assert!(report.degraded);
    assert_eq!(sim.state().agents[0].velocity.x, 0.0);

    // the garbled answer was consumed; the next tick stays in sync
    assert!(sim.step_once().degraded);
    assert_eq!(sim.tick(), 2);
}

#[test]
fn missing_binary_is_a_spawn_error() {
    let result = ProcessOracle::spawn("ecosys-oracle-that-does-not-exist", &[]);
    assert!(matches!(result, Err(OracleError::Spawn { .. })));
}

#[test]
fn child_that_exits_cannot_initialize() {
    let result = Simulation::new(one_agent(), shell("exit 0"));
    assert!(result.is_err());
}
