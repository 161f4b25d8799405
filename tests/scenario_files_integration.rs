//! The scenario files shipped under `scenarios/` must load and validate.

use std::path::Path;

use wds_tariff_sim::config::ScenarioConfig;
use wds_tariff_sim::hydraulics::SupplyBalanceSolver;
use wds_tariff_sim::sim::ScenarioRunner;

fn load(path: &str) -> ScenarioConfig {
    let cfg = ScenarioConfig::from_toml_file(Path::new(path)).unwrap();
    let errors = cfg.validate();
    assert!(errors.is_empty(), "{path}: {errors:?}");
    cfg
}

#[test]
fn shipped_scenarios_are_valid() {
    for path in [
        "scenarios/quick.toml",
        "scenarios/net3.toml",
        "scenarios/two_zone.toml",
    ] {
        let cfg = load(path);
        let network = cfg.load_network().unwrap();
        assert!(!network.pumps.is_empty(), "{path}");
    }
}

#[test]
fn net3_file_matches_baseline_preset() {
    let cfg = load("scenarios/net3.toml");
    let baseline = ScenarioConfig::baseline();
    assert_eq!(cfg.fixed.settings, baseline.fixed.settings);
    assert_eq!(cfg.uptakes(), baseline.uptakes());
    assert_eq!(cfg.elasticities(), baseline.elasticities());
    assert_eq!(cfg.simulation.random_tariffs, baseline.simulation.random_tariffs);
}

#[test]
fn two_zone_network_splits_energy_across_pumps() {
    let cfg = load("scenarios/two_zone.toml");
    let network = cfg.load_network().unwrap();
    let runner = ScenarioRunner::new(network, SupplyBalanceSolver, cfg.horizon()).unwrap();

    let demands = runner.original_demands();
    assert_eq!(demands.columns(), &["J1", "J2", "J3"]);

    let results = runner.simulate(demands).unwrap();
    assert_eq!(results.pumps.len(), 2);
    let energy = results.total_energy_kwh();
    assert_eq!(energy.len(), 24);
    assert!(energy.iter().all(|&e| e > 0.0));
}
