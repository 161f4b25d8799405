//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use wds_tariff_sim::hydraulics::SupplyBalanceSolver;
use wds_tariff_sim::network::NetworkModel;
use wds_tariff_sim::sim::ScenarioRunner;
use wds_tariff_sim::sim::types::Horizon;
use wds_tariff_sim::tariff::{
    DEFAULT_BAND_WIDTH, TariffSet, build_energy_tariffs, build_water_tariffs,
};

/// Seed used by every fixture that builds random tariffs.
pub const SEED: u64 = 42;

/// Runner over the isolated Net3 network, one day in hourly steps.
pub fn net3_runner() -> ScenarioRunner<SupplyBalanceSolver> {
    ScenarioRunner::new(
        NetworkModel::net3_isolated(),
        SupplyBalanceSolver,
        Horizon::daily(),
    )
    .unwrap()
}

/// Energy and water tariffs for `runner` with `random_count` random tariffs.
///
/// Returns `(energy_tariffs, water_tariffs)`.
pub fn tariffs(
    runner: &ScenarioRunner<SupplyBalanceSolver>,
    random_count: usize,
) -> (TariffSet, TariffSet) {
    let bau = runner.bau_energy().unwrap();
    let energy = build_energy_tariffs(&bau, DEFAULT_BAND_WIDTH, random_count, SEED).unwrap();
    let water = build_water_tariffs(&bau, &energy, DEFAULT_BAND_WIDTH).unwrap();
    (energy, water)
}
