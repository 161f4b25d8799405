//! Scenario runner: BAU baseline plus redistributed runs on one network.

use tracing::{debug, trace};

use crate::error::Result;
use crate::hydraulics::{HydraulicSolver, SimulationResults};
use crate::network::{DemandTable, NetworkModel};
use crate::response::{
    DemandResponse, ElasticResponse, FixedShift, HourRecord, PeakClassification, Redistribution,
    sort_hours,
};
use crate::tariff::Tariff;

use super::kpi::ScenarioKpi;
use super::metrics::{EnergyCostTable, RevenueTable};
use super::types::Horizon;

/// BAU simulation of the original demands under one energy tariff.
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline {
    pub energy_tariff: Tariff,
    pub water_tariff: Option<Tariff>,
    pub energy: EnergyCostTable,
    /// Revenue of the original demands, when a water tariff was given.
    pub revenue: Option<RevenueTable>,
}

impl Baseline {
    /// BAU hours ordered by `(tariff, cost)`.
    pub fn sorted_hours(&self) -> Vec<HourRecord> {
        sort_hours(&self.energy.records())
    }

    /// Peak/off-peak classes of `setting` hours each.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Response`] if `setting` does not fit
    /// the horizon.
    pub fn classify(&self, setting: usize) -> Result<PeakClassification> {
        PeakClassification::from_sorted(&self.sorted_hours(), setting)
    }
}

/// Result of one redistributed run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    pub redistribution: Redistribution,
    pub energy: EnergyCostTable,
    /// Revenue of the new demands (elasticity runs).
    pub revenue: Option<RevenueTable>,
    pub kpi: ScenarioKpi,
}

/// Runs demand-response scenarios against a fixed network.
///
/// Generic over `S: HydraulicSolver` for static dispatch. The original
/// demand table is captured once at construction; every scenario starts
/// from it, so runs never compound.
pub struct ScenarioRunner<S: HydraulicSolver> {
    network: NetworkModel,
    solver: S,
    horizon: Horizon,
    original: DemandTable,
}

impl<S: HydraulicSolver> ScenarioRunner<S> {
    /// Creates a runner and captures the network's current demands.
    ///
    /// # Arguments
    ///
    /// * `network` - Network model with its BAU demand patterns
    /// * `solver` - Hydraulic solver
    /// * `horizon` - Reporting horizon
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Validation`] if the network's junction
    /// names are not unique.
    pub fn new(network: NetworkModel, solver: S, horizon: Horizon) -> Result<Self> {
        let original = network.all_demands(&horizon)?;
        debug!(
            network = %network.name,
            junctions = original.len(),
            solver = solver.name(),
            "scenario runner ready"
        );
        Ok(Self {
            network,
            solver,
            horizon,
            original,
        })
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    pub fn network(&self) -> &NetworkModel {
        &self.network
    }

    /// Demand table captured at construction.
    pub fn original_demands(&self) -> &DemandTable {
        &self.original
    }

    /// Simulates a copy of the network with `demands` assigned.
    ///
    /// # Errors
    ///
    /// Propagates demand-assignment and solver errors.
    pub fn simulate(&self, demands: &DemandTable) -> Result<SimulationResults> {
        let mut network = self.network.clone();
        network.assign_demand(demands)?;
        let applied = network.all_demands(&self.horizon)?;
        trace!(total = applied.grand_total(), "simulating demands");
        self.solver.run(&network, &applied, &self.horizon)
    }

    /// Per-hour pump energy of the BAU run (kWh).
    ///
    /// # Errors
    ///
    /// Propagates solver errors.
    pub fn bau_energy(&self) -> Result<Vec<f64>> {
        Ok(self.simulate(&self.original)?.total_energy_kwh())
    }

    /// Simulates the original demands under an energy tariff.
    ///
    /// # Errors
    ///
    /// Propagates solver errors and tariff/horizon mismatches.
    pub fn baseline(
        &self,
        energy_tariff: &Tariff,
        water_tariff: Option<&Tariff>,
    ) -> Result<Baseline> {
        let results = self.simulate(&self.original)?;
        let energy = EnergyCostTable::from_results(&results, energy_tariff)?;
        let revenue = water_tariff
            .map(|w| RevenueTable::new(&self.original, w))
            .transpose()?;
        Ok(Baseline {
            energy_tariff: energy_tariff.clone(),
            water_tariff: water_tariff.cloned(),
            energy,
            revenue,
        })
    }

    /// Applies a policy to the original demands and simulates the result.
    ///
    /// # Errors
    ///
    /// Propagates policy, solver and tariff errors.
    pub fn run_response<R: DemandResponse>(
        &self,
        baseline: &Baseline,
        policy: &R,
    ) -> Result<ScenarioOutcome> {
        let redistribution = policy.redistribute(&self.original)?;
        let results = self.simulate(&redistribution.demands)?;
        let energy = EnergyCostTable::from_results(&results, &baseline.energy_tariff)?;
        let kpi =
            ScenarioKpi::from_tables(policy.label(), &baseline.energy, &energy, &redistribution);
        Ok(ScenarioOutcome {
            redistribution,
            energy,
            revenue: None,
            kpi,
        })
    }

    /// Fixed setting/uptake scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if `setting` or `uptake` is out of range, or the
    /// run fails.
    pub fn run_fixed(
        &self,
        baseline: &Baseline,
        setting: usize,
        uptake: f64,
    ) -> Result<ScenarioOutcome> {
        let policy = FixedShift::new(baseline.classify(setting)?, uptake)?;
        self.run_response(baseline, &policy)
    }

    /// Elasticity scenario with revenue accounting under `water_tariff`.
    ///
    /// # Errors
    ///
    /// Returns an error if `elasticity` is invalid, the tariff does not
    /// fit the horizon, or the run fails.
    pub fn run_elasticity(
        &self,
        baseline: &Baseline,
        water_tariff: &Tariff,
        elasticity: f64,
    ) -> Result<ScenarioOutcome> {
        let policy = ElasticResponse::new(water_tariff.clone(), elasticity)?;
        let mut outcome = self.run_response(baseline, &policy)?;

        let original_revenue = match &baseline.revenue {
            Some(r) if baseline.water_tariff.as_ref() == Some(water_tariff) => r.clone(),
            _ => RevenueTable::new(&self.original, water_tariff)?,
        };
        let new_revenue = RevenueTable::new(&outcome.redistribution.demands, water_tariff)?;
        outcome.kpi = outcome.kpi.with_revenue(&original_revenue, &new_revenue);
        outcome.revenue = Some(new_revenue);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hydraulics::SupplyBalanceSolver;
    use crate::tariff::BandLevels;

    fn runner() -> ScenarioRunner<SupplyBalanceSolver> {
        ScenarioRunner::new(
            NetworkModel::net3_isolated(),
            SupplyBalanceSolver,
            Horizon::daily(),
        )
        .unwrap()
    }

    fn symmetric(runner: &ScenarioRunner<SupplyBalanceSolver>) -> Tariff {
        let energy = runner.bau_energy().unwrap();
        let ranking: Vec<usize> = crate::tariff::energy::rank_by_energy(&energy);
        Tariff::new("Symmetric", BandLevels::SYMMETRIC.apply(&ranking, 4).unwrap())
    }

    #[test]
    fn zero_uptake_reproduces_baseline() {
        let runner = runner();
        let tariff = symmetric(&runner);
        let baseline = runner.baseline(&tariff, None).unwrap();
        let outcome = runner.run_fixed(&baseline, 4, 0.0).unwrap();
        assert_eq!(outcome.energy, baseline.energy);
        assert_eq!(outcome.kpi.cost_savings_pct, 0.0);
        assert_eq!(outcome.kpi.energy_change_pct, 0.0);
    }

    #[test]
    fn runs_start_from_original_demands() {
        let runner = runner();
        let tariff = symmetric(&runner);
        let baseline = runner.baseline(&tariff, None).unwrap();
        let first = runner.run_fixed(&baseline, 8, 0.5).unwrap();
        runner.run_fixed(&baseline, 12, 1.0).unwrap();
        let again = runner.run_fixed(&baseline, 8, 0.5).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn shifting_out_of_costly_hours_saves_cost() {
        let runner = runner();
        let tariff = symmetric(&runner);
        let baseline = runner.baseline(&tariff, None).unwrap();
        let outcome = runner.run_fixed(&baseline, 4, 0.5).unwrap();
        assert!(outcome.kpi.cost_savings_pct > 0.0);
        assert!(outcome.kpi.total_demand_difference.abs() < 1e-3);
    }

    #[test]
    fn elasticity_run_reports_revenue() {
        let runner = runner();
        let tariff = symmetric(&runner);
        let water = tariff.clone();
        let baseline = runner.baseline(&tariff, Some(&water)).unwrap();
        let outcome = runner.run_elasticity(&baseline, &water, 0.7).unwrap();
        assert!(outcome.revenue.is_some());
        assert!(outcome.kpi.revenue_increase_pct().is_some());
        assert_eq!(outcome.kpi.label, "E=0.7");
    }

    #[test]
    fn oversized_setting_is_rejected() {
        let runner = runner();
        let tariff = Tariff::flat("Flat", 24);
        let baseline = runner.baseline(&tariff, None).unwrap();
        assert!(runner.run_fixed(&baseline, 13, 0.5).is_err());
        assert!(runner.run_fixed(&baseline, 0, 0.5).is_err());
    }
}
