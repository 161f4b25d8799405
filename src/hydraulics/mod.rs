//! Hydraulic simulation boundary.
//!
//! The analysis only needs pump flow and head gain per reporting step, so
//! the solver sits behind [`HydraulicSolver`]. [`SupplyBalanceSolver`] is
//! the deterministic built-in implementation.

pub mod balance;
pub mod pump_energy;

pub use balance::SupplyBalanceSolver;

use crate::error::Result;
use crate::network::{DemandTable, NetworkModel};
use crate::sim::types::Horizon;

/// Per-step results for one pump.
#[derive(Debug, Clone, PartialEq)]
pub struct PumpSeries {
    pub name: String,
    /// Flow through the pump (m3/s).
    pub flow_m3s: Vec<f64>,
    /// Head added by the pump (m).
    pub head_gain_m: Vec<f64>,
}

/// Output of a hydraulic run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResults {
    pub pumps: Vec<PumpSeries>,
    /// Global pump efficiency used for energy accounting (percent).
    pub efficiency_pct: f64,
    pub horizon: Horizon,
}

impl SimulationResults {
    /// Energy drawn by each pump at every step (kWh), pump-major.
    pub fn pump_energy_kwh(&self) -> Vec<Vec<f64>> {
        self.pumps
            .iter()
            .map(|p| {
                p.flow_m3s
                    .iter()
                    .zip(&p.head_gain_m)
                    .map(|(&q, &h)| {
                        pump_energy::pump_energy_kwh(
                            q,
                            h,
                            self.efficiency_pct,
                            self.horizon.timestep_s,
                        )
                    })
                    .collect()
            })
            .collect()
    }

    /// Energy summed over all pumps at every step (kWh).
    pub fn total_energy_kwh(&self) -> Vec<f64> {
        let mut total = vec![0.0; self.horizon.steps];
        for series in self.pump_energy_kwh() {
            for (t, e) in total.iter_mut().zip(series) {
                *t += e;
            }
        }
        total
    }
}

/// Runs an extended-period simulation for a network and demand schedule.
pub trait HydraulicSolver {
    /// Simulates `network` with `demands` applied over `horizon`.
    ///
    /// # Errors
    ///
    /// Implementations return [`crate::error::Error::Solver`] when the
    /// network cannot be solved for the given demands.
    fn run(
        &self,
        network: &NetworkModel,
        demands: &DemandTable,
        horizon: &Horizon,
    ) -> Result<SimulationResults>;

    /// Short identifier for logs.
    fn name(&self) -> &'static str;
}
