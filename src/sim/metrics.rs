//! Hourly energy, cost, and revenue tables derived from a run.

use crate::error::{Error, Result};
use crate::hydraulics::SimulationResults;
use crate::network::DemandTable;
use crate::response::HourRecord;
use crate::tariff::Tariff;

use super::types::round_dp;

/// Pump energy and its cost under an energy tariff, hour by hour.
///
/// Energy, tariff and cost are rounded to 2 decimals, matching the
/// precision at which the hours are later ranked.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyCostTable {
    pub energy_kwh: Vec<f64>,
    pub tariff: Vec<f64>,
    pub cost: Vec<f64>,
}

impl EnergyCostTable {
    /// Builds the table from per-hour energy and a tariff.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the lengths differ.
    pub fn from_energy(energy_kwh: &[f64], tariff: &Tariff) -> Result<Self> {
        if energy_kwh.len() != tariff.len() {
            return Err(Error::Validation(format!(
                "energy has {} hours, tariff \"{}\" has {}",
                energy_kwh.len(),
                tariff.name,
                tariff.len()
            )));
        }
        let mut table = Self {
            energy_kwh: Vec::with_capacity(energy_kwh.len()),
            tariff: Vec::with_capacity(energy_kwh.len()),
            cost: Vec::with_capacity(energy_kwh.len()),
        };
        for (&e, &t) in energy_kwh.iter().zip(&tariff.values) {
            table.energy_kwh.push(round_dp(e, 2));
            table.tariff.push(round_dp(t, 2));
            table.cost.push(round_dp(e * t, 2));
        }
        Ok(table)
    }

    /// Builds the table from a hydraulic run, summing all pumps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the run and tariff lengths differ.
    pub fn from_results(results: &SimulationResults, tariff: &Tariff) -> Result<Self> {
        Self::from_energy(&results.total_energy_kwh(), tariff)
    }

    pub fn len(&self) -> usize {
        self.energy_kwh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energy_kwh.is_empty()
    }

    pub fn total_energy(&self) -> f64 {
        self.energy_kwh.iter().sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.cost.iter().sum()
    }

    /// Per-hour records for peak/off-peak classification.
    pub fn records(&self) -> Vec<HourRecord> {
        (0..self.len())
            .map(|hour| HourRecord {
                hour,
                energy_kwh: self.energy_kwh[hour],
                tariff: self.tariff[hour],
                cost: self.cost[hour],
            })
            .collect()
    }
}

/// Water sales revenue under a water tariff, hour by hour.
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueTable {
    pub total_demand: Vec<f64>,
    pub tariff: Vec<f64>,
    pub revenue: Vec<f64>,
}

impl RevenueTable {
    /// Revenue of the network-wide demand at each hour.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the lengths differ.
    pub fn new(demands: &DemandTable, water_tariff: &Tariff) -> Result<Self> {
        if demands.steps() != water_tariff.len() {
            return Err(Error::Validation(format!(
                "demands have {} hours, water tariff \"{}\" has {}",
                demands.steps(),
                water_tariff.name,
                water_tariff.len()
            )));
        }
        let total_demand = demands.total_hourly();
        let revenue = total_demand
            .iter()
            .zip(&water_tariff.values)
            .map(|(d, w)| d * w)
            .collect();
        Ok(Self {
            total_demand,
            tariff: water_tariff.values.clone(),
            revenue,
        })
    }

    pub fn total_revenue(&self) -> f64 {
        self.revenue.iter().sum()
    }
}
