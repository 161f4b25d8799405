//! Elasticity-based redistribution against a water tariff.

use crate::error::{Error, Result};
use crate::network::DemandTable;
use crate::tariff::Tariff;

use super::{DemandResponse, Redistribution, ResponseDetail};

/// Demand response proportional to the tariff's deviation from its mean.
///
/// Hours priced above the mean lose `min(e * (w - mean), 1)` of their
/// demand. The removed volume returns in the below-mean hours, weighted by
/// `(mean - w) / RT` where `RT` is the total below-mean deviation.
#[derive(Debug, Clone, PartialEq)]
pub struct ElasticResponse {
    pub water_tariff: Tariff,
    pub elasticity: f64,
}

impl ElasticResponse {
    /// # Errors
    ///
    /// Returns [`Error::Response`] if `elasticity` is negative or not finite.
    pub fn new(water_tariff: Tariff, elasticity: f64) -> Result<Self> {
        if !elasticity.is_finite() || elasticity < 0.0 {
            return Err(Error::Response(format!(
                "elasticity {elasticity} must be a finite value >= 0"
            )));
        }
        Ok(Self {
            water_tariff,
            elasticity,
        })
    }

    /// Sum of `mean - w` over the hours priced below the mean.
    pub fn rebound_weight(&self) -> f64 {
        let mean = self.water_tariff.mean();
        self.water_tariff
            .values
            .iter()
            .filter(|&&w| w < mean)
            .map(|w| mean - w)
            .sum()
    }
}

impl DemandResponse for ElasticResponse {
    fn redistribute(&self, original: &DemandTable) -> Result<Redistribution> {
        let steps = original.steps();
        if self.water_tariff.len() != steps {
            return Err(Error::Response(format!(
                "water tariff \"{}\" has {} values, demands have {steps}",
                self.water_tariff.name,
                self.water_tariff.len()
            )));
        }

        let mean = self.water_tariff.mean();
        let rebound = self.rebound_weight();
        let w = &self.water_tariff.values;

        let mut demands = original.clone();
        let mut details = Vec::with_capacity(original.len());

        for (idx, name) in original.columns().iter().enumerate() {
            let before = original.column_total(idx);
            let source = original.series(idx);
            let series = demands.series_mut(idx);

            let mut shifted = 0.0;
            for h in 0..steps {
                if w[h] > mean {
                    let fraction = (self.elasticity * (w[h] - mean)).min(1.0);
                    let removed = source[h] * fraction;
                    series[h] = source[h] - removed;
                    shifted += removed;
                }
            }

            // A flat tariff has nothing above the mean either, so nothing
            // was removed.
            if rebound > 0.0 {
                for h in 0..steps {
                    if w[h] < mean {
                        series[h] = source[h] + shifted / rebound * (mean - w[h]);
                    }
                }
            }

            let after: f64 = series.iter().sum();
            details.push(ResponseDetail::new(name, shifted, before, after).round_shifted(3));
        }

        Ok(Redistribution { demands, details })
    }

    fn label(&self) -> String {
        format!("E={}", self.elasticity)
    }
}
