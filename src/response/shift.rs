//! Fixed setting/uptake load shifting.

use crate::error::{Error, Result};
use crate::network::DemandTable;

use super::{DemandResponse, PeakClassification, Redistribution, ResponseDetail};

/// Shifts a fraction of every peak-hour demand into the off-peak hours.
///
/// For each junction, `uptake * d[h]` is removed from every peak hour and
/// the removed volume is spread in equal parts over the off-peak hours.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedShift {
    pub classification: PeakClassification,
    /// Fraction of peak demand that moves (0..=1).
    pub uptake: f64,
}

impl FixedShift {
    /// # Errors
    ///
    /// Returns [`Error::Response`] if `uptake` is outside `[0, 1]`.
    pub fn new(classification: PeakClassification, uptake: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&uptake) {
            return Err(Error::Response(format!(
                "uptake rate {uptake} must be in [0, 1]"
            )));
        }
        Ok(Self {
            classification,
            uptake,
        })
    }
}

impl DemandResponse for FixedShift {
    fn redistribute(&self, original: &DemandTable) -> Result<Redistribution> {
        let steps = original.steps();
        let out_of_range = self
            .classification
            .peak
            .iter()
            .chain(&self.classification.off_peak)
            .any(|&h| h >= steps);
        if out_of_range {
            return Err(Error::Response(format!(
                "classification references hours outside a {steps}-step horizon"
            )));
        }

        let off_peak_count = self.classification.off_peak.len() as f64;
        let mut demands = original.clone();
        let mut details = Vec::with_capacity(original.len());

        for (idx, name) in original.columns().iter().enumerate() {
            let before = original.column_total(idx);
            let series = demands.series_mut(idx);

            let mut shifted = 0.0;
            for &h in &self.classification.peak {
                let delta = series[h] * self.uptake;
                series[h] -= delta;
                shifted += delta;
            }
            if off_peak_count > 0.0 {
                let share = shifted / off_peak_count;
                for &h in &self.classification.off_peak {
                    series[h] += share;
                }
            }

            let after: f64 = series.iter().sum();
            details.push(ResponseDetail::new(name, shifted, before, after));
        }

        Ok(Redistribution { demands, details })
    }

    fn label(&self) -> String {
        format!("S={} X={}", self.classification.setting(), self.uptake)
    }
}
