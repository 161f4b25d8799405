//! Peak/off-peak classification of hourly cost records.

use std::cmp::Ordering;

use crate::error::{Error, Result};

/// Energy, tariff, and cost of one hour of the BAU run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourRecord {
    pub hour: usize,
    pub energy_kwh: f64,
    pub tariff: f64,
    pub cost: f64,
}

/// Sorts records ascending by `(tariff, cost)`.
///
/// The sort is stable so equal keys keep chronological order, which makes
/// the classification reproducible across runs.
pub fn sort_hours(records: &[HourRecord]) -> Vec<HourRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| match a.tariff.total_cmp(&b.tariff) {
        Ordering::Equal => a.cost.total_cmp(&b.cost),
        other => other,
    });
    sorted
}

/// Hours where demand is reduced (peak) and where it is added (off-peak).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeakClassification {
    /// The `S` lowest-ranked hours.
    pub off_peak: Vec<usize>,
    /// The `S` highest-ranked hours.
    pub peak: Vec<usize>,
}

impl PeakClassification {
    /// Classifies hours from an ascending `(tariff, cost)` ordering.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Response`] if `setting` is zero or the two classes
    /// would overlap (`2 * setting > hours`).
    pub fn from_sorted(sorted: &[HourRecord], setting: usize) -> Result<Self> {
        let n = sorted.len();
        if setting == 0 || 2 * setting > n {
            return Err(Error::Response(format!(
                "setting {setting} must be between 1 and {} for {n} hours",
                n / 2
            )));
        }
        Ok(Self {
            off_peak: sorted[..setting].iter().map(|r| r.hour).collect(),
            peak: sorted[n - setting..].iter().map(|r| r.hour).collect(),
        })
    }

    /// Number of hours in each class.
    pub fn setting(&self) -> usize {
        self.peak.len()
    }

    pub fn is_peak(&self, hour: usize) -> bool {
        self.peak.contains(&hour)
    }

    pub fn is_off_peak(&self, hour: usize) -> bool {
        self.off_peak.contains(&hour)
    }
}
