//! Demand-response redistribution policies.
//!
//! Both policies move volume out of expensive hours and into cheap ones
//! while keeping each junction's daily total unchanged.

pub mod classify;
pub mod elasticity;
pub mod shift;

pub use classify::{HourRecord, PeakClassification, sort_hours};
pub use elasticity::ElasticResponse;
pub use shift::FixedShift;

use crate::error::Result;
use crate::network::DemandTable;
use crate::sim::types::{pct, round_dp};

/// Per-junction bookkeeping of one redistribution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDetail {
    pub junction: String,
    /// Volume moved out of reduced hours.
    pub shifted: f64,
    /// Daily total before redistribution.
    pub before: f64,
    /// Daily total after redistribution.
    pub after: f64,
    /// `shifted` as a percentage of `before` (2 dp).
    pub shifted_pct: f64,
}

impl ResponseDetail {
    pub(crate) fn new(junction: &str, shifted: f64, before: f64, after: f64) -> Self {
        Self {
            junction: junction.to_string(),
            shifted,
            before,
            after,
            shifted_pct: round_dp(pct(shifted, before), 2),
        }
    }

    /// Rounds the reported volume to `dp` decimals; `shifted_pct` keeps
    /// the value computed from the exact volume.
    pub(crate) fn round_shifted(mut self, dp: u32) -> Self {
        self.shifted = round_dp(self.shifted, dp);
        self
    }
}

/// New demand schedule plus per-junction details.
#[derive(Debug, Clone, PartialEq)]
pub struct Redistribution {
    pub demands: DemandTable,
    pub details: Vec<ResponseDetail>,
}

impl Redistribution {
    /// Total volume moved across all junctions.
    pub fn total_shifted(&self) -> f64 {
        self.details.iter().map(|d| d.shifted).sum()
    }

    /// Network total before redistribution.
    pub fn total_before(&self) -> f64 {
        self.details.iter().map(|d| d.before).sum()
    }

    /// Network total after redistribution.
    pub fn total_after(&self) -> f64 {
        self.details.iter().map(|d| d.after).sum()
    }
}

/// A policy turning the original demand schedule into a shifted one.
pub trait DemandResponse {
    /// Redistributes `original` without modifying it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Response`] if the policy does not fit
    /// the table's horizon.
    fn redistribute(&self, original: &DemandTable) -> Result<Redistribution>;

    /// Row label used in sweep tables.
    fn label(&self) -> String;
}
