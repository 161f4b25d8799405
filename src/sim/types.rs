//! Core simulation types: the analysis horizon and shared numeric helpers.

/// Discrete analysis horizon.
///
/// Every hourly series in the crate (demands, tariffs, energy, cost) has
/// exactly `steps` entries, one per reporting timestep.
///
/// # Examples
///
/// ```
/// use wds_tariff_sim::sim::types::Horizon;
///
/// let horizon = Horizon::daily();
/// assert_eq!(horizon.steps, 24);
/// assert_eq!(horizon.time_s(23), 82_800);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    /// Number of reporting steps.
    pub steps: usize,
    /// Duration of one step in seconds.
    pub timestep_s: u64,
}

impl Horizon {
    /// Creates a new horizon.
    ///
    /// # Panics
    ///
    /// Panics if `steps` or `timestep_s` is zero.
    pub fn new(steps: usize, timestep_s: u64) -> Self {
        assert!(steps > 0, "steps must be > 0");
        assert!(timestep_s > 0, "timestep_s must be > 0");
        Self { steps, timestep_s }
    }

    /// One day in hourly steps.
    pub fn daily() -> Self {
        Self::new(24, 3600)
    }

    /// Iterator over step indices.
    pub fn hours(&self) -> std::ops::Range<usize> {
        0..self.steps
    }

    /// Simulation time in seconds at the start of `step`.
    pub fn time_s(&self, step: usize) -> u64 {
        step as u64 * self.timestep_s
    }

    /// Step duration in hours.
    pub fn dt_hours(&self) -> f64 {
        self.timestep_s as f64 / 3600.0
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self::daily()
    }
}

/// Rounds `value` to `decimals` places, half away from zero.
pub fn round_dp(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// `numerator * 100 / denominator`, or `0.0` when the denominator is zero.
pub fn pct(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator * 100.0 / denominator
    }
}

/// Inclusive arithmetic range `start, start+step, ..., <= end`, rounded to
/// `decimals` so grid labels stay free of float drift.
pub fn stepped_range(start: f64, end: f64, step: f64, decimals: u32) -> Vec<f64> {
    if step <= 0.0 || start > end {
        return Vec::new();
    }
    let count = ((end - start) / step + 1e-9).floor() as usize + 1;
    (0..count)
        .map(|i| round_dp(start + i as f64 * step, decimals))
        .collect()
}
