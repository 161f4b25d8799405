//! Pump energy from flow and head gain.

/// Density of water (kg/m3).
pub const WATER_DENSITY: f64 = 1000.0;
/// Gravitational acceleration (m/s2).
pub const GRAVITY: f64 = 9.81;

/// Hydraulic power delivered by a pump, divided by efficiency (W).
///
/// Non-positive flow or head yields zero: a closed or reversing pump
/// draws no modelled energy.
pub fn pump_power_w(flow_m3s: f64, head_gain_m: f64, efficiency_pct: f64) -> f64 {
    if flow_m3s <= 0.0 || head_gain_m <= 0.0 || efficiency_pct <= 0.0 {
        return 0.0;
    }
    WATER_DENSITY * GRAVITY * flow_m3s * head_gain_m / (efficiency_pct / 100.0)
}

/// Energy drawn over one timestep (kWh).
///
/// # Examples
///
/// ```
/// use wds_tariff_sim::hydraulics::pump_energy::pump_energy_kwh;
///
/// // 0.1 m3/s lifted 50 m at 75% for one hour
/// let kwh = pump_energy_kwh(0.1, 50.0, 75.0, 3600);
/// assert!((kwh - 65.4).abs() < 1e-9);
/// ```
pub fn pump_energy_kwh(
    flow_m3s: f64,
    head_gain_m: f64,
    efficiency_pct: f64,
    timestep_s: u64,
) -> f64 {
    pump_power_w(flow_m3s, head_gain_m, efficiency_pct) * timestep_s as f64 / 3.6e6
}
