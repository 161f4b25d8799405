//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::network::NetworkModel;
use crate::sim::sweep::{elasticity_grid, uptake_grid};
use crate::sim::types::Horizon;
use crate::tariff::{DEFAULT_BAND_WIDTH, TariffSet};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Horizon, seed and tariff construction.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Which network to analyse.
    #[serde(default)]
    pub network: NetworkConfig,
    /// Fixed setting/uptake sweep and detail scenario.
    #[serde(default)]
    pub fixed: FixedConfig,
    /// Elasticity sweep and detail scenario.
    #[serde(default)]
    pub elasticity: ElasticityConfig,
    /// Where results are written.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Horizon, seed and tariff construction parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of reporting steps (must be > 0).
    pub steps: usize,
    /// Step duration in seconds (must be > 0).
    pub timestep_s: u64,
    /// Seed of the random tariff shuffles.
    pub seed: u64,
    /// Number of shuffled `Random *` energy tariffs.
    pub random_tariffs: usize,
    /// Hours per tariff band.
    pub band_width: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: 24,
            timestep_s: 3600,
            seed: 42,
            random_tariffs: 50,
            band_width: DEFAULT_BAND_WIDTH,
        }
    }
}

/// Network source: a built-in preset, or a TOML file when `path` is set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    pub preset: String,
    pub path: Option<PathBuf>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            preset: "net3_isolated".to_string(),
            path: None,
        }
    }
}

/// Fixed setting/uptake sweep parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixedConfig {
    /// Settings S to sweep (hours per peak/off-peak class).
    pub settings: Vec<usize>,
    /// Uptake grid step; the grid runs `step..=1.0`.
    pub uptake_step: f64,
    /// Energy tariff of the detailed scenario.
    pub detail_tariff: String,
    pub detail_setting: usize,
    pub detail_uptake: f64,
}

impl Default for FixedConfig {
    fn default() -> Self {
        Self {
            settings: (1..=12).collect(),
            uptake_step: 0.1,
            detail_tariff: "Symmetric".to_string(),
            detail_setting: 8,
            detail_uptake: 0.5,
        }
    }
}

/// Elasticity sweep parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElasticityConfig {
    /// Grid step; the grid runs `step..=max`.
    pub step: f64,
    pub max: f64,
    /// Energy (and paired water) tariff of the detailed scenario.
    pub detail_tariff: String,
    pub detail_elasticity: f64,
}

impl Default for ElasticityConfig {
    fn default() -> Self {
        Self {
            step: 0.05,
            max: 1.0,
            detail_tariff: "Symmetric".to_string(),
            detail_elasticity: 0.7,
        }
    }
}

/// Output location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory receiving the CSV files.
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("results"),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.steps"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: the full grids over the Net3 subsystem.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the quick preset: coarse grids and few random tariffs.
    pub fn quick() -> Self {
        Self {
            simulation: SimulationConfig {
                random_tariffs: 5,
                ..SimulationConfig::default()
            },
            fixed: FixedConfig {
                settings: vec![2, 4, 8],
                uptake_step: 0.25,
                ..FixedConfig::default()
            },
            elasticity: ElasticityConfig {
                step: 0.25,
                ..ElasticityConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "quick"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "quick" => Ok(Self::quick()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    pub fn horizon(&self) -> Horizon {
        Horizon::new(self.simulation.steps, self.simulation.timestep_s)
    }

    /// Uptake rates of the fixed sweep.
    pub fn uptakes(&self) -> Vec<f64> {
        uptake_grid(self.fixed.uptake_step)
    }

    /// Elasticities of the elasticity sweep.
    pub fn elasticities(&self) -> Vec<f64> {
        elasticity_grid(self.elasticity.step, self.elasticity.max)
    }

    /// Loads and validates the configured network.
    ///
    /// # Errors
    ///
    /// Returns an error if the network file cannot be read, the preset is
    /// unknown, or the model fails validation.
    pub fn load_network(&self) -> crate::error::Result<NetworkModel> {
        let network = match &self.network.path {
            Some(path) => NetworkModel::from_toml_file(path)?,
            None => NetworkModel::from_preset(&self.network.preset)?,
        };
        if let Some(first) = network.validate().into_iter().next() {
            return Err(first.into());
        }
        Ok(network)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.steps == 0 {
            errors.push(ConfigError::new("simulation.steps", "must be > 0"));
        }
        if s.timestep_s == 0 {
            errors.push(ConfigError::new("simulation.timestep_s", "must be > 0"));
        }
        if s.band_width == 0 || 4 * s.band_width > s.steps {
            errors.push(ConfigError::new(
                "simulation.band_width",
                "must be > 0 with 4 bands fitting in simulation.steps",
            ));
        }

        if self.network.path.is_none()
            && !NetworkModel::PRESETS.contains(&self.network.preset.as_str())
        {
            errors.push(ConfigError::new(
                "network.preset",
                format!(
                    "unknown network \"{}\", available: {}",
                    self.network.preset,
                    NetworkModel::PRESETS.join(", ")
                ),
            ));
        }

        let max_setting = s.steps / 2;
        let f = &self.fixed;
        if f.settings.is_empty() {
            errors.push(ConfigError::new("fixed.settings", "must not be empty"));
        }
        if let Some(bad) = f.settings.iter().find(|&&v| v == 0 || v > max_setting) {
            errors.push(ConfigError::new(
                "fixed.settings",
                format!("setting {bad} must be in [1, {max_setting}]"),
            ));
        }
        if f.uptake_step <= 0.0 || f.uptake_step > 1.0 || f.uptake_step.is_nan() {
            errors.push(ConfigError::new("fixed.uptake_step", "must be in (0.0, 1.0]"));
        }
        if f.detail_setting == 0 || f.detail_setting > max_setting {
            errors.push(ConfigError::new(
                "fixed.detail_setting",
                format!("must be in [1, {max_setting}]"),
            ));
        }
        if !(0.0..=1.0).contains(&f.detail_uptake) {
            errors.push(ConfigError::new("fixed.detail_uptake", "must be in [0.0, 1.0]"));
        }

        let e = &self.elasticity;
        if e.step <= 0.0 || e.step.is_nan() {
            errors.push(ConfigError::new("elasticity.step", "must be > 0"));
        }
        if e.max < e.step {
            errors.push(ConfigError::new("elasticity.max", "must be >= elasticity.step"));
        }
        if !(e.detail_elasticity.is_finite() && e.detail_elasticity >= 0.0) {
            errors.push(ConfigError::new("elasticity.detail_elasticity", "must be >= 0"));
        }

        errors
    }

    /// Checks the detail tariff names against the tariffs actually in use,
    /// which may have been imported rather than built from the seed.
    pub fn validate_detail_tariffs(&self, tariffs: &TariffSet) -> Vec<ConfigError> {
        [
            ("fixed.detail_tariff", &self.fixed.detail_tariff),
            ("elasticity.detail_tariff", &self.elasticity.detail_tariff),
        ]
        .into_iter()
        .filter(|(_, name)| tariffs.get(name).is_none())
        .map(|(field, name)| {
            ConfigError::new(
                field,
                format!("unknown tariff \"{name}\", available: {}", tariffs.names().join(", ")),
            )
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tariff::Tariff;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn baseline_grids() {
        let cfg = ScenarioConfig::baseline();
        assert_eq!(cfg.fixed.settings.len(), 12);
        assert_eq!(cfg.uptakes().len(), 10);
        assert_eq!(cfg.elasticities().len(), 20);
        assert_eq!(cfg.horizon(), Horizon::daily());
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[simulation]
steps = 24
timestep_s = 3600
seed = 7
random_tariffs = 10
band_width = 3

[network]
preset = "net3_isolated"

[fixed]
settings = [4, 8]
uptake_step = 0.5
detail_tariff = "Random 3"
detail_setting = 4
detail_uptake = 1.0

[elasticity]
step = 0.1
max = 0.5
detail_tariff = "Opposite"
detail_elasticity = 0.3

[output]
dir = "out"
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).unwrap();
        assert!(cfg.validate().is_empty());
        assert_eq!(cfg.simulation.band_width, 3);
        assert_eq!(cfg.uptakes(), vec![0.5, 1.0]);
        assert_eq!(cfg.elasticities(), vec![0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_eq!(cfg.output.dir, PathBuf::from("out"));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[simulation]
steps = 24
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let cfg = ScenarioConfig::from_toml_str("[simulation]\nseed = 99\n").unwrap();
        assert_eq!(cfg.simulation.seed, 99);
        assert_eq!(cfg.simulation.steps, 24);
        assert_eq!(cfg.fixed.detail_setting, 8);
        assert_eq!(cfg.elasticity.detail_elasticity, 0.7);
    }

    #[test]
    fn validation_catches_oversized_setting() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.fixed.settings.push(13);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "fixed.settings"));
    }

    #[test]
    fn validation_catches_bad_band_width() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.band_width = 7;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.band_width"));
    }

    #[test]
    fn detail_tariffs_checked_against_tariffs_in_use() {
        let mut tariffs = TariffSet::new();
        tariffs.push(Tariff::flat("Flat", 24)).unwrap();
        tariffs.push(Tariff::flat("Peaky", 24)).unwrap();

        let mut cfg = ScenarioConfig::quick();
        cfg.fixed.detail_tariff = "Peaky".to_string();
        cfg.elasticity.detail_tariff = "Random 6".to_string();
        // names outside the generated set are not a static error
        assert!(cfg.validate().is_empty());

        let errors = cfg.validate_detail_tariffs(&tariffs);
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert_eq!(errors[0].field, "elasticity.detail_tariff");
    }

    #[test]
    fn validation_catches_unknown_network() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.network.preset = "net9".to_string();
        assert!(cfg.validate().iter().any(|e| e.field == "network.preset"));
        assert!(cfg.load_network().is_err());
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let errors = ScenarioConfig::from_preset(name).unwrap().validate();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn quick_is_smaller_than_baseline() {
        let base = ScenarioConfig::baseline();
        let quick = ScenarioConfig::quick();
        assert!(quick.fixed.settings.len() < base.fixed.settings.len());
        assert!(quick.uptakes().len() < base.uptakes().len());
        assert!(quick.simulation.random_tariffs < base.simulation.random_tariffs);
    }

    #[test]
    fn preset_network_loads() {
        let network = ScenarioConfig::baseline().load_network().unwrap();
        assert!(!network.junctions.is_empty());
    }
}
