//! Water network description: junction demands, patterns, and pumps.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ConfigError;
use crate::error::{Error, Result};
use crate::sim::types::Horizon;

use super::demand::DemandTable;

/// Prefix for patterns created by [`NetworkModel::assign_demand`].
const ASSIGNED_PATTERN_PREFIX: &str = "dr-";

/// Time pattern of demand multipliers.
///
/// Shorter patterns repeat cyclically over the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pattern {
    pub name: String,
    pub multipliers: Vec<f64>,
}

impl Pattern {
    /// Multiplier at `step`, or `1.0` for an empty pattern.
    pub fn multiplier(&self, step: usize) -> f64 {
        if self.multipliers.is_empty() {
            1.0
        } else {
            self.multipliers[step % self.multipliers.len()]
        }
    }
}

/// One demand category at a junction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemandEntry {
    /// Base demand (m3/s).
    pub base: f64,
    /// Pattern name; `None` means a constant multiplier of 1.
    #[serde(default)]
    pub pattern: Option<String>,
}

/// Consumption node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Junction {
    pub name: String,
    #[serde(default)]
    pub demands: Vec<DemandEntry>,
}

/// Pumping station feeding the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Pump {
    pub name: String,
    /// Static lift from source to the pressure zone (m).
    pub static_head_m: f64,
    /// Quadratic system resistance `H = static + r * q^2` (s2/m5).
    pub resistance_s2_m5: f64,
    /// Fraction of total network demand delivered by this pump.
    #[serde(default = "default_share")]
    pub share: f64,
}

fn default_share() -> f64 {
    1.0
}

fn default_efficiency() -> f64 {
    75.0
}

/// Network model consumed by a [`crate::hydraulics::HydraulicSolver`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkModel {
    pub name: String,
    /// Global pump efficiency (percent).
    #[serde(default = "default_efficiency")]
    pub efficiency_pct: f64,
    #[serde(default)]
    pub patterns: Vec<Pattern>,
    #[serde(default)]
    pub junctions: Vec<Junction>,
    #[serde(default)]
    pub pumps: Vec<Pump>,
}

impl NetworkModel {
    /// Available built-in network names.
    pub const PRESETS: &[&str] = &["net3_isolated"];

    /// Loads a built-in network by name.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the name is unknown.
    pub fn from_preset(name: &str) -> std::result::Result<Self, ConfigError> {
        match name {
            "net3_isolated" => Ok(Self::net3_isolated()),
            _ => Err(ConfigError {
                field: "network.preset".to_string(),
                message: format!(
                    "unknown network \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a network from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses a network from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Toml`] for malformed input or unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Looks up a pattern by name.
    pub fn pattern(&self, name: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.name == name)
    }

    /// Validates references and physical parameters.
    ///
    /// Returns an empty vector if the model is usable.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !(self.efficiency_pct > 0.0 && self.efficiency_pct <= 100.0) {
            errors.push(ConfigError {
                field: "network.efficiency_pct".into(),
                message: "must be in (0, 100]".into(),
            });
        }

        if self.pumps.is_empty() {
            errors.push(ConfigError {
                field: "network.pumps".into(),
                message: "at least one pump is required".into(),
            });
        }
        let share: f64 = self.pumps.iter().map(|p| p.share).sum();
        if !self.pumps.is_empty() && (share - 1.0).abs() > 1e-6 {
            errors.push(ConfigError {
                field: "network.pumps.share".into(),
                message: format!("shares must sum to 1, got {share}"),
            });
        }
        for p in &self.pumps {
            if p.static_head_m < 0.0 || p.resistance_s2_m5 < 0.0 || p.share < 0.0 {
                errors.push(ConfigError {
                    field: format!("network.pumps.{}", p.name),
                    message: "head, resistance and share must be >= 0".into(),
                });
            }
        }

        for pat in &self.patterns {
            if pat.multipliers.is_empty() {
                errors.push(ConfigError {
                    field: format!("network.patterns.{}", pat.name),
                    message: "must have at least one multiplier".into(),
                });
            }
        }

        let mut seen = HashSet::new();
        for j in &self.junctions {
            if !seen.insert(j.name.as_str()) {
                errors.push(ConfigError {
                    field: format!("network.junctions.{}", j.name),
                    message: "duplicate junction name".into(),
                });
            }
            for d in &j.demands {
                let Some(ref name) = d.pattern else {
                    continue;
                };
                if self.pattern(name).is_none() {
                    errors.push(ConfigError {
                        field: format!("network.junctions.{}", j.name),
                        message: format!("references unknown pattern \"{name}\""),
                    });
                }
            }
        }

        errors
    }

    /// Hourly demand of every junction with non-zero consumption.
    ///
    /// Each junction's series is the sum of `base * multiplier` over its
    /// demand entries. Unknown pattern references behave as a constant 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if two junctions share a name.
    pub fn all_demands(&self, horizon: &Horizon) -> Result<DemandTable> {
        let mut table = DemandTable::new(horizon.steps);
        for j in &self.junctions {
            let mut series = vec![0.0; horizon.steps];
            for d in &j.demands {
                let pattern = d.pattern.as_deref().and_then(|n| self.pattern(n));
                for (t, v) in series.iter_mut().enumerate() {
                    *v += d.base * pattern.map_or(1.0, |p| p.multiplier(t));
                }
            }
            table.push_column(j.name.clone(), series)?;
        }
        table.drop_zero_columns();
        Ok(table)
    }

    /// Replaces the demands of every junction listed in `table`.
    ///
    /// Each listed junction gets a single unit-base entry driven by a
    /// dedicated pattern holding its column, so [`Self::all_demands`]
    /// reproduces the table. Junctions absent from the table keep their
    /// demands.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a column names an unknown junction.
    pub fn assign_demand(&mut self, table: &DemandTable) -> Result<()> {
        let index: HashMap<String, usize> = self
            .junctions
            .iter()
            .enumerate()
            .map(|(i, j)| (j.name.clone(), i))
            .collect();

        for (name, series) in table.iter() {
            let &idx = index.get(name).ok_or_else(|| {
                Error::Validation(format!("demand table names unknown junction \"{name}\""))
            })?;
            let pattern_name = format!("{ASSIGNED_PATTERN_PREFIX}{name}");
            let pattern = Pattern {
                name: pattern_name.clone(),
                multipliers: series.to_vec(),
            };
            match self.patterns.iter_mut().find(|p| p.name == pattern_name) {
                Some(existing) => *existing = pattern,
                None => self.patterns.push(pattern),
            }
            self.junctions[idx].demands = vec![DemandEntry {
                base: 1.0,
                pattern: Some(pattern_name),
            }];
        }
        debug!(junctions = table.len(), network = %self.name, "assigned demands");
        Ok(())
    }

    /// Reduced pumped-supply network with tanks isolated and controls
    /// removed: one lake pump feeds every junction directly.
    pub fn net3_isolated() -> Self {
        let residential = Pattern {
            name: "1".to_string(),
            multipliers: vec![
                1.34, 1.94, 1.46, 1.44, 0.76, 0.92, 0.85, 1.07, 0.96, 1.10, 1.08, 1.19, 1.16,
                1.08, 0.96, 0.83, 0.79, 0.74, 0.64, 0.64, 0.85, 0.96, 1.24, 1.67,
            ],
        };
        let commercial = Pattern {
            name: "2".to_string(),
            multipliers: vec![
                0.40, 0.40, 0.40, 0.40, 0.45, 0.60, 0.90, 1.30, 1.60, 1.70, 1.70, 1.60, 1.50,
                1.60, 1.70, 1.70, 1.60, 1.40, 1.10, 0.80, 0.60, 0.50, 0.45, 0.40,
            ],
        };
        let industrial = Pattern {
            name: "3".to_string(),
            multipliers: vec![
                0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
                1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0,
            ],
        };

        let layout: [(&str, &[(f64, &str)]); 12] = [
            ("15", &[(0.0039, "1")]),
            ("35", &[(0.0062, "1")]),
            ("101", &[(0.0119, "1")]),
            ("103", &[(0.0084, "1"), (0.0012, "2")]),
            ("105", &[(0.0079, "1")]),
            ("109", &[(0.0160, "2")]),
            ("111", &[(0.0091, "1")]),
            ("117", &[(0.0071, "1")]),
            ("119", &[(0.0113, "1"), (0.0020, "3")]),
            ("121", &[(0.0026, "1")]),
            ("123", &[(0.0120, "3")]),
            ("20", &[]),
        ];

        let junctions = layout
            .iter()
            .map(|(name, demands)| Junction {
                name: (*name).to_string(),
                demands: demands
                    .iter()
                    .map(|(base, pat)| DemandEntry {
                        base: *base,
                        pattern: Some((*pat).to_string()),
                    })
                    .collect(),
            })
            .collect();

        Self {
            name: "net3_isolated".to_string(),
            efficiency_pct: 75.0,
            patterns: vec![residential, commercial, industrial],
            junctions,
            pumps: vec![Pump {
                name: "10".to_string(),
                static_head_m: 42.0,
                resistance_s2_m5: 1800.0,
                share: 1.0,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_network_is_valid() {
        let net = NetworkModel::net3_isolated();
        let errors = net.validate();
        assert!(errors.is_empty(), "preset should be valid: {errors:?}");
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let err = NetworkModel::from_preset("nope").unwrap_err();
        assert!(err.message.contains("unknown network"), "{err}");
    }

    #[test]
    fn all_demands_drops_zero_junctions() {
        let net = NetworkModel::net3_isolated();
        let table = net.all_demands(&Horizon::daily()).unwrap();
        assert_eq!(table.len(), 11);
        assert!(table.column("20").is_none());
    }

    #[test]
    fn all_demands_sums_entries() {
        let net = NetworkModel::net3_isolated();
        let table = net.all_demands(&Horizon::daily()).unwrap();
        let j103 = table.column("103").unwrap();
        let expected = 0.0084 * 1.34 + 0.0012 * 0.40;
        assert!((j103[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn assign_demand_round_trips_through_patterns() {
        let mut net = NetworkModel::net3_isolated();
        let horizon = Horizon::daily();
        let mut table = net.all_demands(&horizon).unwrap();
        for v in table.series_mut(0) {
            *v *= 2.0;
        }
        net.assign_demand(&table).unwrap();
        let back = net.all_demands(&horizon).unwrap();
        assert_eq!(back, table);

        // Re-assigning replaces the pattern rather than adding another.
        let patterns_before = net.patterns.len();
        net.assign_demand(&table).unwrap();
        assert_eq!(net.patterns.len(), patterns_before);
    }

    #[test]
    fn assign_demand_rejects_unknown_junction() {
        let mut net = NetworkModel::net3_isolated();
        let mut table = DemandTable::new(24);
        table.push_column("ghost", vec![1.0; 24]).unwrap();
        assert!(net.assign_demand(&table).is_err());
    }

    #[test]
    fn toml_network_parses_and_validates() {
        let toml = r#"
name = "two-node"
efficiency_pct = 80.0

[[patterns]]
name = "p"
multipliers = [0.5, 1.5]

[[junctions]]
name = "a"
demands = [{ base = 0.01, pattern = "p" }]

[[junctions]]
name = "b"
demands = [{ base = 0.02 }]

[[pumps]]
name = "main"
static_head_m = 30.0
resistance_s2_m5 = 500.0
"#;
        let net = NetworkModel::from_toml_str(toml).unwrap();
        assert!(net.validate().is_empty());
        let table = net.all_demands(&Horizon::new(4, 3600)).unwrap();
        let a = table.column("a").unwrap();
        let expected = [0.005, 0.015, 0.005, 0.015];
        assert_eq!(a.len(), 4);
        for (got, want) in a.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12);
        }
        assert_eq!(table.column("b"), Some([0.02; 4].as_slice()));
    }

    #[test]
    fn duplicate_junction_names_are_rejected() {
        let toml = r#"
name = "dup"

[[junctions]]
name = "a"
demands = [{ base = 0.01 }]

[[junctions]]
name = "a"
demands = [{ base = 0.05 }]

[[pumps]]
name = "main"
static_head_m = 30.0
resistance_s2_m5 = 500.0
"#;
        let net = NetworkModel::from_toml_str(toml).unwrap();
        let errors = net.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "network.junctions.a" && e.message.contains("duplicate")),
            "{errors:?}"
        );
        assert!(net.all_demands(&Horizon::daily()).is_err());
    }

    #[test]
    fn validation_catches_bad_pattern_reference_and_shares() {
        let mut net = NetworkModel::net3_isolated();
        net.junctions[0].demands[0].pattern = Some("missing".into());
        net.pumps[0].share = 0.5;
        let errors = net.validate();
        assert!(errors.iter().any(|e| e.field == "network.junctions.15"));
        assert!(errors.iter().any(|e| e.field == "network.pumps.share"));
    }
}
