/// Cross-sweep statistics.
pub mod discussion;
pub mod detail;
pub mod engine;
pub mod kpi;
/// Energy, cost and revenue tables.
pub mod metrics;
pub mod sweep;
pub mod types;

pub use engine::{Baseline, ScenarioOutcome, ScenarioRunner};
pub use kpi::ScenarioKpi;
pub use sweep::{ElasticitySweepReport, FixedSweepReport, SweepTable};
