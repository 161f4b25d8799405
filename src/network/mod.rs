//! Water distribution network model and hourly demand tables.

pub mod demand;
pub mod model;

pub use demand::DemandTable;
pub use model::{DemandEntry, Junction, NetworkModel, Pattern, Pump};
