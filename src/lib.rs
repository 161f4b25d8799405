//! Demand-response tariff analysis for water distribution networks.

pub mod cli;
pub mod config;
pub mod error;
/// Hydraulic solver boundary and pump energy accounting.
pub mod hydraulics;
pub mod io;
pub mod logging;
pub mod network;
pub mod response;
/// Scenario runner, KPIs, sweeps, detailed analysis and statistics.
pub mod sim;
pub mod tariff;
