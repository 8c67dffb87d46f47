//! Loaders for simulation inputs.

mod config;
mod dax_parser;
mod environment;

pub use config::{Properties, SimulationConfig};
pub use dax_parser::{find_workflow_files, load_dax, parse_dax, workflow_name};
pub use environment::{load_environment, parse_environment, Constraints, Environment, Scenario};
