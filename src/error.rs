//! Error types.

use thiserror::Error;

/// Failure kinds surfaced by the simulator.
///
/// All failures are deterministic functions of the inputs; there are no
/// retries. Parse errors abort the affected simulation,
/// [`PrecedenceViolation`](Error::PrecedenceViolation) indicates a broken
/// schedule and is fatal.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config missing: {0}")]
    ConfigMissing(String),
    #[error("environment parse error: {0}")]
    EnvironmentParse(String),
    #[error("workflow not found: {0}")]
    WorkflowNotFound(String),
    #[error("workflow parse error: {0}")]
    WorkflowParse(String),
    #[error("precedence violation: parent {parent} of task {task} is not committed")]
    PrecedenceViolation { task: String, parent: String },
    #[error("empty task list")]
    EmptyTaskList,
    #[error("zero makespan")]
    ZeroMakespan,
    #[error("zero computation cost")]
    ZeroComputation,
}

pub type Result<T> = std::result::Result<T, Error>;
