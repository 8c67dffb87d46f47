//! Processor model.

use serde::{Deserialize, Serialize};

/// A computing resource that executes tasks sequentially.
///
/// Described by its compute rate in MIPS, link bandwidth in megabit/s and
/// cost per MIPS. The ready/running times are per-run state and are
/// cleared by [`reset`](Processor::reset) between algorithm runs.
#[derive(Debug, Clone)]
pub struct Processor {
    pub id: usize,
    pub name: String,
    /// Compute rate in millions of instructions per second.
    pub mips: f64,
    /// Link bandwidth in megabit/s.
    pub bandwidth: f64,
    pub cost_per_mips: f64,

    ready_time: f64,
    pub estimated_ready_time: f64,
    running_time: f64,
}

/// Parameters of a processor as read from the environment file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    pub mips: f64,
    pub bandwidth: f64,
    pub cost: f64,
}

impl Processor {
    pub fn new(id: usize, name: &str, mips: f64, bandwidth: f64, cost_per_mips: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            mips,
            bandwidth,
            cost_per_mips,
            ready_time: 0.,
            estimated_ready_time: 0.,
            running_time: 0.,
        }
    }

    pub fn ready_time(&self) -> f64 {
        self.ready_time
    }

    /// Advances the committed ready time; it never moves backwards.
    pub fn set_ready_time(&mut self, time: f64) {
        self.ready_time = self.ready_time.max(time);
    }

    pub fn running_time(&self) -> f64 {
        self.running_time
    }

    pub fn add_running_time(&mut self, time: f64) {
        self.running_time += time;
    }

    /// Clears all per-run state.
    pub fn reset(&mut self) {
        self.ready_time = 0.;
        self.estimated_ready_time = 0.;
        self.running_time = 0.;
    }
}
