//! Heterogeneous Earliest Finish Time.

use crate::runner::RunState;
use crate::scheduler::Algorithm;
use crate::schedulers::common::allocate_to_min;

/// Orders tasks by upward rank and places each one on the processor with
/// the earliest finish time, reusing gaps in the processor timelines.
pub struct HeftAlgorithm;

impl HeftAlgorithm {
    pub fn new() -> Self {
        HeftAlgorithm
    }
}

impl Algorithm for HeftAlgorithm {
    fn name(&self) -> &str {
        "HEFT"
    }

    fn prioritize(&mut self, state: &mut RunState) {
        for task_id in 0..state.dag.task_count() {
            state.dag.get_task_mut(task_id).priority = state.tables.rank_u[task_id];
        }
    }

    fn allocate(&mut self, task_id: usize, state: &mut RunState) {
        allocate_to_min(state, task_id, |_, _, eft| eft);
    }
}
