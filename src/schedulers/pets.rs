//! Performance Effective Task Scheduling.

use crate::runner::RunState;
use crate::scheduler::Algorithm;
use crate::schedulers::common::allocate_to_min;

/// Upward-rank ordering with the rank rounded to the nearest integer;
/// equal priorities prefer the task with the smaller mean computation
/// cost. Placement is plain earliest finish time.
///
/// Resolvable through the factory but not part of the default sweep.
pub struct PetsAlgorithm;

impl PetsAlgorithm {
    pub fn new() -> Self {
        PetsAlgorithm
    }
}

impl Algorithm for PetsAlgorithm {
    fn name(&self) -> &str {
        "PETS"
    }

    fn prioritize(&mut self, state: &mut RunState) {
        for task_id in 0..state.dag.task_count() {
            state.dag.get_task_mut(task_id).priority = state.tables.rank_u[task_id].round();
        }
    }

    fn allocate(&mut self, task_id: usize, state: &mut RunState) {
        allocate_to_min(state, task_id, |_, _, eft| eft);
    }

    fn breaks_ties_by_mean_cost(&self) -> bool {
        true
    }
}
