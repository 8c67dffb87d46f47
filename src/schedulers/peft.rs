//! Predict Earliest Finish Time.

use crate::runner::RunState;
use crate::scheduler::Algorithm;
use crate::schedulers::common::allocate_to_min;
use crate::schedulers::tables::RankTables;

/// Ranks tasks by the mean optimistic cost and selects the processor
/// minimising `eft + oct`, looking one step past the immediate finish
/// time. The committed time is the plain earliest finish time.
pub struct PeftAlgorithm;

impl PeftAlgorithm {
    pub fn new() -> Self {
        PeftAlgorithm
    }
}

impl Algorithm for PeftAlgorithm {
    fn name(&self) -> &str {
        "PEFT"
    }

    fn prioritize(&mut self, state: &mut RunState) {
        for task_id in 0..state.dag.task_count() {
            state.dag.get_task_mut(task_id).priority = RankTables::row_mean(&state.tables.oct[task_id]);
        }
    }

    fn allocate(&mut self, task_id: usize, state: &mut RunState) {
        allocate_to_min(state, task_id, |state, proc_id, eft| {
            eft + state.tables.oct[task_id][proc_id]
        });
    }
}
