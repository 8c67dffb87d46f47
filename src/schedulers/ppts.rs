//! Predict Priority Task Scheduling.

use crate::runner::RunState;
use crate::scheduler::Algorithm;
use crate::schedulers::common::allocate_to_min;
use crate::schedulers::tables::RankTables;

/// Ranks tasks by the mean predict cost and selects the processor with
/// the smallest `eft + prm` lookahead sum.
pub struct PptsAlgorithm;

impl PptsAlgorithm {
    pub fn new() -> Self {
        PptsAlgorithm
    }
}

impl Algorithm for PptsAlgorithm {
    fn name(&self) -> &str {
        "PPTS"
    }

    fn prioritize(&mut self, state: &mut RunState) {
        for task_id in 0..state.dag.task_count() {
            state.dag.get_task_mut(task_id).priority = RankTables::row_mean(&state.tables.prm[task_id]);
        }
    }

    fn allocate(&mut self, task_id: usize, state: &mut RunState) {
        allocate_to_min(state, task_id, |state, proc_id, eft| {
            eft + state.tables.prm[task_id][proc_id]
        });
    }
}
