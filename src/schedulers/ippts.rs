//! Improved Predict Priority Task Scheduling.

use crate::runner::RunState;
use crate::scheduler::Algorithm;
use crate::schedulers::common::allocate_to_min;
use crate::schedulers::tables::RankTables;

/// Weighs the mean predict cost by the task's out-degree and selects the
/// processor minimising `eft + (prm - w)`.
pub struct IpptsAlgorithm;

impl IpptsAlgorithm {
    pub fn new() -> Self {
        IpptsAlgorithm
    }
}

impl Algorithm for IpptsAlgorithm {
    fn name(&self) -> &str {
        "IPPTS"
    }

    fn prioritize(&mut self, state: &mut RunState) {
        for task_id in 0..state.dag.task_count() {
            let out_degree = state.dag.get_task(task_id).children.len() as f64;
            state.dag.get_task_mut(task_id).priority =
                out_degree * RankTables::row_mean(&state.tables.prm[task_id]);
        }
    }

    fn allocate(&mut self, task_id: usize, state: &mut RunState) {
        allocate_to_min(state, task_id, |state, proc_id, eft| {
            eft + state.tables.prm[task_id][proc_id] - state.tables.comp[task_id][proc_id]
        });
    }
}
