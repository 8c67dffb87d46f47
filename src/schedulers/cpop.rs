//! Critical Path On a Processor.

use crate::is_equal;
use crate::runner::RunState;
use crate::scheduler::Algorithm;
use crate::schedulers::common::{allocate_to, allocate_to_min};
use crate::system::System;

/// Ranks tasks by the sum of upward and downward ranks. Tasks on the
/// critical path are pinned to the fastest processor to keep the path
/// itself short; all other tasks fall back to earliest finish time.
pub struct CpopAlgorithm {
    critical: Vec<bool>,
    cp_processor: usize,
}

impl CpopAlgorithm {
    pub fn new() -> Self {
        CpopAlgorithm {
            critical: Vec::new(),
            cp_processor: 0,
        }
    }
}

impl Algorithm for CpopAlgorithm {
    fn name(&self) -> &str {
        "CPOP"
    }

    fn prioritize(&mut self, state: &mut RunState) {
        let task_count = state.dag.task_count();
        for task_id in 0..task_count {
            state.dag.get_task_mut(task_id).priority =
                state.tables.rank_u[task_id] + state.tables.rank_d[task_id];
        }
        let entry_priority = state
            .dag
            .entry_tasks()
            .into_iter()
            .map(|t| state.dag.get_task(t).priority)
            .max_by(|a, b| a.total_cmp(b))
            .unwrap_or(0.);
        self.critical = (0..task_count)
            .map(|t| is_equal(state.dag.get_task(t).priority, entry_priority))
            .collect();
        self.cp_processor = System::new(state.processors).fastest_processor();
    }

    fn allocate(&mut self, task_id: usize, state: &mut RunState) {
        if self.critical[task_id] {
            allocate_to(state, task_id, self.cp_processor);
        } else {
            allocate_to_min(state, task_id, |_, _, eft| eft);
        }
    }
}
