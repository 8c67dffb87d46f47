//! Improved Predict Earliest Finish Time.

use crate::runner::RunState;
use crate::scheduler::Algorithm;
use crate::schedulers::common::allocate_to_min;
use crate::schedulers::tables::RankTables;

/// Ranks tasks by the mean pessimistic cost plus the mean computation
/// cost. Selection depends on the critical nodes: a task whose child is
/// critical (while the task itself is not) takes the plain earliest
/// finish time, any other task minimises `eft + cnct`.
pub struct IpeftAlgorithm {
    contains_critical_child: Vec<bool>,
}

impl IpeftAlgorithm {
    pub fn new() -> Self {
        IpeftAlgorithm {
            contains_critical_child: Vec::new(),
        }
    }
}

impl Algorithm for IpeftAlgorithm {
    fn name(&self) -> &str {
        "IPEFT"
    }

    fn prioritize(&mut self, state: &mut RunState) {
        let task_count = state.dag.task_count();
        for task_id in 0..task_count {
            state.dag.get_task_mut(task_id).priority =
                RankTables::row_mean(&state.tables.pct[task_id]) + state.tables.mean_comp[task_id];
        }
        self.contains_critical_child = (0..task_count)
            .map(|t| {
                !state.tables.critical_node[t]
                    && state
                        .dag
                        .get_task(t)
                        .children
                        .iter()
                        .any(|&c| state.tables.critical_node[c])
            })
            .collect();
    }

    fn allocate(&mut self, task_id: usize, state: &mut RunState) {
        if self.contains_critical_child[task_id] {
            allocate_to_min(state, task_id, |_, _, eft| eft);
        } else {
            allocate_to_min(state, task_id, |state, proc_id, eft| {
                eft + state.tables.cnct[task_id][proc_id]
            });
        }
    }
}
