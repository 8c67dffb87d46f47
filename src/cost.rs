//! Computation and communication costs.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::dag::Dag;
use crate::file_item::FileType;
use crate::resource::Processor;
use crate::task::Task;

/// Cost library for one processor scenario.
///
/// Communication costs are memoised by (bandwidth, parent, child) since
/// the rank computations query the same edges repeatedly. The cache must
/// be [cleared](CostModel::clear) when switching to a processor set with
/// different bandwidths.
pub struct CostModel {
    comm_cache: RefCell<HashMap<(u64, usize, usize), f64>>,
}

impl CostModel {
    pub fn new() -> Self {
        Self {
            comm_cache: RefCell::new(HashMap::new()),
        }
    }

    /// Execution time of a task on a processor.
    pub fn computation_cost(task: &Task, processor: &Processor) -> f64 {
        task.length / processor.mips
    }

    /// Time to transfer the payload of edge (parent, child) at the given
    /// bandwidth in megabit/s.
    ///
    /// The payload is the total size of the child's input items for which
    /// the parent produces an output item of the same name.
    pub fn communication_cost(&self, dag: &Dag, parent: usize, child: usize, bandwidth: f64) -> f64 {
        let key = (bandwidth.to_bits(), parent, child);
        if let Some(&cost) = self.comm_cache.borrow().get(&key) {
            return cost;
        }
        let payload_bytes: u64 = dag
            .get_task(child)
            .files_of_type(FileType::Input)
            .filter(|input| {
                dag.get_task(parent)
                    .files_of_type(FileType::Output)
                    .any(|output| output.name == input.name)
            })
            .map(|input| input.size)
            .sum();
        let megabits = payload_bytes as f64 / 1e6 * 8.;
        let cost = megabits / bandwidth;
        self.comm_cache.borrow_mut().insert(key, cost);
        cost
    }

    /// Transfer time of edge (parent, child) between two processors.
    ///
    /// Zero on the same host; otherwise the slower of the two links
    /// limits the effective bandwidth.
    pub fn communication_cost_between(
        &self,
        dag: &Dag,
        parent: usize,
        child: usize,
        from: &Processor,
        to: &Processor,
    ) -> f64 {
        if from.id == to.id {
            return 0.;
        }
        self.communication_cost(dag, parent, child, from.bandwidth.min(to.bandwidth))
    }

    /// Drops all memoised communication costs.
    pub fn clear(&self) {
        self.comm_cache.borrow_mut().clear();
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::new()
    }
}
