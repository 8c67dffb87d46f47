//! Shared scheduling loop and commit pass.

use crate::cost::CostModel;
use crate::dag::Dag;
use crate::error::{Error, Result};
use crate::is_equal;
use crate::port::PortSchedule;
use crate::resource::Processor;
use crate::scheduler::Algorithm;
use crate::schedulers::common::ScheduledTask;
use crate::schedulers::tables::RankTables;
use crate::EPSILON;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunConfig {
    pub port_constraint: bool,
}

/// Mutable state of one scheduling run.
///
/// Holds the task and processor handles together with the per-processor
/// timelines and port reservations. The rank tables and the cost model
/// are read-only for the whole run.
pub struct RunState<'a> {
    pub dag: &'a mut Dag,
    pub processors: &'a mut [Processor],
    pub tables: &'a RankTables,
    pub costs: &'a CostModel,
    pub schedules: Vec<Vec<ScheduledTask>>,
    pub reservations: Vec<PortSchedule>,
    pub config: RunConfig,
}

impl<'a> RunState<'a> {
    pub fn new(
        dag: &'a mut Dag,
        processors: &'a mut [Processor],
        tables: &'a RankTables,
        costs: &'a CostModel,
        config: RunConfig,
    ) -> Self {
        let proc_count = processors.len();
        Self {
            dag,
            processors,
            tables,
            costs,
            schedules: vec![Vec::new(); proc_count],
            reservations: vec![PortSchedule::new(); proc_count],
            config,
        }
    }
}

/// Runs the list-scheduling loop: repeatedly picks the ready task with
/// the highest priority and lets the algorithm place it.
///
/// A task becomes ready once all its parents are placed, so every
/// `allocate` call sees estimated finish times and processors for all
/// predecessors. Ties in priority keep ready-queue insertion order
/// unless the algorithm overrides the tie-break.
pub fn build_schedule(algorithm: &mut dyn Algorithm, state: &mut RunState) {
    algorithm.prioritize(state);

    let task_count = state.dag.task_count();
    let mut done = vec![false; task_count];
    let mut queued = vec![false; task_count];
    let mut ready = state.dag.entry_tasks();
    for &t in ready.iter() {
        queued[t] = true;
    }

    while !ready.is_empty() {
        let mut best = 0;
        for i in 1..ready.len() {
            let priority = state.dag.get_task(ready[i]).priority;
            let best_priority = state.dag.get_task(ready[best]).priority;
            if priority > best_priority + EPSILON {
                best = i;
            } else if algorithm.breaks_ties_by_mean_cost()
                && is_equal(priority, best_priority)
                && state.tables.mean_comp[ready[i]] < state.tables.mean_comp[ready[best]] - EPSILON
            {
                best = i;
            }
        }
        let task_id = ready.remove(best);
        algorithm.allocate(task_id, state);
        done[task_id] = true;
        let children = state.dag.get_task(task_id).children.clone();
        for child in children {
            if !queued[child] && state.dag.get_task(child).parents.iter().all(|&p| done[p]) {
                ready.push(child);
                queued[child] = true;
            }
        }
    }
}

/// Replays the estimated schedule in start order and assigns final times.
///
/// Tasks are committed in ascending estimated start time (ties by
/// estimated finish time). Under the port constraint the ready time also
/// waits for the parents' receiving phases and is passed through a fresh
/// reservation list, and the full sending/computation/receiving timeline
/// is written.
pub fn commit_schedule(state: &mut RunState) -> Result<()> {
    let task_count = state.dag.task_count();
    let mut order: Vec<usize> = (0..task_count).collect();
    order.sort_by(|&a, &b| {
        let ta = state.dag.get_task(a);
        let tb = state.dag.get_task(b);
        ta.estimated_start_time
            .total_cmp(&tb.estimated_start_time)
            .then(ta.estimated_finish_time.total_cmp(&tb.estimated_finish_time))
    });

    let mut ports: Vec<PortSchedule> = vec![PortSchedule::new(); state.processors.len()];

    for task_id in order {
        let proc_id = state
            .dag
            .get_task(task_id)
            .processor
            .expect("commit on a task that was never placed");
        let comp = CostModel::computation_cost(state.dag.get_task(task_id), &state.processors[proc_id]);

        let mut ready = state.processors[proc_id].ready_time();
        for &parent in state.dag.get_task(task_id).parents.iter() {
            let parent_task = state.dag.get_task(parent);
            if parent_task.finish_time < 0. {
                return Err(Error::PrecedenceViolation {
                    task: state.dag.get_task(task_id).name.clone(),
                    parent: parent_task.name.clone(),
                });
            }
            let from = &state.processors[parent_task.processor.expect("parent is not scheduled")];
            ready = ready.max(
                parent_task.finish_time
                    + state.costs.communication_cost_between(
                        state.dag,
                        parent,
                        task_id,
                        from,
                        &state.processors[proc_id],
                    ),
            );
        }

        if state.config.port_constraint {
            for &parent in state.dag.get_task(task_id).parents.iter() {
                ready = ready.max(state.dag.get_task(parent).finish_receiving_time);
            }
            let task = state.dag.get_task(task_id);
            let ready = ports[proc_id].earliest_ready(ready, comp, task.sending_latency, task.receiving_latency);
            let task = state.dag.get_task_mut(task_id);
            task.ready_time = ready;
            task.start_sending_time = ready;
            task.finish_sending_time = ready + task.sending_latency;
            task.start_time = task.finish_sending_time;
            task.finish_time = task.start_time + comp;
            task.start_receiving_time = task.finish_time;
            task.finish_receiving_time = task.start_receiving_time + task.receiving_latency;
            task.is_estimated = false;
            if comp != 0. {
                ports[proc_id].reserve(task.start_sending_time, task.finish_sending_time);
                ports[proc_id].reserve(task.start_receiving_time, task.finish_receiving_time);
            }
            let finish_receiving = state.dag.get_task(task_id).finish_receiving_time;
            state.processors[proc_id].set_ready_time(finish_receiving);
        } else {
            let task = state.dag.get_task_mut(task_id);
            task.ready_time = ready;
            task.start_time = ready;
            task.finish_time = ready + comp;
            task.is_estimated = false;
            let finish = state.dag.get_task(task_id).finish_time;
            state.processors[proc_id].set_ready_time(finish);
        }
        state.processors[proc_id].add_running_time(comp);
    }
    Ok(())
}

/// Resets all per-run state, builds the estimated schedule with the given
/// algorithm and commits it to final times.
pub fn run_algorithm(
    algorithm: &mut dyn Algorithm,
    dag: &mut Dag,
    processors: &mut [Processor],
    tables: &RankTables,
    costs: &CostModel,
    config: RunConfig,
) -> Result<()> {
    dag.reset();
    for processor in processors.iter_mut() {
        processor.reset();
    }
    let mut state = RunState::new(dag, processors, tables, costs, config);
    build_schedule(algorithm, &mut state);
    commit_schedule(&mut state)
}
