use std::cmp::Ordering;

use log::debug;

use crate::cost::CostModel;
use crate::dag::Dag;
use crate::runner::RunState;

/// A task placed on a processor timeline, keyed by its estimated times.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledTask {
    pub start_time: f64,
    pub finish_time: f64,
    pub task: usize,
}

impl ScheduledTask {
    pub fn new(start_time: f64, finish_time: f64, task: usize) -> ScheduledTask {
        ScheduledTask {
            start_time,
            finish_time,
            task,
        }
    }
}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(
            self.start_time
                .total_cmp(&other.start_time)
                .then(self.finish_time.total_cmp(&other.finish_time))
                .then(self.task.cmp(&other.task)),
        )
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap()
    }
}

impl Eq for ScheduledTask {}

/// Finds the earliest gap of a processor timeline that fits a slot of
/// `comp` time units starting no earlier than `ready_time`.
///
/// `schedule` is ordered by ascending start time. Returns the start time
/// and the insertion index. The walk runs from the tail towards the head
/// so that, among feasible gaps, the earliest one wins; a slot is never
/// placed before `ready_time` and never overlaps an existing one.
pub fn find_slot(schedule: &[ScheduledTask], ready_time: f64, comp: f64) -> (f64, usize) {
    if schedule.is_empty() {
        return (ready_time, 0);
    }
    let mut start = ready_time.max(schedule[schedule.len() - 1].finish_time);
    let mut index = schedule.len();
    for i in (1..schedule.len()).rev() {
        let gap_start = schedule[i - 1].finish_time;
        let gap_finish = schedule[i].start_time;
        if ready_time > gap_start {
            // gaps further towards the head lie entirely before ready_time
            if ready_time + comp <= gap_finish {
                start = ready_time;
                index = i;
            }
            break;
        }
        if gap_start + comp <= gap_finish {
            start = gap_start;
            index = i;
        }
    }
    if ready_time + comp <= schedule[0].start_time {
        start = ready_time;
        index = 0;
    }
    (start, index)
}

/// Earliest finish time of a task on a processor, honouring the already
/// placed slots.
///
/// With `commit` the slot is spliced into the processor timeline, the
/// task's estimated times and processor are written and the processor's
/// estimated ready time is advanced. Under the port constraint the
/// estimated sending/receiving windows are reserved as well.
pub fn find_earliest_finish_time(
    state: &mut RunState,
    task_id: usize,
    proc_id: usize,
    ready_time: f64,
    commit: bool,
) -> f64 {
    let comp = CostModel::computation_cost(state.dag.get_task(task_id), &state.processors[proc_id]);
    let (start, index) = find_slot(&state.schedules[proc_id], ready_time, comp);
    let finish = start + comp;
    if commit {
        state.schedules[proc_id].insert(index, ScheduledTask::new(start, finish, task_id));
        state.processors[proc_id].estimated_ready_time =
            state.schedules[proc_id].last().unwrap().finish_time;
        let port_constraint = state.config.port_constraint;
        let task = state.dag.get_task_mut(task_id);
        task.estimated_start_time = start;
        task.estimated_finish_time = finish;
        task.processor = Some(proc_id);
        task.is_estimated = true;
        if port_constraint && comp != 0. {
            let sending = task.sending_latency;
            let receiving = task.receiving_latency;
            state.reservations[proc_id].reserve(start - sending, start);
            state.reservations[proc_id].reserve(finish, finish + receiving);
        }
        debug!(
            "scheduling task {} on processor {} at {:.3}-{:.3}",
            state.dag.get_task(task_id).name,
            state.processors[proc_id].name,
            start,
            finish
        );
    }
    finish
}

/// Earliest time at which all inputs of a task can be present on a
/// processor: the processor's estimated ready time and every parent's
/// estimated finish plus the transfer from its processor.
pub fn earliest_start_time(state: &RunState, task_id: usize, proc_id: usize) -> f64 {
    let proc = &state.processors[proc_id];
    let mut est = proc.estimated_ready_time;
    for &parent in state.dag.get_task(task_id).parents.iter() {
        let parent_task = state.dag.get_task(parent);
        let from = &state.processors[parent_task.processor.expect("parent is not scheduled")];
        est = est.max(
            parent_task.estimated_finish_time
                + state
                    .costs
                    .communication_cost_between(state.dag, parent, task_id, from, proc),
        );
    }
    est
}

/// Evaluates placing a task on a processor without committing; returns
/// the ready time fed to the slot search and the resulting finish time.
pub fn evaluate_assignment(state: &RunState, task_id: usize, proc_id: usize) -> (f64, f64) {
    let task = state.dag.get_task(task_id);
    let comp = CostModel::computation_cost(task, &state.processors[proc_id]);
    let mut ready = earliest_start_time(state, task_id, proc_id);
    if state.config.port_constraint {
        ready = state.reservations[proc_id].earliest_ready(
            ready,
            comp,
            task.sending_latency,
            task.receiving_latency,
        ) + task.sending_latency;
    }
    let (start, _) = find_slot(&state.schedules[proc_id], ready, comp);
    (ready, start + comp)
}

/// Commits a task to the processor minimising the given objective.
///
/// The objective receives the candidate processor and the earliest finish
/// time on it; ties keep the lowest processor id.
pub fn allocate_to_min<F>(state: &mut RunState, task_id: usize, objective: F)
where
    F: Fn(&RunState, usize, f64) -> f64,
{
    let mut best: Option<(f64, usize, f64)> = None;
    for proc_id in 0..state.processors.len() {
        let (ready, eft) = evaluate_assignment(state, task_id, proc_id);
        let score = objective(state, proc_id, eft);
        if best.map_or(true, |(best_score, _, _)| score < best_score) {
            best = Some((score, proc_id, ready));
        }
    }
    let (_, proc_id, ready) = best.expect("processor set is empty");
    find_earliest_finish_time(state, task_id, proc_id, ready, true);
}

/// Commits a task to a fixed processor.
pub fn allocate_to(state: &mut RunState, task_id: usize, proc_id: usize) {
    let (ready, _) = evaluate_assignment(state, task_id, proc_id);
    find_earliest_finish_time(state, task_id, proc_id, ready, true);
}

fn topsort_dfs(v: usize, dag: &Dag, used: &mut Vec<bool>, order: &mut Vec<usize>) {
    used[v] = true;
    for &child in dag.get_task(v).children.iter() {
        if !used[child] {
            topsort_dfs(child, dag, used, order);
        }
    }
    order.push(v);
}

/// Topological order of the DAG: every parent precedes its children.
pub fn topsort(dag: &Dag) -> Vec<usize> {
    let mut order = Vec::with_capacity(dag.task_count());
    let mut used = vec![false; dag.task_count()];
    for i in 0..dag.task_count() {
        if !used[i] {
            topsort_dfs(i, dag, &mut used, &mut order);
        }
    }
    assert_eq!(order.len(), dag.task_count());
    order.reverse();
    order
}
