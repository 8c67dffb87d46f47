//! Metrics derived from a committed schedule.

use serde::Serialize;

use crate::cost::CostModel;
use crate::dag::Dag;
use crate::dag_stats::DagStats;
use crate::error::{Error, Result};
use crate::is_equal;
use crate::resource::Processor;
use crate::schedulers::tables::RankTables;
use crate::system::System;

/// Metrics of one (workflow, processor set, algorithm) run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingResult {
    pub workflow_name: String,
    pub algorithm_name: String,
    pub number_of_task: usize,
    pub number_of_processor: usize,
    pub makespan: f64,
    pub speedup: f64,
    pub efficiency: f64,
    pub schedule_length_ratio: f64,
    pub throughput: f64,
    pub dag_stats: DagStats,
    pub resource_utilization: Vec<ResourceUtilization>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUtilization {
    pub processor: String,
    pub percent: f64,
}

/// Wall-clock finish time of the last task.
pub fn makespan(dag: &Dag) -> Result<f64> {
    if dag.get_tasks().is_empty() {
        return Err(Error::EmptyTaskList);
    }
    Ok(dag
        .get_tasks()
        .iter()
        .map(|t| t.finish_time)
        .max_by(|a, b| a.total_cmp(b))
        .unwrap())
}

/// Time the given tasks would take back-to-back on one processor,
/// charging each task its median computation cost.
pub fn sequential_time(tasks: &[usize], dag: &Dag, system: System) -> Result<f64> {
    if tasks.is_empty() {
        return Err(Error::EmptyTaskList);
    }
    Ok(tasks
        .iter()
        .map(|&t| system.median_computation_cost(dag.get_task(t)))
        .sum())
}

/// Ratio of the sequential execution time to the makespan.
pub fn speedup(dag: &Dag, system: System) -> Result<f64> {
    let makespan = makespan(dag)?;
    if makespan <= 0. {
        return Err(Error::ZeroMakespan);
    }
    let all_tasks: Vec<usize> = (0..dag.task_count()).collect();
    Ok(sequential_time(&all_tasks, dag, system)? / makespan)
}

/// Speedup normalised by the processor count.
pub fn efficiency(dag: &Dag, system: System) -> Result<f64> {
    Ok(speedup(dag, system)? / system.processors.len() as f64)
}

/// Makespan divided by the sequential time of the given tasks; pass the
/// critical path for CPOP-style reports, all tasks otherwise.
pub fn schedule_length_ratio(tasks: &[usize], dag: &Dag, system: System) -> Result<f64> {
    let makespan = makespan(dag)?;
    if makespan <= 0. {
        return Err(Error::ZeroMakespan);
    }
    Ok(makespan / sequential_time(tasks, dag, system)?)
}

/// Completed tasks per minute.
pub fn throughput(dag: &Dag) -> Result<f64> {
    let makespan = makespan(dag)?;
    if makespan <= 0. {
        return Err(Error::ZeroMakespan);
    }
    Ok(dag.task_count() as f64 / makespan * 60.)
}

/// Share of the total busy time spent on each processor, in percent.
pub fn resource_utilization(processors: &[Processor]) -> Vec<ResourceUtilization> {
    let total: f64 = processors.iter().map(|p| p.running_time()).sum();
    processors
        .iter()
        .map(|p| ResourceUtilization {
            processor: p.name.clone(),
            percent: if total > 0. {
                p.running_time() / total * 100.
            } else {
                0.
            },
        })
        .collect()
}

/// Extracts the critical path: the entry task maximising
/// `rank_u + rank_d`, then at every step a child whose combined rank
/// equals the entry's.
pub fn critical_path(dag: &Dag, tables: &RankTables) -> Vec<usize> {
    let priority = |t: usize| tables.rank_u[t] + tables.rank_d[t];
    let entry = dag
        .entry_tasks()
        .into_iter()
        .max_by(|&a, &b| priority(a).total_cmp(&priority(b)));
    let Some(entry) = entry else {
        return Vec::new();
    };
    let entry_priority = priority(entry);
    let mut path = vec![entry];
    let mut current = entry;
    while let Some(&next) = dag
        .get_task(current)
        .children
        .iter()
        .find(|&&c| is_equal(priority(c), entry_priority))
    {
        path.push(next);
        current = next;
    }
    path
}

/// Gathers all metrics of a committed schedule into one result record.
pub fn collect_result(
    dag: &Dag,
    processors: &[Processor],
    tables: &RankTables,
    costs: &CostModel,
    algorithm_name: &str,
) -> Result<SchedulingResult> {
    let system = System::new(processors);
    let all_tasks: Vec<usize> = (0..dag.task_count()).collect();
    Ok(SchedulingResult {
        workflow_name: dag.name().to_string(),
        algorithm_name: algorithm_name.to_string(),
        number_of_task: dag.task_count(),
        number_of_processor: processors.len(),
        makespan: makespan(dag)?,
        speedup: speedup(dag, system)?,
        efficiency: efficiency(dag, system)?,
        schedule_length_ratio: schedule_length_ratio(&all_tasks, dag, system)?,
        throughput: throughput(dag)?,
        dag_stats: DagStats::new(dag, system, costs, tables)?,
        resource_utilization: resource_utilization(processors),
    })
}
