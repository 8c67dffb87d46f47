//! Workflow statistics.

use serde::Serialize;

use crate::cost::CostModel;
use crate::dag::Dag;
use crate::error::{Error, Result};
use crate::run_stats::critical_path;
use crate::schedulers::tables::RankTables;
use crate::system::System;

/// Structural and cost statistics of a workflow on a processor set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DagStats {
    /// Total number of tasks.
    pub task_count: usize,
    /// Total number of precedence edges.
    pub edge_count: usize,
    /// Size of the largest level.
    pub width: usize,
    /// Number of levels.
    pub height: usize,
    /// Edge count over the maximum possible number of edges.
    pub density: f64,
    /// Communication-to-computation ratio at mean bandwidth and mean
    /// computation cost.
    pub ccr: f64,
    /// Sum of mean computation costs along the critical path.
    pub critical_path_cost: f64,
    pub rank_u_profile: SequenceStats,
    pub rank_d_profile: SequenceStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceStats {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub avg: f64,
    /// Standard deviation.
    pub std: f64,
}

impl FromIterator<f64> for SequenceStats {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = f64>,
    {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        let mut sum = 0.;
        let mut sq_sum = 0.;
        let mut cnt = 0usize;
        for val in iter {
            min = min.min(val);
            max = max.max(val);
            sum += val;
            sq_sum += val * val;
            cnt += 1;
        }
        let mut avg = sum / cnt as f64;
        let mut std = ((sq_sum / cnt as f64 - avg * avg).max(0.)).sqrt();
        if cnt == 0 {
            min = 0.;
            max = 0.;
            avg = 0.;
            std = 0.;
        }
        Self { min, max, sum, avg, std }
    }
}

impl DagStats {
    pub fn new(dag: &Dag, system: System, costs: &CostModel, tables: &RankTables) -> Result<Self> {
        let task_count = dag.task_count();
        let edge_count = dag.edge_count();
        let levels = dag.levels();

        let total_computation: f64 = tables.mean_comp.iter().sum();
        if total_computation <= 0. {
            return Err(Error::ZeroComputation);
        }
        let mean_bandwidth = system.mean_bandwidth();
        let total_communication: f64 = (0..task_count)
            .flat_map(|t| {
                dag.get_task(t)
                    .children
                    .iter()
                    .map(move |&c| costs.communication_cost(dag, t, c, mean_bandwidth))
            })
            .sum();

        Ok(DagStats {
            task_count,
            edge_count,
            width: levels.iter().map(|l| l.len()).max().unwrap_or(0),
            height: levels.len(),
            density: if task_count > 1 {
                edge_count as f64 / (task_count * (task_count - 1) / 2) as f64
            } else {
                0.
            },
            ccr: total_communication / total_computation,
            critical_path_cost: critical_path(dag, tables)
                .into_iter()
                .map(|t| tables.mean_comp[t])
                .sum(),
            rank_u_profile: tables.rank_u.iter().copied().collect(),
            rank_d_profile: tables.rank_d.iter().copied().collect(),
        })
    }
}
