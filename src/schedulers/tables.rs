//! Priority tables derived from a DAG and a processor set.

use crate::cost::CostModel;
use crate::dag::Dag;
use crate::is_equal;
use crate::resource::Processor;
use crate::schedulers::common::topsort;
use crate::system::System;

/// Memoised rank tables shared by all scheduling policies.
///
/// Built once per (DAG, processor set) pair and read-only afterwards.
/// Every table is filled iteratively along a topological order, so the
/// values are independent of task iteration order.
pub struct RankTables {
    /// w(t, p): computation cost of task t on processor p.
    pub comp: Vec<Vec<f64>>,
    /// Mean computation cost of each task over all processors.
    pub mean_comp: Vec<f64>,
    /// Upward rank: longest mean-cost path from a task to any exit.
    pub rank_u: Vec<f64>,
    /// Downward rank: longest mean-cost path from any entry to a task.
    pub rank_d: Vec<f64>,
    /// Per-processor upward rank matrix; the processor's own computation
    /// cost is charged once per task, not along the whole path.
    pub urm: Vec<Vec<f64>>,
    /// Optimistic cost table: cheapest remaining work from each task.
    pub oct: Vec<Vec<f64>>,
    /// Pessimistic cost table: costliest remaining work from each task.
    pub pct: Vec<Vec<f64>>,
    /// Predict cost matrix: lookahead combining the task's and the best
    /// child's computation costs.
    pub prm: Vec<Vec<f64>>,
    /// Average earliest start time of each task.
    pub aest: Vec<f64>,
    /// Average latest start time of each task.
    pub alst: Vec<f64>,
    /// Tasks whose average earliest and latest start times coincide.
    pub critical_node: Vec<bool>,
    /// Critical-node cost table used by IPEFT processor selection.
    pub cnct: Vec<Vec<f64>>,
}

impl RankTables {
    pub fn build(dag: &Dag, processors: &[Processor], costs: &CostModel) -> Self {
        let n = dag.task_count();
        let m = processors.len();
        let system = System::new(processors);
        let mean_bandwidth = system.mean_bandwidth();
        let comm = |u: usize, v: usize| costs.communication_cost(dag, u, v, mean_bandwidth);

        let comp: Vec<Vec<f64>> = dag
            .get_tasks()
            .iter()
            .map(|t| processors.iter().map(|p| t.length / p.mips).collect())
            .collect();
        let mean_comp: Vec<f64> = dag.get_tasks().iter().map(|t| system.mean_computation_cost(t)).collect();

        let order = topsort(dag);

        let mut rank_u = vec![0.; n];
        for &t in order.iter().rev() {
            rank_u[t] = mean_comp[t]
                + dag
                    .get_task(t)
                    .children
                    .iter()
                    .map(|&c| comm(t, c) + rank_u[c])
                    .max_by(|a, b| a.total_cmp(b))
                    .unwrap_or(0.);
        }

        let mut rank_d = vec![0.; n];
        for &t in order.iter() {
            rank_d[t] = dag
                .get_task(t)
                .parents
                .iter()
                .map(|&p| rank_d[p] + mean_comp[p] + comm(p, t))
                .max_by(|a, b| a.total_cmp(b))
                .unwrap_or(0.);
        }

        let mut urm = vec![vec![0.; m]; n];
        for &t in order.iter().rev() {
            for p in 0..m {
                urm[t][p] = comp[t][p]
                    + dag
                        .get_task(t)
                        .children
                        .iter()
                        .map(|&c| comm(t, c) + urm[c][p])
                        .max_by(|a, b| a.total_cmp(b))
                        .unwrap_or(0.);
            }
        }

        let mut oct = vec![vec![0.; m]; n];
        for &t in order.iter().rev() {
            for p in 0..m {
                oct[t][p] = dag
                    .get_task(t)
                    .children
                    .iter()
                    .map(|&c| {
                        (0..m)
                            .map(|q| oct[c][q] + comp[c][q] + if q == p { 0. } else { comm(t, c) })
                            .min_by(|a, b| a.total_cmp(b))
                            .unwrap()
                    })
                    .max_by(|a, b| a.total_cmp(b))
                    .unwrap_or(0.);
            }
        }

        let mut pct = vec![vec![0.; m]; n];
        for &t in order.iter().rev() {
            for p in 0..m {
                pct[t][p] = dag
                    .get_task(t)
                    .children
                    .iter()
                    .map(|&c| {
                        (0..m)
                            .map(|q| pct[c][q] + comp[c][q] + if q == p { 0. } else { comm(t, c) })
                            .max_by(|a, b| a.total_cmp(b))
                            .unwrap()
                    })
                    .max_by(|a, b| a.total_cmp(b))
                    .unwrap_or(0.);
            }
        }

        let mut prm = vec![vec![0.; m]; n];
        for &t in order.iter().rev() {
            for p in 0..m {
                let task = dag.get_task(t);
                prm[t][p] = if task.is_exit() {
                    comp[t][p]
                } else {
                    task.children
                        .iter()
                        .map(|&c| {
                            (0..m)
                                .map(|q| {
                                    prm[c][q] + comp[t][q] + comp[c][q] + if q == p { 0. } else { comm(t, c) }
                                })
                                .min_by(|a, b| a.total_cmp(b))
                                .unwrap()
                        })
                        .max_by(|a, b| a.total_cmp(b))
                        .unwrap()
                };
            }
        }

        let mut aest = vec![0.; n];
        for &t in order.iter() {
            aest[t] = dag
                .get_task(t)
                .parents
                .iter()
                .map(|&p| aest[p] + mean_comp[p] + comm(p, t))
                .max_by(|a, b| a.total_cmp(b))
                .unwrap_or(0.);
        }

        let mut alst = vec![0.; n];
        for &t in order.iter().rev() {
            let task = dag.get_task(t);
            alst[t] = if task.is_exit() {
                aest[t]
            } else {
                task.children
                    .iter()
                    .map(|&c| alst[c] - comm(t, c))
                    .min_by(|a, b| a.total_cmp(b))
                    .unwrap()
                    - mean_comp[t]
            };
        }

        let critical_node: Vec<bool> = (0..n).map(|t| is_equal(aest[t], alst[t])).collect();

        let mut cnct = vec![vec![0.; m]; n];
        for &t in order.iter().rev() {
            for p in 0..m {
                cnct[t][p] = dag
                    .get_task(t)
                    .children
                    .iter()
                    .map(|&c| {
                        (0..m)
                            .map(|q| cnct[c][q] + comp[c][q] + if q == p { 0. } else { comm(t, c) })
                            .min_by(|a, b| a.total_cmp(b))
                            .unwrap()
                    })
                    .max_by(|a, b| a.total_cmp(b))
                    .unwrap_or(0.);
            }
        }

        Self {
            comp,
            mean_comp,
            rank_u,
            rank_d,
            urm,
            oct,
            pct,
            prm,
            aest,
            alst,
            critical_node,
            cnct,
        }
    }

    /// Arithmetic mean of a matrix row.
    pub fn row_mean(row: &[f64]) -> f64 {
        row.iter().sum::<f64>() / row.len() as f64
    }
}
