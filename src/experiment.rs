//! Tool for running simulations across many (workflow, scenario, algorithm) combinations.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use enum_iterator::IntoEnumIterator;
use itertools::Itertools;
use log::error;
use threadpool::ThreadPool;

use crate::cost::CostModel;
use crate::dag::Dag;
use crate::error::Result;
use crate::parsers::{find_workflow_files, load_dax, load_environment, Constraints, Environment, Scenario, SimulationConfig};
use crate::run_stats::{collect_result, SchedulingResult};
use crate::runner::{run_algorithm, RunConfig};
use crate::scheduler::AlgorithmKind;
use crate::schedulers::tables::RankTables;

/// A sweep over all (workflow, scenario, algorithm) combinations of a
/// simulation config.
pub struct Experiment {
    workflows: Vec<Dag>,
    environment: Environment,
}

impl Experiment {
    /// Loads the environment and every workflow of the configured
    /// directory; inserts pseudo tasks when the environment asks for
    /// them.
    pub fn load(config: &SimulationConfig) -> Result<Self> {
        let environment = load_environment(&config.environment_path)?;
        let mut workflows = find_workflow_files(&config.workflow_dir)?
            .iter()
            .map(load_dax)
            .collect::<Result<Vec<_>>>()?;
        if environment.constraints.pseudo_task {
            for dag in workflows.iter_mut() {
                dag.insert_pseudo_tasks();
            }
        }
        Ok(Self { workflows, environment })
    }

    /// Runs the sweep on a thread pool and returns the sorted results.
    ///
    /// Every (workflow, scenario) pair is one unit of work: it owns its
    /// task and processor copies, builds the cost model and rank tables
    /// once and runs all algorithms of the default sweep against them.
    pub fn run(self, num_threads: usize) -> Vec<SchedulingResult> {
        let constraints = self.environment.constraints;
        let jobs = self
            .workflows
            .into_iter()
            .cartesian_product(self.environment.scenarios)
            .collect::<Vec<_>>();
        let total_jobs = jobs.len();

        let finished_jobs_atomic = Arc::new(AtomicUsize::new(0));
        let results = Arc::new(Mutex::new(Vec::new()));

        let pool = ThreadPool::new(num_threads);
        let start_time = Instant::now();
        for (dag, scenario) in jobs.into_iter() {
            let finished_jobs_atomic = finished_jobs_atomic.clone();
            let results = results.clone();
            pool.execute(move || {
                let job_results = run_scenario(dag, scenario, constraints);
                results.lock().unwrap().extend(job_results);

                let finished_jobs = finished_jobs_atomic.fetch_add(1, Ordering::SeqCst) + 1;
                let elapsed = start_time.elapsed();
                let remaining = Duration::from_secs_f64(
                    elapsed.as_secs_f64() / finished_jobs as f64 * (total_jobs - finished_jobs) as f64,
                );
                print!("\r{}", " ".repeat(70));
                print!(
                    "\rFinished {}/{} [{}%] runs in {:.2?}, remaining time: {:.2?}",
                    finished_jobs,
                    total_jobs,
                    (finished_jobs as f64 * 100. / total_jobs as f64).round() as i32,
                    elapsed,
                    remaining
                );
                std::io::stdout().flush().unwrap();
            });
        }
        pool.join();

        print!("\r{}", " ".repeat(70));
        println!("\rFinished {} runs in {:.2?}", total_jobs, start_time.elapsed());

        let mut results = Arc::try_unwrap(results).unwrap().into_inner().unwrap();
        results.sort_by(|a, b| {
            (&a.workflow_name, a.number_of_processor, &a.algorithm_name).cmp(&(
                &b.workflow_name,
                b.number_of_processor,
                &b.algorithm_name,
            ))
        });
        results
    }

    /// Writes one JSON array per workflow to `<out_dir>/<workflow>.json`.
    pub fn save_results<P: AsRef<Path>>(results: &[SchedulingResult], out_dir: P) -> std::io::Result<()> {
        std::fs::create_dir_all(&out_dir)?;
        let mut by_workflow: BTreeMap<&str, Vec<&SchedulingResult>> = BTreeMap::new();
        for result in results.iter() {
            by_workflow.entry(&result.workflow_name).or_default().push(result);
        }
        for (workflow, group) in by_workflow.into_iter() {
            let path = out_dir.as_ref().join(format!("{}.json", workflow));
            std::fs::write(&path, serde_json::to_string_pretty(&group).unwrap())?;
        }
        Ok(())
    }
}

/// Schedules one workflow on one processor set with every algorithm of
/// the default sweep.
pub fn run_scenario(mut dag: Dag, scenario: Scenario, constraints: Constraints) -> Vec<SchedulingResult> {
    let mut processors = scenario.processors;
    let costs = CostModel::new();
    let tables = RankTables::build(&dag, &processors, &costs);
    let config = RunConfig {
        port_constraint: constraints.port_constraint,
    };

    let mut results = Vec::new();
    for kind in AlgorithmKind::into_enum_iter() {
        let mut algorithm = kind.create();
        run_algorithm(algorithm.as_mut(), &mut dag, &mut processors, &tables, &costs, config)
            .expect("scheduling failed");
        match collect_result(&dag, &processors, &tables, &costs, kind.name()) {
            Ok(result) => results.push(result),
            Err(e) => error!(
                "skipping metrics of {} on {} with {}: {}",
                dag.name(),
                scenario.name,
                kind.name(),
                e
            ),
        }
    }
    results
}
