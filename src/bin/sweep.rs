use std::io::Write;

use clap::Parser;
use env_logger::Builder;

use wfsched::experiment::Experiment;
use wfsched::parsers::SimulationConfig;

#[derive(Parser, Debug)]
#[clap(about, long_about = None)]
/// Schedules every workflow of a directory on every processor scenario
/// with every algorithm and writes one JSON result file per workflow.
struct Args {
    /// Path to the properties config file
    #[clap(short, long)]
    config: String,

    /// Number of worker threads
    #[clap(short, long, default_value = "8")]
    threads: usize,
}

fn main() {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let args = Args::parse();
    let config = SimulationConfig::from_file(&args.config).unwrap_or_else(|e| panic!("{}", e));
    let experiment = Experiment::load(&config).unwrap_or_else(|e| panic!("{}", e));

    let results = experiment.run(args.threads);
    Experiment::save_results(&results, &config.output_dir).expect("Failed to write results");

    for result in results.iter() {
        println!(
            "{} [{} procs] {}: makespan {:.3}, speedup {:.3}, efficiency {:.3}",
            result.workflow_name,
            result.number_of_processor,
            result.algorithm_name,
            result.makespan,
            result.speedup,
            result.efficiency
        );
    }
}
