use rand::prelude::*;
use rand_pcg::Pcg64;

use wfsched::cost::CostModel;
use wfsched::dag::Dag;
use wfsched::file_item::{FileItem, FileType};
use wfsched::resource::Processor;
use wfsched::run_stats::{collect_result, makespan, resource_utilization};
use wfsched::runner::{run_algorithm, RunConfig};
use wfsched::scheduler::algorithm_resolver;
use wfsched::schedulers::tables::RankTables;

const ALGORITHMS: &[&str] = &["HEFT", "CPOP", "HSV", "PPTS", "PEFT", "IPEFT", "IPPTS", "PETS"];

fn assert_float_eq(x: f64, y: f64, eps: f64) {
    assert!((x - y).abs() < eps, "values do not match: {:.15} vs {:.15}", x, y);
}

fn make_processors(specs: &[(f64, f64)]) -> Vec<Processor> {
    specs
        .iter()
        .enumerate()
        .map(|(i, &(mips, bandwidth))| Processor::new(i, &format!("p{}", i), mips, bandwidth, 0.))
        .collect()
}

fn run(name: &str, dag: &mut Dag, processors: &mut Vec<Processor>, config: RunConfig) -> (CostModel, RankTables) {
    let costs = CostModel::new();
    let tables = RankTables::build(dag, processors, &costs);
    let mut algorithm = algorithm_resolver(name).unwrap();
    run_algorithm(algorithm.as_mut(), dag, processors, &tables, &costs, config).unwrap();
    (costs, tables)
}

fn check_schedule(dag: &Dag, processors: &[Processor], costs: &CostModel, port_constraint: bool) {
    for task in dag.get_tasks().iter() {
        let processor = &processors[task.processor.expect("unplaced task")];
        assert!(task.finish_time >= 0., "task {} was not committed", task.name);
        assert_float_eq(task.finish_time - task.start_time, task.length / processor.mips, 1e-9);
    }

    for (child, task) in dag.get_tasks().iter().enumerate() {
        for &parent in task.parents.iter() {
            let parent_task = dag.get_task(parent);
            let comm = costs.communication_cost_between(
                dag,
                parent,
                child,
                &processors[parent_task.processor.unwrap()],
                &processors[task.processor.unwrap()],
            );
            assert!(
                task.start_time + 1e-9 >= parent_task.finish_time + comm,
                "task {} starts before its parent {} delivers",
                task.name,
                parent_task.name
            );
        }
    }

    for proc_id in 0..processors.len() {
        let mut slots: Vec<(f64, f64)> = dag
            .get_tasks()
            .iter()
            .filter(|t| t.processor == Some(proc_id))
            .map(|t| (t.start_time, t.finish_time))
            .collect();
        slots.sort_by(|a, b| a.0.total_cmp(&b.0));
        for pair in slots.windows(2) {
            assert!(
                pair[1].0 + 1e-9 >= pair[0].1,
                "overlapping slots on processor {}: {:?}",
                proc_id,
                pair
            );
        }
    }

    if port_constraint {
        for proc_id in 0..processors.len() {
            let on_proc: Vec<usize> = (0..dag.task_count())
                .filter(|&t| dag.get_task(t).processor == Some(proc_id) && dag.get_task(t).length > 0.)
                .collect();
            for (i, &a) in on_proc.iter().enumerate() {
                for &b in on_proc.iter().skip(i + 1) {
                    let ta = dag.get_task(a);
                    let tb = dag.get_task(b);
                    for (sa, fa, sb, fb) in [
                        (
                            ta.start_sending_time,
                            ta.finish_sending_time,
                            tb.start_sending_time,
                            tb.finish_sending_time,
                        ),
                        (
                            ta.start_receiving_time,
                            ta.finish_receiving_time,
                            tb.start_receiving_time,
                            tb.finish_receiving_time,
                        ),
                    ] {
                        assert!(
                            fa + 1. <= sb + 1e-9 || fb + 1. <= sa + 1e-9,
                            "port phases of {} and {} are not buffered: [{}, {}] vs [{}, {}]",
                            ta.name,
                            tb.name,
                            sa,
                            fa,
                            sb,
                            fb
                        );
                    }
                }
            }
        }
    }

    let max_finish = dag
        .get_tasks()
        .iter()
        .map(|t| t.finish_time)
        .max_by(|a, b| a.total_cmp(b))
        .unwrap();
    assert_float_eq(makespan(dag).unwrap(), max_finish, 1e-12);
}

// A -> {B, C} -> D, no file items.
fn diamond(sending: f64, receiving: f64) -> Dag {
    let mut dag = Dag::new("diamond");
    let a = dag.add_task("A", 10., sending, receiving);
    let b = dag.add_task("B", 15., sending, receiving);
    let c = dag.add_task("C", 20., sending, receiving);
    let d = dag.add_task("D", 12., sending, receiving);
    dag.add_edge(a, b);
    dag.add_edge(a, c);
    dag.add_edge(b, d);
    dag.add_edge(c, d);
    dag.finalize().unwrap();
    dag
}

fn gen_dag(rng: &mut Pcg64, num_tasks: usize, num_edges: usize) -> Dag {
    let mut dag = Dag::new("random");
    for i in 0..num_tasks {
        dag.add_task(
            &format!("t{}", i),
            rng.gen_range(1..1000) as f64,
            rng.gen_range(0..3) as f64,
            rng.gen_range(0..3) as f64,
        );
    }
    for i in 0..num_edges {
        let parent = rng.gen_range(0..num_tasks - 1);
        let child = rng.gen_range(parent + 1..num_tasks);
        dag.add_edge(parent, child);
        if rng.gen_range(0..2) == 0 {
            let name = format!("d{}", i);
            let size = rng.gen_range(1..100_000_000u64);
            dag.add_file(parent, FileItem::new(&name, size, FileType::Output));
            dag.add_file(child, FileItem::new(&name, size, FileType::Input));
        }
    }
    dag.finalize().unwrap();
    dag
}

fn gen_processors(rng: &mut Pcg64, num_processors: usize) -> Vec<Processor> {
    (0..num_processors)
        .map(|i| {
            Processor::new(
                i,
                &i.to_string(),
                rng.gen_range(1..100) as f64,
                rng.gen_range(10..1000) as f64,
                0.,
            )
        })
        .collect()
}

#[test]
fn heft_schedules_diamond() {
    let mut dag = diamond(0., 0.);
    let mut processors = make_processors(&[(1., 100.), (2., 100.)]);
    let (costs, tables) = run("HEFT", &mut dag, &mut processors, RunConfig::default());
    check_schedule(&dag, &processors, &costs, false);

    // A and C go to the fast processor, B fills the slow one, D follows C
    assert_eq!(dag.get_task(0).processor, Some(1));
    assert_eq!(dag.get_task(1).processor, Some(0));
    assert_eq!(dag.get_task(2).processor, Some(1));
    assert_eq!(dag.get_task(3).processor, Some(1));
    assert_float_eq(makespan(&dag).unwrap(), 26., 1e-9);

    let result = collect_result(&dag, &processors, &tables, &costs, "HEFT").unwrap();
    let sequential = 7.5 + 11.25 + 15. + 9.;
    assert_float_eq(result.speedup, sequential / 26., 1e-9);
    assert_float_eq(result.efficiency, sequential / 26. / 2., 1e-9);
    assert_float_eq(result.schedule_length_ratio, 26. / sequential, 1e-9);
    assert_float_eq(result.throughput, 4. / 26. * 60., 1e-9);
    assert_eq!(result.number_of_task, 4);
    assert_eq!(result.number_of_processor, 2);
}

#[test]
fn chain_runs_on_a_single_processor() {
    for &name in ALGORITHMS {
        let mut dag = Dag::new("chain");
        let a = dag.add_task("A", 10., 0., 0.);
        let b = dag.add_task("B", 10., 0., 0.);
        let c = dag.add_task("C", 10., 0., 0.);
        dag.add_edge(a, b);
        dag.add_edge(b, c);
        dag.finalize().unwrap();
        let mut processors = make_processors(&[(1., 100.), (1., 100.)]);
        let (costs, _) = run(name, &mut dag, &mut processors, RunConfig::default());
        check_schedule(&dag, &processors, &costs, false);

        let chosen = dag.get_task(0).processor;
        assert!(dag.get_tasks().iter().all(|t| t.processor == chosen), "{}", name);
        assert_float_eq(makespan(&dag).unwrap(), 30., 1e-9);
    }
}

#[test]
fn port_constraint_buffers_io_phases() {
    let mut dag = diamond(1., 1.);
    let mut processors = make_processors(&[(1., 100.), (2., 100.)]);
    let config = RunConfig { port_constraint: true };
    let (costs, _) = run("HEFT", &mut dag, &mut processors, config);
    check_schedule(&dag, &processors, &costs, true);

    for task in dag.get_tasks().iter() {
        assert_float_eq(task.finish_sending_time - task.start_sending_time, 1., 1e-9);
        assert_float_eq(task.finish_receiving_time - task.start_receiving_time, 1., 1e-9);
        assert_float_eq(task.start_time, task.finish_sending_time, 1e-12);
        assert_float_eq(task.start_receiving_time, task.finish_time, 1e-12);
    }
}

#[test]
fn cpop_pins_critical_path_to_fastest_processor() {
    let mut dag = Dag::new("cp");
    let a = dag.add_task("A", 100., 0., 0.);
    let b = dag.add_task("B", 100., 0., 0.);
    let c = dag.add_task("C", 100., 0., 0.);
    let d = dag.add_task("D", 1., 0., 0.);
    dag.add_edge(a, b);
    dag.add_edge(b, c);
    dag.add_edge(a, d);
    dag.add_edge(d, c);
    dag.finalize().unwrap();
    let mut processors = make_processors(&[(2., 100.), (1., 100.)]);
    let (costs, _) = run("CPOP", &mut dag, &mut processors, RunConfig::default());
    check_schedule(&dag, &processors, &costs, false);

    assert_eq!(dag.get_task(a).processor, Some(0));
    assert_eq!(dag.get_task(b).processor, Some(0));
    assert_eq!(dag.get_task(c).processor, Some(0));
    assert_eq!(dag.get_task(d).processor, Some(1));
    assert_float_eq(makespan(&dag).unwrap(), 150., 1e-9);
}

#[test]
fn peft_lookahead_beats_greedy_tie_break() {
    // W and X tie on rank order; X's successor Y is much cheaper on the
    // fast processor once the transfer cost is considered, so PEFT moves
    // X there while HEFT settles the eft tie on the slow processor.
    let build = || {
        let mut dag = Dag::new("lookahead");
        let w = dag.add_task("W", 20., 0., 0.);
        let x = dag.add_task("X", 20., 0., 0.);
        let z = dag.add_task("Z", 100., 0., 0.);
        let y = dag.add_task("Y", 40., 0., 0.);
        dag.add_edge(w, z);
        dag.add_edge(x, y);
        dag.add_file(x, FileItem::new("x.out", 375_000_000, FileType::Output));
        dag.add_file(y, FileItem::new("x.out", 375_000_000, FileType::Input));
        dag.finalize().unwrap();
        dag
    };

    let mut heft_dag = build();
    let mut processors = make_processors(&[(1., 100.), (2., 100.)]);
    let (costs, _) = run("HEFT", &mut heft_dag, &mut processors, RunConfig::default());
    check_schedule(&heft_dag, &processors, &costs, false);
    assert_eq!(heft_dag.get_task(1).processor, Some(0));

    let mut peft_dag = build();
    let mut processors = make_processors(&[(1., 100.), (2., 100.)]);
    let (costs, _) = run("PEFT", &mut peft_dag, &mut processors, RunConfig::default());
    check_schedule(&peft_dag, &processors, &costs, false);
    assert_eq!(peft_dag.get_task(1).processor, Some(1));
}

#[test]
fn pseudo_entry_does_not_change_makespan() {
    let build = || {
        let mut dag = Dag::new("forked");
        let e1 = dag.add_task("E1", 30., 0., 0.);
        let e2 = dag.add_task("E2", 40., 0., 0.);
        let x = dag.add_task("X", 20., 0., 0.);
        dag.add_edge(e1, x);
        dag.add_edge(e2, x);
        dag.finalize().unwrap();
        dag
    };

    let mut plain = build();
    let mut processors = make_processors(&[(1., 100.), (2., 100.)]);
    run("HEFT", &mut plain, &mut processors, RunConfig::default());

    let mut unified = build();
    unified.insert_pseudo_tasks();
    assert_eq!(unified.entry_tasks().len(), 1);
    let mut processors = make_processors(&[(1., 100.), (2., 100.)]);
    run("HEFT", &mut unified, &mut processors, RunConfig::default());

    assert_float_eq(makespan(&plain).unwrap(), makespan(&unified).unwrap(), 1e-9);
}

#[test]
fn repeated_runs_are_identical() {
    let mut rng = Pcg64::seed_from_u64(7);
    let dag = gen_dag(&mut rng, 40, 80);
    let processors = gen_processors(&mut rng, 4);

    for &name in ALGORITHMS {
        let mut dag = dag.clone();
        let mut processors = processors.clone();
        run(name, &mut dag, &mut processors, RunConfig::default());
        let first: Vec<(f64, f64, Option<usize>)> = dag
            .get_tasks()
            .iter()
            .map(|t| (t.start_time, t.finish_time, t.processor))
            .collect();

        run(name, &mut dag, &mut processors, RunConfig::default());
        let second: Vec<(f64, f64, Option<usize>)> = dag
            .get_tasks()
            .iter()
            .map(|t| (t.start_time, t.finish_time, t.processor))
            .collect();
        assert_eq!(first, second, "{}", name);
    }
}

#[test]
fn rank_tables_are_deterministic() {
    let mut rng = Pcg64::seed_from_u64(11);
    let dag = gen_dag(&mut rng, 30, 60);
    let processors = gen_processors(&mut rng, 3);

    let first = RankTables::build(&dag, &processors, &CostModel::new());
    let second = RankTables::build(&dag, &processors, &CostModel::new());
    assert_eq!(first.rank_u, second.rank_u);
    assert_eq!(first.rank_d, second.rank_d);
    assert_eq!(first.urm, second.urm);
    assert_eq!(first.oct, second.oct);
    assert_eq!(first.pct, second.pct);
    assert_eq!(first.prm, second.prm);
}

#[test]
fn heft_on_one_processor_runs_back_to_back() {
    let mut rng = Pcg64::seed_from_u64(3);
    let mut dag = gen_dag(&mut rng, 20, 30);
    let mut processors = make_processors(&[(4., 100.)]);
    let (costs, _) = run("HEFT", &mut dag, &mut processors, RunConfig::default());
    check_schedule(&dag, &processors, &costs, false);

    let total: f64 = dag.get_tasks().iter().map(|t| t.length / 4.).sum();
    assert_float_eq(makespan(&dag).unwrap(), total, 1e-9);
}

#[test]
fn hsv_matches_heft_on_identical_processors() {
    let mut dag = diamond(0., 0.);
    let mut processors = make_processors(&[(2., 100.), (2., 100.)]);
    run("HEFT", &mut dag, &mut processors, RunConfig::default());
    let heft_makespan = makespan(&dag).unwrap();

    let mut dag = diamond(0., 0.);
    let mut processors = make_processors(&[(2., 100.), (2., 100.)]);
    run("HSV", &mut dag, &mut processors, RunConfig::default());
    assert_float_eq(makespan(&dag).unwrap(), heft_makespan, 1e-9);
}

#[test]
fn utilization_sums_to_hundred_percent() {
    let mut dag = diamond(0., 0.);
    let mut processors = make_processors(&[(1., 100.), (2., 100.)]);
    run("HEFT", &mut dag, &mut processors, RunConfig::default());
    let utilization = resource_utilization(&processors);
    let total: f64 = utilization.iter().map(|u| u.percent).sum();
    assert_float_eq(total, 100., 1e-9);
}

#[test]
fn random_schedules_satisfy_invariants() {
    let mut rng = Pcg64::seed_from_u64(1);
    for _ in 0..10 {
        let dag = gen_dag(&mut rng, 30, 60);
        let num_processors = rng.gen_range(2..5);
        let processors = gen_processors(&mut rng, num_processors);
        for &name in ALGORITHMS {
            let mut dag = dag.clone();
            let mut processors = processors.clone();
            let (costs, _) = run(name, &mut dag, &mut processors, RunConfig::default());
            check_schedule(&dag, &processors, &costs, false);
        }
    }
}

#[test]
fn random_schedules_satisfy_port_invariants() {
    let mut rng = Pcg64::seed_from_u64(2);
    for _ in 0..10 {
        let dag = gen_dag(&mut rng, 20, 40);
        let num_processors = rng.gen_range(2..4);
        let processors = gen_processors(&mut rng, num_processors);
        for &name in ALGORITHMS {
            let mut dag = dag.clone();
            let mut processors = processors.clone();
            let config = RunConfig { port_constraint: true };
            let (costs, _) = run(name, &mut dag, &mut processors, config);
            check_schedule(&dag, &processors, &costs, true);
        }
    }
}
