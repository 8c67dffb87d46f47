//! Processor-set view.

use crate::resource::Processor;
use crate::task::Task;

/// A borrowed view over the processor set with cost averages used by the
/// priority tables and metrics.
#[derive(Clone, Copy)]
pub struct System<'a> {
    pub processors: &'a [Processor],
}

impl System<'_> {
    pub fn new(processors: &[Processor]) -> System {
        System { processors }
    }

    /// Mean computation cost of a task over all processors.
    pub fn mean_computation_cost(&self, task: &Task) -> f64 {
        self.processors.iter().map(|p| task.length / p.mips).sum::<f64>() / self.processors.len() as f64
    }

    /// Median computation cost of a task over all processors.
    pub fn median_computation_cost(&self, task: &Task) -> f64 {
        median(self.processors.iter().map(|p| task.length / p.mips))
    }

    /// Mean link bandwidth over all processors.
    pub fn mean_bandwidth(&self) -> f64 {
        self.processors.iter().map(|p| p.bandwidth).sum::<f64>() / self.processors.len() as f64
    }

    /// Id of the processor with the highest compute rate.
    pub fn fastest_processor(&self) -> usize {
        self.processors
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.mips.total_cmp(&b.mips))
            .map(|(id, _)| id)
            .expect("processor set is empty")
    }
}

fn median(data: impl Iterator<Item = f64>) -> f64 {
    let mut v: Vec<f64> = data.collect();
    v.sort_by(|a, b| a.total_cmp(b));
    if v.len() % 2 == 1 {
        v[v.len() / 2]
    } else {
        (v[v.len() / 2] + v[v.len() / 2 - 1]) / 2.
    }
}
