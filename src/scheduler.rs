//! Scheduling algorithm interface.

use enum_iterator::IntoEnumIterator;

use crate::runner::RunState;
use crate::schedulers::cpop::CpopAlgorithm;
use crate::schedulers::heft::HeftAlgorithm;
use crate::schedulers::hsv::HsvAlgorithm;
use crate::schedulers::ipeft::IpeftAlgorithm;
use crate::schedulers::ippts::IpptsAlgorithm;
use crate::schedulers::peft::PeftAlgorithm;
use crate::schedulers::pets::PetsAlgorithm;
use crate::schedulers::ppts::PptsAlgorithm;

/// A list-scheduling policy.
///
/// Policies differ only in the scalar priority they assign to each task
/// and in the processor-selection objective of `allocate`; the ready-set
/// loop, the slot search and the commit pass are shared.
pub trait Algorithm {
    fn name(&self) -> &str;
    /// Writes the scheduling priority of every task.
    fn prioritize(&mut self, state: &mut RunState);
    /// Picks a processor and time slot for one ready task.
    fn allocate(&mut self, task_id: usize, state: &mut RunState);
    /// Whether equal priorities are resolved by the smaller mean
    /// computation cost instead of ready-queue insertion order.
    fn breaks_ties_by_mean_cost(&self) -> bool {
        false
    }
}

/// Algorithms covered by the default sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoEnumIterator)]
pub enum AlgorithmKind {
    Heft,
    Cpop,
    Hsv,
    Ppts,
    Peft,
    Ipeft,
    Ippts,
}

impl AlgorithmKind {
    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmKind::Heft => "HEFT",
            AlgorithmKind::Cpop => "CPOP",
            AlgorithmKind::Hsv => "HSV",
            AlgorithmKind::Ppts => "PPTS",
            AlgorithmKind::Peft => "PEFT",
            AlgorithmKind::Ipeft => "IPEFT",
            AlgorithmKind::Ippts => "IPPTS",
        }
    }

    pub fn create(&self) -> Box<dyn Algorithm> {
        match self {
            AlgorithmKind::Heft => Box::new(HeftAlgorithm::new()),
            AlgorithmKind::Cpop => Box::new(CpopAlgorithm::new()),
            AlgorithmKind::Hsv => Box::new(HsvAlgorithm::new()),
            AlgorithmKind::Ppts => Box::new(PptsAlgorithm::new()),
            AlgorithmKind::Peft => Box::new(PeftAlgorithm::new()),
            AlgorithmKind::Ipeft => Box::new(IpeftAlgorithm::new()),
            AlgorithmKind::Ippts => Box::new(IpptsAlgorithm::new()),
        }
    }
}

/// Resolves an algorithm by name; covers the default sweep plus PETS.
pub fn algorithm_resolver(name: &str) -> Option<Box<dyn Algorithm>> {
    match name {
        "HEFT" => Some(Box::new(HeftAlgorithm::new())),
        "CPOP" => Some(Box::new(CpopAlgorithm::new())),
        "HSV" => Some(Box::new(HsvAlgorithm::new())),
        "PPTS" => Some(Box::new(PptsAlgorithm::new())),
        "PEFT" => Some(Box::new(PeftAlgorithm::new())),
        "IPEFT" => Some(Box::new(IpeftAlgorithm::new())),
        "IPPTS" => Some(Box::new(IpptsAlgorithm::new())),
        "PETS" => Some(Box::new(PetsAlgorithm::new())),
        _ => None,
    }
}
