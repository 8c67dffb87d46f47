//! Workflow task.

use crate::file_item::{FileItem, FileType};

/// A single workflow task.
///
/// Identity (name, length, file items, latencies) and structure (parents,
/// children, depth) are fixed after DAG construction. The scheduling state
/// is mutated during a single run and cleared by
/// [`reset_schedule`](Task::reset_schedule) between runs.
#[derive(Debug, Clone)]
pub struct Task {
    pub name: String,
    /// Computation length in instructions.
    pub length: f64,
    pub files: Vec<FileItem>,
    pub sending_latency: f64,
    pub receiving_latency: f64,

    pub parents: Vec<usize>,
    pub children: Vec<usize>,
    /// Topological level, 0 for entry tasks.
    pub depth: usize,

    pub priority: f64,
    pub processor: Option<usize>,
    pub ready_time: f64,
    pub start_time: f64,
    /// -1 until the task is committed.
    pub finish_time: f64,
    pub estimated_start_time: f64,
    pub estimated_finish_time: f64,
    pub start_sending_time: f64,
    pub finish_sending_time: f64,
    pub start_receiving_time: f64,
    pub finish_receiving_time: f64,
    pub is_estimated: bool,
}

impl Task {
    pub fn new(name: &str, length: f64, sending_latency: f64, receiving_latency: f64) -> Self {
        Self {
            name: name.to_string(),
            length,
            files: Vec::new(),
            sending_latency,
            receiving_latency,
            parents: Vec::new(),
            children: Vec::new(),
            depth: 0,
            priority: 0.,
            processor: None,
            ready_time: 0.,
            start_time: 0.,
            finish_time: -1.,
            estimated_start_time: 0.,
            estimated_finish_time: 0.,
            start_sending_time: 0.,
            finish_sending_time: 0.,
            start_receiving_time: 0.,
            finish_receiving_time: 0.,
            is_estimated: false,
        }
    }

    pub fn add_file(&mut self, file: FileItem) {
        self.files.push(file);
    }

    pub fn is_entry(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_exit(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterates over file items of the given type.
    pub fn files_of_type(&self, file_type: FileType) -> impl Iterator<Item = &FileItem> {
        self.files.iter().filter(move |f| f.file_type == file_type)
    }

    /// Clears all per-run scheduling state.
    pub fn reset_schedule(&mut self) {
        self.priority = 0.;
        self.processor = None;
        self.ready_time = 0.;
        self.start_time = 0.;
        self.finish_time = -1.;
        self.estimated_start_time = 0.;
        self.estimated_finish_time = 0.;
        self.start_sending_time = 0.;
        self.finish_sending_time = 0.;
        self.start_receiving_time = 0.;
        self.finish_receiving_time = 0.;
        self.is_estimated = false;
    }
}
