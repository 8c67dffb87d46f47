//! DAG model of a workflow.

use crate::error::{Error, Result};
use crate::file_item::FileItem;
use crate::task::Task;

/// A workflow: a set of tasks with data dependencies forming a directed
/// acyclic graph.
///
/// Tasks are owned by an index-addressed arena; parent/child edges are
/// lists of indices. A task cannot start until all its parents have
/// finished and their matching file items have been transferred to the
/// task's processor.
#[derive(Debug, Clone)]
pub struct Dag {
    name: String,
    tasks: Vec<Task>,
}

impl Dag {
    /// Creates an empty DAG.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tasks: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a new [task](crate::task::Task) and returns its id.
    pub fn add_task(&mut self, name: &str, length: f64, sending_latency: f64, receiving_latency: f64) -> usize {
        let task_id = self.tasks.len();
        self.tasks.push(Task::new(name, length, sending_latency, receiving_latency));
        task_id
    }

    /// Adds a precedence edge. Duplicate edges are ignored.
    pub fn add_edge(&mut self, parent: usize, child: usize) {
        assert_ne!(parent, child, "self-dependency on task {}", self.tasks[parent].name);
        if !self.tasks[parent].children.contains(&child) {
            self.tasks[parent].children.push(child);
            self.tasks[child].parents.push(parent);
        }
    }

    /// Attaches a file item to a task.
    pub fn add_file(&mut self, task_id: usize, file: FileItem) {
        self.tasks[task_id].add_file(file);
    }

    /// Returns task by id.
    pub fn get_task(&self, task_id: usize) -> &Task {
        &self.tasks[task_id]
    }

    /// Returns mutable task reference by id.
    pub fn get_task_mut(&mut self, task_id: usize) -> &mut Task {
        &mut self.tasks[task_id]
    }

    /// Returns all tasks.
    pub fn get_tasks(&self) -> &Vec<Task> {
        &self.tasks
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn edge_count(&self) -> usize {
        self.tasks.iter().map(|t| t.children.len()).sum()
    }

    /// Ids of tasks without parents.
    pub fn entry_tasks(&self) -> Vec<usize> {
        (0..self.tasks.len()).filter(|&t| self.tasks[t].is_entry()).collect()
    }

    /// Ids of tasks without children.
    pub fn exit_tasks(&self) -> Vec<usize> {
        (0..self.tasks.len()).filter(|&t| self.tasks[t].is_exit()).collect()
    }

    /// Assigns topological depths to all tasks, rejecting cyclic graphs.
    ///
    /// Must be called after construction and before scheduling. Entry
    /// tasks get depth 0, every other task the maximum parent depth + 1.
    pub fn finalize(&mut self) -> Result<()> {
        let n = self.tasks.len();
        for task in self.tasks.iter_mut() {
            task.depth = 0;
        }
        let mut remaining: Vec<usize> = self.tasks.iter().map(|t| t.parents.len()).collect();
        let mut queue: Vec<usize> = (0..n).filter(|&t| remaining[t] == 0).collect();
        let mut numbered = 0;
        while let Some(&task_id) = queue.get(numbered) {
            numbered += 1;
            let depth = self.tasks[task_id].depth;
            for child in self.tasks[task_id].children.clone() {
                let child_task = &mut self.tasks[child];
                child_task.depth = child_task.depth.max(depth + 1);
                remaining[child] -= 1;
                if remaining[child] == 0 {
                    queue.push(child);
                }
            }
        }
        if numbered != n {
            return Err(Error::WorkflowParse(format!(
                "workflow {} contains a dependency cycle",
                self.name
            )));
        }
        Ok(())
    }

    /// Inserts zero-length pseudo tasks so that the DAG has a unique entry
    /// and a unique exit.
    ///
    /// A pseudo entry is added only when the DAG has multiple entry tasks,
    /// and likewise for the exit. Pseudo tasks carry no file items and
    /// zero latencies, so they do not change the makespan. Expects an
    /// already acyclic DAG.
    pub fn insert_pseudo_tasks(&mut self) {
        let entries = self.entry_tasks();
        if entries.len() > 1 {
            let pseudo = self.add_task("pseudo-entry", 0., 0., 0.);
            for entry in entries {
                self.add_edge(pseudo, entry);
            }
        }
        let exits = self.exit_tasks();
        if exits.len() > 1 {
            let pseudo = self.add_task("pseudo-exit", 0., 0., 0.);
            for exit in exits {
                self.add_edge(exit, pseudo);
            }
        }
        self.finalize().expect("pseudo tasks cannot introduce cycles");
    }

    /// Groups task ids by depth; index 0 holds the entry level.
    pub fn levels(&self) -> Vec<Vec<usize>> {
        let height = self.tasks.iter().map(|t| t.depth + 1).max().unwrap_or(0);
        let mut levels = vec![Vec::new(); height];
        for (task_id, task) in self.tasks.iter().enumerate() {
            levels[task.depth].push(task_id);
        }
        levels
    }

    /// Clears the per-run scheduling state of every task.
    pub fn reset(&mut self) {
        for task in self.tasks.iter_mut() {
            task.reset_schedule();
        }
    }
}
