use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_xml_rs::Deserializer;

use crate::dag::Dag;
use crate::error::{Error, Result};
use crate::file_item::{FileItem, FileType};

#[derive(Debug, Deserialize)]
struct Uses {
    #[serde(alias = "file")]
    name: String,
    link: String,
    size: u64,
}

#[derive(Debug, Deserialize)]
struct Job {
    id: String,
    runtime: f64,
    #[serde(default)]
    sending: f64,
    #[serde(default)]
    receiving: f64,
    #[serde(rename = "uses", default)]
    files: Vec<Uses>,
}

#[derive(Debug, Deserialize)]
struct EdgeParent {
    #[serde(rename = "ref")]
    task: String,
}

#[derive(Debug, Deserialize)]
struct Edge {
    #[serde(rename = "ref")]
    task: String,
    #[serde(rename = "parent", default)]
    parents: Vec<EdgeParent>,
}

// jobs and child elements may be interleaved, so the deserializer is built
// with non-contiguous sequence matching enabled below
#[derive(Debug, Deserialize)]
#[serde(rename = "adag")]
struct Dax {
    #[serde(rename = "job", default)]
    jobs: Vec<Job>,
    #[serde(rename = "child", default)]
    children: Vec<Edge>,
}

/// Reads a workflow from a file in DAX format.
///
/// Job runtimes are given in seconds on a 1000-MIPS reference machine, so
/// the task length is `runtime * 1000` instructions. `<child>` elements
/// define the precedence edges; file items only carry the transferred
/// payload.
pub fn load_dax<P: AsRef<Path>>(path: P) -> Result<Dag> {
    let path = path.as_ref();
    let content =
        std::fs::read_to_string(path).map_err(|e| Error::WorkflowParse(format!("{}: {}", path.display(), e)))?;
    parse_dax(&content, &workflow_name(path))
}

/// Builds a workflow from DAX content.
pub fn parse_dax(content: &str, name: &str) -> Result<Dag> {
    let mut deserializer = Deserializer::new_from_reader(content.as_bytes()).non_contiguous_seq_elements(true);
    let dax =
        Dax::deserialize(&mut deserializer).map_err(|e| Error::WorkflowParse(format!("{}: {}", name, e)))?;

    let mut dag = Dag::new(name);
    let mut task_ids: HashMap<String, usize> = HashMap::new();
    for job in dax.jobs.iter() {
        let task_id = dag.add_task(&job.id, job.runtime * 1000., job.sending, job.receiving);
        task_ids.insert(job.id.clone(), task_id);
        for file in job.files.iter() {
            let file_type = match file.link.as_str() {
                "input" => FileType::Input,
                "output" => FileType::Output,
                _ => FileType::None,
            };
            dag.add_file(task_id, FileItem::new(&file.name, file.size, file_type));
        }
    }
    for edge in dax.children.iter() {
        let &child = task_ids
            .get(&edge.task)
            .ok_or_else(|| Error::WorkflowParse(format!("{}: unknown job {}", name, edge.task)))?;
        for parent in edge.parents.iter() {
            let &parent_id = task_ids
                .get(&parent.task)
                .ok_or_else(|| Error::WorkflowParse(format!("{}: unknown job {}", name, parent.task)))?;
            dag.add_edge(parent_id, child);
        }
    }
    dag.finalize()?;
    Ok(dag)
}

/// The portion of a path between the last separator and the last dot.
pub fn workflow_name(path: &Path) -> String {
    let path = path.to_string_lossy();
    let start = path.rfind(|c| c == '/' || c == '\\').map(|i| i + 1).unwrap_or(0);
    let end = path.rfind('.').filter(|&i| i > start).unwrap_or(path.len());
    path[start..end].to_string()
}

/// Workflow files of a directory, scanned non-recursively; only `.xml`
/// and `.dax` files are accepted.
pub fn find_workflow_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries =
        std::fs::read_dir(dir).map_err(|e| Error::WorkflowNotFound(format!("{}: {}", dir.display(), e)))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && matches!(
                    path.extension().and_then(|e| e.to_str()),
                    Some("xml") | Some("dax")
                )
        })
        .collect();
    if files.is_empty() {
        return Err(Error::WorkflowNotFound(format!(
            "{}: no .xml or .dax files",
            dir.display()
        )));
    }
    files.sort();
    Ok(files)
}
