use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A plain key=value properties file; `#` starts a comment line.
#[derive(Debug, Clone)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::ConfigMissing(format!("{}: {}", path.as_ref().display(), e)))?;
        let mut values = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                values.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Result<&str> {
        self.values
            .get(key)
            .map(|s| s.as_str())
            .ok_or_else(|| Error::ConfigMissing(format!("required key {} is absent", key)))
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.values.get(key).cloned().unwrap_or_else(|| default.to_string())
    }
}

/// Paths the simulation driver needs.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub environment_path: PathBuf,
    pub workflow_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl SimulationConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let properties = Properties::load(path)?;
        Ok(Self {
            environment_path: PathBuf::from(properties.get("environmentSettingPath")?),
            workflow_dir: PathBuf::from(properties.get("workflowDirectoryPath")?),
            output_dir: PathBuf::from(properties.get_or("outputDirectoryPath", "output")),
        })
    }
}
