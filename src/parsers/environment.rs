use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_xml_rs::from_str;

use crate::error::{Error, Result};
use crate::resource::{Processor, ProcessorConfig};

/// Global simulation switches of the environment file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(rename = "portConstraint")]
    pub port_constraint: bool,
    #[serde(rename = "pseudoTask")]
    pub pseudo_task: bool,
    /// Declared in the file format but not acted upon.
    #[serde(rename = "mockData", default)]
    pub mock_data: bool,
}

/// One processor set the workflows are scheduled on.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub processors: Vec<Processor>,
}

#[derive(Debug, Clone)]
pub struct Environment {
    pub constraints: Constraints,
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Deserialize)]
struct EnvironmentXml {
    constraint: Constraints,
    #[serde(rename = "scenario", default)]
    scenarios: Vec<ScenarioXml>,
}

#[derive(Debug, Deserialize)]
struct ScenarioXml {
    name: Option<String>,
    #[serde(rename = "device", default)]
    devices: Vec<DeviceXml>,
}

#[derive(Debug, Deserialize)]
struct DeviceXml {
    name: String,
    #[serde(rename = "processor", default)]
    processors: Vec<ProcessorConfig>,
}

/// Reads the environment XML: constraints plus one or more processor
/// scenarios. Every `<processor>` of a `<device>` becomes a processor
/// named `<device>-<index>`.
pub fn load_environment<P: AsRef<Path>>(path: P) -> Result<Environment> {
    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::EnvironmentParse(format!("{}: {}", path.as_ref().display(), e)))?;
    parse_environment(&content)
}

/// Builds the environment from XML content.
pub fn parse_environment(content: &str) -> Result<Environment> {
    let xml: EnvironmentXml = from_str(content).map_err(|e| Error::EnvironmentParse(e.to_string()))?;

    let mut scenarios = Vec::new();
    for (index, scenario) in xml.scenarios.into_iter().enumerate() {
        let mut processors = Vec::new();
        for device in scenario.devices.iter() {
            for (device_index, config) in device.processors.iter().enumerate() {
                processors.push(Processor::new(
                    processors.len(),
                    &format!("{}-{}", device.name, device_index),
                    config.mips,
                    config.bandwidth,
                    config.cost,
                ));
            }
        }
        if processors.is_empty() {
            return Err(Error::EnvironmentParse(format!(
                "scenario {} contains no processors",
                index
            )));
        }
        scenarios.push(Scenario {
            name: scenario.name.unwrap_or_else(|| format!("scenario-{}", index)),
            processors,
        });
    }
    if scenarios.is_empty() {
        return Err(Error::EnvironmentParse("no scenarios defined".to_string()));
    }
    Ok(Environment {
        constraints: xml.constraint,
        scenarios,
    })
}
