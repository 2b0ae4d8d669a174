//! Manifest file: the desired configuration.

use cloudir_provider::{ProviderSettings, State};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{CliError, CliResult};

/// One named resource or data source block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Block {
    pub name: String,

    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default)]
    pub config: State,
}

impl Block {
    /// `<type>.<name>`, as shown in plan output.
    pub fn address(&self) -> String {
        format!("{}.{}", self.type_name, self.name)
    }
}

/// Parsed manifest.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub provider: ProviderSettings,

    #[serde(default)]
    pub resources: Vec<Block>,

    #[serde(default)]
    pub data: Vec<Block>,
}

impl Manifest {
    /// Read, parse and validate a manifest file.
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Err(CliError::Validation(format!(
                "File not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::Io(format!("Failed to read file {}: {}", path.display(), e)))?;

        let manifest = Self::parse(&content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse manifest YAML.
    pub fn parse(content: &str) -> CliResult<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            let location = if let Some(loc) = e.location() {
                format!(" at line {}, column {}", loc.line(), loc.column())
            } else {
                String::new()
            };
            CliError::Validation(format!("Invalid YAML{location}: {e}"))
        })
    }

    /// Names must be non-empty and unique within each section.
    pub fn validate(&self) -> CliResult<()> {
        validate_blocks("resource", &self.resources)?;
        validate_blocks("data source", &self.data)
    }

    /// Resource block by name.
    pub fn resource(&self, name: &str) -> Option<&Block> {
        self.resources.iter().find(|b| b.name == name)
    }
}

fn validate_blocks(kind: &str, blocks: &[Block]) -> CliResult<()> {
    let mut seen = HashSet::new();
    for block in blocks {
        if block.name.trim().is_empty() {
            return Err(CliError::Validation(format!(
                "Every {kind} needs a non-empty name"
            )));
        }
        if block.type_name.trim().is_empty() {
            return Err(CliError::Validation(format!(
                "{kind} '{}' has no type",
                block.name
            )));
        }
        if !seen.insert(block.name.as_str()) {
            return Err(CliError::Validation(format!(
                "Duplicate {kind} name '{}'",
                block.name
            )));
        }
    }
    Ok(())
}
