//! Local state file.
//!
//! Maps manifest names to the type and attributes last seen for the object.
//! Saves go through a temporary file in the same directory and a rename, so
//! an interrupted write leaves the previous state intact.

use cloudir_provider::State;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CliError, CliResult};

/// Default state file path, relative to the working directory.
pub const DEFAULT_STATE_PATH: &str = "cloudir.state.json";

/// Supported state file format version.
pub const STATE_VERSION: u32 = 1;

/// One managed object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    #[serde(rename = "type")]
    pub type_name: String,
    pub attributes: State,
}

impl StateEntry {
    pub fn new(type_name: impl Into<String>, attributes: State) -> Self {
        Self {
            type_name: type_name.into(),
            attributes,
        }
    }

    /// Identifier recorded for the object, if any.
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id").and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFile {
    pub version: u32,
    #[serde(default)]
    pub resources: BTreeMap<String, StateEntry>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            resources: BTreeMap::new(),
        }
    }
}

impl StateFile {
    /// Load state; a missing file is an empty state.
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::State(format!("Failed to read {}: {}", path.display(), e)))?;

        let state: StateFile = serde_json::from_str(&content).map_err(|e| {
            CliError::State(format!("{} is corrupted: {}", path.display(), e))
        })?;

        if state.version != STATE_VERSION {
            return Err(CliError::State(format!(
                "Unsupported state version {} in {}. Only version {} is supported.",
                state.version,
                path.display(),
                STATE_VERSION
            )));
        }

        Ok(state)
    }

    /// Write state atomically.
    pub fn save(&self, path: &Path) -> CliResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| CliError::State(format!("Failed to serialize state: {}", e)))?;

        let tmp = temp_path(path)?;
        fs::write(&tmp, content)
            .map_err(|e| CliError::State(format!("Failed to write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            CliError::State(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&StateEntry> {
        self.resources.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: StateEntry) {
        self.resources.insert(name.into(), entry);
    }

    pub fn remove(&mut self, name: &str) -> Option<StateEntry> {
        self.resources.remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

fn temp_path(path: &Path) -> CliResult<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| CliError::State(format!("Invalid state path: {}", path.display())))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}
