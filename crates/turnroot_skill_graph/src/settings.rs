// SPDX-License-Identifier: MIT OR Apache-2.0
//! Executor configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading or writing the file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid RON for these settings
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),
}

/// Tuning knobs for [`GraphExecutor`](crate::executor::GraphExecutor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorSettings {
    /// Record every executed node in the context trace
    pub record_trace: bool,
    /// Node visits allowed per traversal before it is interrupted
    pub max_node_visits: usize,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            record_trace: true,
            max_node_visits: 10_000,
        }
    }
}

impl ExecutorSettings {
    /// Parse settings from RON; missing fields take their defaults
    pub fn from_ron(source: &str) -> Result<Self, SettingsError> {
        Ok(ron::from_str(source)?)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, SettingsError> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}
