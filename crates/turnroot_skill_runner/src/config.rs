// SPDX-License-Identifier: MIT OR Apache-2.0
//! Runner configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use turnroot_skill_graph::{ExecutionContext, ExecutorSettings, Value};

/// Config errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid RON for this config
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// What to seed, what to report, and how to treat suspensions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Executor tuning
    pub executor: ExecutorSettings,
    /// Context values set before the event fires
    pub seed: IndexMap<String, Value>,
    /// Context keys to report; empty reports every plain value
    pub report_keys: Vec<String>,
    /// Resume every suspension as soon as it parks
    pub auto_resume: bool,
}

impl RunnerConfig {
    /// Parse a config from RON
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    /// Load a config from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// A fresh context holding the seed values
    pub fn seeded_context(&self) -> ExecutionContext {
        let mut ctx = ExecutionContext::new();
        for (key, value) in &self.seed {
            match value {
                Value::Bool(v) => ctx.set(key.as_str(), *v),
                Value::Number(v) => ctx.set(key.as_str(), *v),
                Value::Text(v) => ctx.set(key.as_str(), v.clone()),
            }
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let config = RunnerConfig::from_ron("()").unwrap();
        assert_eq!(config, RunnerConfig::default());
        assert_eq!(config.executor.max_node_visits, 10_000);
        assert!(!config.auto_resume);
    }

    #[test]
    fn test_seeded_context() {
        let config = RunnerConfig::from_ron(
            r#"(
                seed: {
                    "damage": Number(7.0),
                    "caster.riding": Bool(true),
                    "caster.name": Text("Alm"),
                },
                report_keys: ["damage"],
                auto_resume: true,
            )"#,
        )
        .unwrap();

        let ctx = config.seeded_context();
        assert_eq!(ctx.number("damage"), Some(7.0));
        assert_eq!(ctx.get::<bool>("caster.riding"), Some(&true));
        assert_eq!(ctx.get::<String>("caster.name").map(String::as_str), Some("Alm"));
        assert_eq!(ctx.keys().collect::<Vec<_>>(), ["damage", "caster.riding", "caster.name"]);
        assert!(config.auto_resume);
    }
}
