// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TOML configuration for a coordination runtime
//!
//! ```toml
//! history_dir = "/var/lib/turnstile"
//! default_capacity = 1
//! default_lease_timeout = "30s"
//!
//! [pools]
//! "db-connections" = 3
//! ```

use crate::{ConfigInitializer, RuntimeConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use ts_storage::{FileHistory, HistoryStore, MemoryHistory};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Directory for per-resource history logs; in-memory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_dir: Option<PathBuf>,
    /// Capacity for resources not listed in `pools`
    pub default_capacity: i64,
    /// Lease timeout applied to acquires that don't carry their own
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub default_lease_timeout: Option<Duration>,
    pub pools: BTreeMap<String, i64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_dir: None,
            default_capacity: 1,
            default_lease_timeout: None,
            pools: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn history_store(&self) -> Arc<dyn HistoryStore> {
        match &self.history_dir {
            Some(dir) => Arc::new(FileHistory::new(dir.clone())),
            None => Arc::new(MemoryHistory::new()),
        }
    }

    pub fn initializer(&self) -> ConfigInitializer {
        ConfigInitializer::new(self.default_capacity, self.pools.clone())
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            default_lease_timeout: self.default_lease_timeout,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
