// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Engine configuration, read from a `Nit.toml` manifest.
//!
//! Every field has a default, so a missing file or a partial manifest is fine:
//!
//! ```toml
//! [entities]
//! max_entities = 5000
//!
//! [assets]
//! directory = "content"
//! ```

use crate::asset::{DEFAULT_ASSET_EXTENSION, DEFAULT_ASSET_POOL_CAPACITY, DEFAULT_MAX_ASSET_ID};
use crate::ecs::{DEFAULT_MAX_ENTITIES, MAX_COMPONENT_TYPES};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Conventional name of the manifest file.
pub const CONFIG_FILE_NAME: &str = "Nit.toml";

/// An error raised while reading the manifest.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The manifest exists but could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        /// Path of the manifest.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The manifest is not valid TOML or has mistyped fields.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of its allowed range.
    #[error("invalid config value for '{field}': {reason}")]
    Invalid {
        /// The offending key.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Settings of the entity registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Upper bound on simultaneously live entities.
    pub max_entities: u32,
    /// Upper bound on registered component types (at most 100).
    pub max_component_types: u32,
    /// Initial slot count of each component pool; pools grow on demand.
    pub component_pool_capacity: u32,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            max_entities: DEFAULT_MAX_ENTITIES,
            max_component_types: MAX_COMPONENT_TYPES as u32,
            component_pool_capacity: 1024,
        }
    }
}

/// Settings of the asset registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Extension of asset documents, including the leading dot.
    pub extension: String,
    /// Root directory scanned for assets at startup.
    pub directory: PathBuf,
    /// Capacity used for asset types registered without one.
    pub default_pool_capacity: u32,
    /// Documents naming an id at or above this are rejected.
    pub max_asset_id: u32,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_ASSET_EXTENSION.to_string(),
            directory: PathBuf::from("."),
            default_pool_capacity: DEFAULT_ASSET_POOL_CAPACITY,
            max_asset_id: DEFAULT_MAX_ASSET_ID,
        }
    }
}

/// The full engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Entity registry settings.
    pub entities: EntityConfig,
    /// Asset registry settings.
    pub assets: AssetConfig,
}

impl EngineConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the configuration at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reads the configuration at `path`, or returns the defaults if the file
    /// does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            log::info!(
                "No '{}' found. Using default configuration.",
                path.display()
            );
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let entities = &self.entities;
        if entities.max_component_types as usize > MAX_COMPONENT_TYPES {
            return Err(ConfigError::Invalid {
                field: "entities.max_component_types",
                reason: format!("at most {MAX_COMPONENT_TYPES} component types are supported"),
            });
        }
        if entities.max_entities == 0 || entities.max_entities == u32::MAX {
            return Err(ConfigError::Invalid {
                field: "entities.max_entities",
                reason: "must be between 1 and u32::MAX - 1".to_string(),
            });
        }
        if entities.component_pool_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "entities.component_pool_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.assets.default_pool_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "assets.default_pool_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.assets.max_asset_id < self.assets.default_pool_capacity
            || self.assets.max_asset_id == u32::MAX
        {
            return Err(ConfigError::Invalid {
                field: "assets.max_asset_id",
                reason: format!(
                    "must be between assets.default_pool_capacity ({}) and u32::MAX - 1",
                    self.assets.default_pool_capacity
                ),
            });
        }
        if !self.assets.extension.starts_with('.') {
            return Err(ConfigError::Invalid {
                field: "assets.extension",
                reason: format!("'{}' must start with a dot", self.assets.extension),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_manifest_yields_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.assets.extension, ".nit");
        assert_eq!(config.entities.max_entities, 100_000);
    }

    #[test]
    fn partial_manifest_overrides_only_given_keys() {
        let config = EngineConfig::from_toml_str(
            r#"
            [entities]
            max_entities = 64

            [assets]
            directory = "content"
            "#,
        )
        .unwrap();

        assert_eq!(config.entities.max_entities, 64);
        assert_eq!(config.entities.max_component_types, 100);
        assert_eq!(config.assets.directory, PathBuf::from("content"));
        assert_eq!(config.assets.extension, ".nit");
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = EngineConfig::from_toml_str("[entities]\nmax_component_types = 500\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field, .. } if field == "entities.max_component_types"));

        let err = EngineConfig::from_toml_str("[assets]\nextension = \"nit\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = EngineConfig::from_toml_str("[assets]\nmax_asset_id = 10\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field, .. } if field == "assets.max_asset_id"));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = EngineConfig::from_toml_str("[entities\nmax_entities = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = EngineConfig::load_or_default("definitely/not/here/Nit.toml").unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
