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

use crate::Application;
use anyhow::{Context, Result};
use nit_core::asset::AssetHandle;
use nit_core::EngineConfig;
use nit_data::assets::AssetRegistry;
use nit_data::ecs::EntityRegistry;
use std::path::Path;

/// The engine context: the configuration and the two registries.
///
/// There is exactly one per application, owned by whoever drives it and
/// handed by reference to every piece of code that needs storage.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    entities: EntityRegistry,
    assets: AssetRegistry,
}

impl Engine {
    /// Builds empty registries from `config`.
    pub fn new(config: EngineConfig) -> Self {
        let entities = EntityRegistry::new(config.entities.clone());
        let assets = AssetRegistry::new(config.assets.clone());
        Self {
            config,
            entities,
            assets,
        }
    }

    /// Builds an engine from the manifest at `path`, or from the defaults if
    /// there is none.
    pub fn from_manifest(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = EngineConfig::load_or_default(path)
            .with_context(|| format!("Failed to load engine config from '{}'", path.display()))?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityRegistry {
        &mut self.entities
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut AssetRegistry {
        &mut self.assets
    }

    /// Deserializes every asset under the configured asset directory.
    pub fn discover_assets(&mut self) -> Result<Vec<AssetHandle>> {
        let directory = self.config.assets.directory.clone();
        self.assets
            .discover(&directory)
            .with_context(|| format!("Asset discovery failed in '{}'", directory.display()))
    }

    /// Drives `app` through its lifecycle and returns the engine afterwards.
    ///
    /// The phases run in order: registration of types, asset discovery,
    /// `start`, then `shutdown`. A failing phase stops the sequence, but
    /// `shutdown` still runs if `start` was reached.
    pub fn run<A: Application>(app: &mut A, config: EngineConfig) -> Result<Engine> {
        let mut engine = Engine::new(config);

        log::info!("Registering types...");
        app.register(&mut engine).context("Application registration failed")?;
        log::info!(
            "Registered {} component type(s) and {} asset type(s).",
            engine.entities.component_type_count(),
            engine.assets.asset_types().count()
        );

        log::info!("Discovering assets...");
        engine.discover_assets()?;

        log::info!("Starting application...");
        let started = app.start(&mut engine).context("Application start failed");

        log::info!("Shutting down...");
        let stopped = app
            .shutdown(&mut engine)
            .context("Application shutdown failed");

        started?;
        stopped?;
        log::info!("Engine stopped cleanly.");
        Ok(engine)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
