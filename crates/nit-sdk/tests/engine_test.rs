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

use anyhow::{bail, Result};
use nit_sdk::nit_core::config::AssetConfig;
use nit_sdk::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use tempfile::tempdir;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
struct Material {
    roughness: u8,
}
impl Asset for Material {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Transform(i32, i32);
impl Component for Transform {}

/// Records which phases ran and what it saw during `start`.
#[derive(Default)]
struct Recorder {
    phases: Vec<&'static str>,
    fail_start: bool,
    assets_at_start: usize,
}

impl Application for Recorder {
    fn register(&mut self, engine: &mut Engine) -> Result<()> {
        self.phases.push("register");
        engine.entities_mut().register_component::<Transform>()?;
        engine
            .assets_mut()
            .register_type(AssetTypeArgs::<Material>::serde())?;
        Ok(())
    }

    fn start(&mut self, engine: &mut Engine) -> Result<()> {
        self.phases.push("start");
        self.assets_at_start = engine.assets().asset_count();
        if self.fail_start {
            bail!("refusing to start");
        }
        let entity = engine.entities_mut().create_entity()?;
        engine
            .entities_mut()
            .add_component(entity, Transform(1, 2))?;
        Ok(())
    }

    fn shutdown(&mut self, _engine: &mut Engine) -> Result<()> {
        self.phases.push("shutdown");
        Ok(())
    }
}

fn config_for(directory: &std::path::Path) -> EngineConfig {
    EngineConfig {
        assets: AssetConfig {
            directory: directory.to_path_buf(),
            ..AssetConfig::default()
        },
        ..EngineConfig::default()
    }
}

fn write_material(directory: &std::path::Path, name: &str, roughness: u8) -> Result<()> {
    let mut authoring = Engine::default();
    authoring
        .assets_mut()
        .register_type(AssetTypeArgs::<Material>::serde())?;
    let handle = authoring
        .assets_mut()
        .create_asset(name, directory, Material { roughness })?;
    authoring.assets().serialize_to_file(&handle)?;
    Ok(())
}

#[test]
fn test_run_drives_every_phase_in_order() -> Result<()> {
    let dir = tempdir()?;
    write_material(dir.path(), "rock", 200)?;

    let mut app = Recorder::default();
    let engine = Engine::run(&mut app, config_for(dir.path()))?;

    assert_eq!(app.phases, vec!["register", "start", "shutdown"]);
    assert_eq!(app.assets_at_start, 1);
    assert_eq!(engine.entities().entity_count(), 1);

    let rock = engine.assets().find_by_name("rock").unwrap();
    assert_eq!(
        engine.assets().get::<Material>(&rock),
        Some(&Material { roughness: 200 })
    );
    Ok(())
}

#[test]
fn test_shutdown_runs_after_a_failed_start() -> Result<()> {
    let dir = tempdir()?;
    let mut app = Recorder {
        fail_start: true,
        ..Recorder::default()
    };

    let err = Engine::run(&mut app, config_for(dir.path())).unwrap_err();

    assert_eq!(app.phases, vec!["register", "start", "shutdown"]);
    assert!(format!("{err:#}").contains("refusing to start"));
    Ok(())
}

#[test]
fn test_discovery_failure_stops_before_start() -> Result<()> {
    let dir = tempdir()?;
    let missing = dir.path().join("does-not-exist");

    let mut app = Recorder::default();
    assert!(Engine::run(&mut app, config_for(&missing)).is_err());
    assert_eq!(app.phases, vec!["register"]);
    Ok(())
}

#[test]
fn test_from_manifest_reads_the_config_file() -> Result<()> {
    let dir = tempdir()?;
    let manifest = dir.path().join("Nit.toml");
    fs::write(
        &manifest,
        "[entities]\nmax_entities = 64\n\n[assets]\nextension = \".mat\"\n",
    )?;

    let engine = Engine::from_manifest(&manifest)?;
    assert_eq!(engine.config().entities.max_entities, 64);
    assert_eq!(engine.assets().extension(), ".mat");

    let fallback = Engine::from_manifest(dir.path().join("absent.toml"))?;
    assert_eq!(fallback.config(), &EngineConfig::default());
    Ok(())
}
