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

// Nit Sandbox
// Exercises the entity and asset registries end to end.

use anyhow::{Context, Result};
use nit_sdk::nit_core::config::CONFIG_FILE_NAME;
use nit_sdk::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Texture2D {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    #[serde(skip)]
    uploaded: bool,
}

impl Asset for Texture2D {}

fn upload(texture: &mut Texture2D) {
    log::debug!("Uploading {}x{} texture.", texture.width, texture.height);
    texture.uploaded = true;
}

fn evict(texture: &mut Texture2D) {
    texture.uploaded = false;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Position {
    x: f32,
    y: f32,
}
impl Component for Position {}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Velocity {
    x: f32,
    y: f32,
}
impl Component for Velocity {}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Sprite {
    texture: String,
}
impl Component for Sprite {}

#[derive(Default)]
struct SandboxApp {
    checkerboard: Option<AssetHandle>,
}

impl SandboxApp {
    fn spawn_scene(&mut self, engine: &mut Engine) -> Result<()> {
        let texture = match engine.assets().find_by_name("checkerboard") {
            Some(handle) => handle,
            None => {
                let directory = engine.config().assets.directory.join("textures");
                let handle = engine.assets_mut().create_asset(
                    "checkerboard",
                    &directory,
                    Texture2D {
                        width: 2,
                        height: 2,
                        pixels: vec![0, 255, 255, 0],
                        uploaded: false,
                    },
                )?;
                let path = engine.assets().serialize_to_file(&handle)?;
                log::info!("Authored '{}'.", path.display());
                handle
            }
        };
        engine.assets_mut().retain(&texture)?;

        let entities = engine.entities_mut();
        for i in 0..8u8 {
            let entity = entities.create_entity()?;
            let offset = f32::from(i);
            entities.add_component(entity, Position { x: offset, y: 0.0 })?;
            if i % 2 == 0 {
                entities.add_component(entity, Velocity { x: 1.0, y: 0.5 })?;
            }
            if i % 3 == 0 {
                entities.add_component(
                    entity,
                    Sprite {
                        texture: texture.name.clone(),
                    },
                )?;
            }
        }

        self.checkerboard = Some(texture);
        Ok(())
    }

    fn integrate(&self, engine: &mut Engine, dt: f32) -> Result<()> {
        let entities = engine.entities_mut();
        let moving: Vec<Entity> = entities
            .group::<(Position, Velocity)>(GroupMatch::Superset)
            .context("movement group was not created")?
            .iter()
            .collect();

        for entity in moving {
            let Some(velocity) = entities.get_component::<Velocity>(entity).copied() else {
                continue;
            };
            if let Some(position) = entities.get_component_mut::<Position>(entity) {
                position.x += velocity.x * dt;
                position.y += velocity.y * dt;
            }
        }
        Ok(())
    }
}

impl Application for SandboxApp {
    fn register(&mut self, engine: &mut Engine) -> Result<()> {
        let entities = engine.entities_mut();
        entities.register_component_with(ComponentTypeArgs::<Position>::serde())?;
        entities.register_component_with(ComponentTypeArgs::<Velocity>::serde())?;
        entities.register_component_with(ComponentTypeArgs::<Sprite>::serde())?;
        entities.on_component_added().subscribe(|event: &ComponentAdded| {
            log::trace!("{} gained {}.", event.entity, event.type_info.name);
        });

        engine.assets_mut().register_type(
            AssetTypeArgs::<Texture2D>::serde()
                .with_load(upload)
                .with_free(evict),
        )?;
        engine
            .assets_mut()
            .on_asset_created()
            .subscribe(|event: &AssetCreated| log::info!("Asset created: {}", event.handle));
        Ok(())
    }

    fn start(&mut self, engine: &mut Engine) -> Result<()> {
        self.spawn_scene(engine)?;
        engine
            .entities_mut()
            .create_group::<(Position, Velocity)>(GroupMatch::Superset)?;

        for _ in 0..60 {
            self.integrate(engine, 1.0 / 60.0)?;
        }

        let entities = engine.entities();
        let sprites = entities
            .component_pool::<Sprite>()
            .map_or(0, |pool| pool.len());
        log::info!(
            "{} entities alive, {} moving, {} with a sprite.",
            entities.entity_count(),
            entities
                .group::<(Position, Velocity)>(GroupMatch::Superset)
                .map_or(0, |group| group.len()),
            sprites
        );
        if let Some(first) = entities.entities().next() {
            let document = entities.serialize_entity(first)?;
            log::info!("Entity {first}: {document}");
        }
        Ok(())
    }

    fn shutdown(&mut self, engine: &mut Engine) -> Result<()> {
        if let Some(mut texture) = self.checkerboard.take() {
            engine.assets_mut().release(&mut texture, false)?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = EngineConfig::load_or_default(CONFIG_FILE_NAME)?;
    let mut app = SandboxApp::default();
    Engine::run(&mut app, config)?;
    Ok(())
}
