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

//! The public-facing API of Nit.
//! Applications implement [`Application`] and hand it to [`Engine::run`],
//! which owns the entity and asset registries for the lifetime of the run.

mod engine;

use anyhow::Result;

pub use engine::Engine;
pub use nit_core;
pub use nit_data;

pub mod prelude {
    pub use crate::{Application, Engine};
    pub use nit_core::asset::{Asset, AssetCreated, AssetDestroyed, AssetHandle, AssetInfo};
    pub use nit_core::ecs::{ComponentAdded, ComponentRemoved, Entity, NULL_ENTITY};
    pub use nit_core::EngineConfig;
    pub use nit_data::assets::{AssetError, AssetRegistry, AssetTypeArgs};
    pub use nit_data::ecs::{
        Component, ComponentTypeArgs, EcsError, EntityGroup, EntityRegistry, GroupMatch,
    };
}

/// The hooks an application provides to the engine.
pub trait Application {
    /// Called once, before asset discovery, to register component and asset
    /// types.
    fn register(&mut self, engine: &mut Engine) -> Result<()>;

    /// Called once the discovered assets are in place.
    fn start(&mut self, engine: &mut Engine) -> Result<()>;

    /// Called last, even when `start` failed.
    fn shutdown(&mut self, _engine: &mut Engine) -> Result<()> {
        Ok(())
    }
}
