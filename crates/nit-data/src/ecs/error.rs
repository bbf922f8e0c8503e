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

use crate::pool::PoolError;
use nit_core::ecs::Entity;
use thiserror::Error;

/// An error raised by the [`EntityRegistry`](super::EntityRegistry).
#[derive(Debug, Error)]
pub enum EcsError {
    /// The entity id is out of range or not live.
    #[error("entity {0} is not valid")]
    InvalidEntity(Entity),
    /// Every entity id up to the configured bound is live.
    #[error("cannot create more than {0} entities")]
    EntityLimitReached(u32),
    /// The component type was never registered.
    #[error("component type '{0}' is not registered")]
    UnregisteredComponent(&'static str),
    /// The type, or another type with the same name, is already registered.
    #[error("component type '{0}' is already registered")]
    AlreadyRegistered(&'static str),
    /// Every signature bit is taken.
    #[error("cannot register more than {0} component types")]
    ComponentTypeLimit(u32),
    /// The entity has no component of that type.
    #[error("entity {entity} has no '{type_name}' component")]
    MissingComponent {
        /// The entity.
        entity: Entity,
        /// The requested type.
        type_name: &'static str,
    },
    /// A serialized entity named a component no registered type answers to.
    #[error("no registered component type is named '{0}'")]
    UnknownComponentName(String),
    /// The component type cannot be read back from a serialized entity.
    #[error("component type '{0}' has no deserialize hook")]
    NotDeserializable(&'static str),
    /// A serialized entity is not a JSON object.
    #[error("serialized entity must be an object, got {0}")]
    MalformedEntity(&'static str),
    /// A serialize or deserialize hook failed.
    #[error("component hook failed: {0}")]
    Json(#[from] serde_json::Error),
    /// The component pool rejected the operation.
    #[error(transparent)]
    Pool(#[from] PoolError),
}
