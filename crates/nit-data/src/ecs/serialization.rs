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

//! Copying entities and converting them to and from JSON.
//!
//! A serialized entity is an object mapping component type names to the
//! payload produced by that type's serialize hook, in signature bit order:
//!
//! ```json
//! { "Transform": { "x": 1.0, "y": 2.0 }, "Sprite": { "layer": 3 } }
//! ```
//!
//! Component types registered without a serialize hook are left out.

use super::{EcsError, EntityRegistry};
use nit_core::check;
use nit_core::ecs::Entity;
use serde_json::{Map, Value};

impl EntityRegistry {
    /// Creates a new entity holding a copy of every component of `source`.
    ///
    /// A [`ComponentAdded`](nit_core::ecs::ComponentAdded) notification is
    /// broadcast for each copied component. If a copy fails, the new entity is
    /// destroyed again.
    pub fn clone_entity(&mut self, source: Entity) -> Result<Entity, EcsError> {
        let Some(signature) = self.signature(source) else {
            return check::fail(EcsError::InvalidEntity(source));
        };

        let target = self.create_entity()?;
        for bit in signature.components().iter_ones() {
            let copied = match self.column_mut(bit) {
                Some(column) => column.clone_component(source, target),
                None => Ok(()),
            };
            if let Err(err) = copied {
                log::warn!("Discarding clone {target} of entity {source}: {err}");
                self.destroy_entity(target)?;
                return Err(err);
            }
            self.mark_attached(target, bit);
            self.broadcast_added(target, bit);
        }
        log::trace!("Cloned entity {source} into {target}.");
        Ok(target)
    }

    /// Serializes every component of `entity` that has a serialize hook.
    pub fn serialize_entity(&self, entity: Entity) -> Result<Value, EcsError> {
        let Some(signature) = self.signature(entity) else {
            return check::fail(EcsError::InvalidEntity(entity));
        };

        let mut components = Map::new();
        for bit in signature.components().iter_ones() {
            let Some(column) = self.column(bit) else {
                continue;
            };
            if let Some(payload) = column.serialize(entity)? {
                components.insert(column.type_info().name.to_string(), payload);
            }
        }
        Ok(Value::Object(components))
    }

    /// Creates an entity from the output of [`EntityRegistry::serialize_entity`].
    ///
    /// Components are attached silently. Every name is resolved before the
    /// entity is created, so an unknown or non-deserializable component leaves
    /// the registry untouched. If a payload fails to decode, the partially
    /// built entity is destroyed again.
    pub fn deserialize_entity(&mut self, document: &Value) -> Result<Entity, EcsError> {
        let Value::Object(components) = document else {
            return Err(EcsError::MalformedEntity(json_kind(document)));
        };

        let mut resolved = Vec::with_capacity(components.len());
        for (name, payload) in components {
            let bit = self.component_bit_by_name(name)?;
            resolved.push((bit, payload));
        }

        let entity = self.create_entity()?;
        for (bit, payload) in resolved {
            let attached = match self.column_mut(bit) {
                Some(column) => column.deserialize_into(entity, payload.clone()),
                None => Ok(()),
            };
            if let Err(err) = attached {
                log::warn!("Discarding entity {entity}: {err}");
                self.destroy_entity(entity)?;
                return Err(err);
            }
            self.mark_attached(entity, bit);
        }
        Ok(entity)
    }

    fn component_bit_by_name(&self, name: &str) -> Result<u32, EcsError> {
        let bit = self
            .component_types()
            .position(|type_info| type_info.name == name)
            .map(|index| index as u32 + 1);
        let Some(bit) = bit else {
            return Err(EcsError::UnknownComponentName(name.to_string()));
        };
        match self.column(bit) {
            Some(column) if column.is_deserializable() => Ok(bit),
            Some(column) => Err(EcsError::NotDeserializable(column.type_info().name)),
            None => Err(EcsError::UnknownComponentName(name.to_string())),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
