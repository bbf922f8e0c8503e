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

use super::{Component, ComponentTypeArgs, EcsError};
use crate::pool::{Growth, IdMode, Pool, PoolError};
use nit_core::ecs::Entity;
use nit_core::TypeInfo;
use serde_json::Value;
use std::any::Any;

/// The type-erased interface the registry uses to drive one component pool.
///
/// Every operation that does not need the concrete type (removal on destroy,
/// cloning, serialization through the registered hooks) goes through this
/// trait. Typed access downcasts to [`ComponentStorage<T>`].
pub(crate) trait ComponentColumn {
    /// Casts the column to `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Casts the column to `&mut dyn Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn type_info(&self) -> TypeInfo;

    fn remove(&mut self, entity: Entity) -> Result<(), PoolError>;

    /// Copies the component of `source` onto `target`.
    fn clone_component(&mut self, source: Entity, target: Entity) -> Result<(), EcsError>;

    /// Returns `None` when the type has no serialize hook.
    fn serialize(&self, entity: Entity) -> Result<Option<Value>, EcsError>;

    fn is_deserializable(&self) -> bool;

    /// Builds a component from `payload` and attaches it to `entity`.
    fn deserialize_into(&mut self, entity: Entity, payload: Value) -> Result<(), EcsError>;
}

/// The pool of one component type, keyed by entity id.
pub(crate) struct ComponentStorage<T> {
    pub(crate) pool: Pool<T>,
    args: ComponentTypeArgs<T>,
}

impl<T: Component> ComponentStorage<T> {
    pub(crate) fn new(
        type_info: TypeInfo,
        capacity: u32,
        args: ComponentTypeArgs<T>,
    ) -> Result<Self, PoolError> {
        Ok(Self {
            pool: Pool::with_type_info(type_info, capacity, IdMode::External, Growth::Double)?,
            args,
        })
    }
}

impl<T: Component> ComponentColumn for ComponentStorage<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_info(&self) -> TypeInfo {
        self.pool.type_info()
    }

    fn remove(&mut self, entity: Entity) -> Result<(), PoolError> {
        self.pool.delete(entity).map(|_| ())
    }

    fn clone_component(&mut self, source: Entity, target: Entity) -> Result<(), EcsError> {
        let component = self
            .pool
            .get(source)
            .cloned()
            .ok_or(EcsError::MissingComponent {
                entity: source,
                type_name: self.pool.type_info().name,
            })?;
        self.pool.insert_with_id(target, component)?;
        Ok(())
    }

    fn serialize(&self, entity: Entity) -> Result<Option<Value>, EcsError> {
        let Some(serialize) = self.args.serialize else {
            return Ok(None);
        };
        let component = self.pool.get(entity).ok_or(EcsError::MissingComponent {
            entity,
            type_name: self.pool.type_info().name,
        })?;
        Ok(Some(serialize(component)?))
    }

    fn is_deserializable(&self) -> bool {
        self.args.deserialize.is_some()
    }

    fn deserialize_into(&mut self, entity: Entity, payload: Value) -> Result<(), EcsError> {
        let construct = self
            .args
            .deserialize
            .ok_or(EcsError::NotDeserializable(self.pool.type_info().name))?;
        let component = construct(payload)?;
        self.pool.insert_with_id(entity, component)?;
        Ok(())
    }
}
