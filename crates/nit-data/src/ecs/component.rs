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

use nit_core::reflect::{self, ConstructFn, SerializeFn};
use serde::{de::DeserializeOwned, Serialize};

/// A marker trait for types that can be attached to entities.
///
/// Components are stored by value in a per-type pool. `Clone` is what lets
/// [`EntityRegistry::clone_entity`](super::EntityRegistry::clone_entity)
/// copy-construct them onto another entity.
pub trait Component: Clone + 'static {}

/// Optional hooks and settings supplied when registering a component type.
pub struct ComponentTypeArgs<T> {
    /// Name used as the component's key in serialized entities.
    pub name: Option<&'static str>,
    /// Initial pool capacity; defaults to the registry's configured value.
    pub capacity: Option<u32>,
    /// Turns a component into its serialized payload.
    pub serialize: Option<SerializeFn<T>>,
    /// Builds a component from its serialized payload.
    pub deserialize: Option<ConstructFn<T>>,
}

impl<T> ComponentTypeArgs<T> {
    /// No hooks: the component is skipped by entity serialization.
    pub fn new() -> Self {
        Self {
            name: None,
            capacity: None,
            serialize: None,
            deserialize: None,
        }
    }

    /// Overrides the serialized name.
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Overrides the initial pool capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Sets the serialize hook.
    pub fn with_serialize(mut self, serialize: SerializeFn<T>) -> Self {
        self.serialize = Some(serialize);
        self
    }

    /// Sets the deserialize hook.
    pub fn with_deserialize(mut self, deserialize: ConstructFn<T>) -> Self {
        self.deserialize = Some(deserialize);
        self
    }
}

impl<T: Serialize + DeserializeOwned> ComponentTypeArgs<T> {
    /// Both hooks backed by the type's serde implementation.
    pub fn serde() -> Self {
        Self::new()
            .with_serialize(reflect::serde_serialize::<T>)
            .with_deserialize(reflect::serde_construct::<T>)
    }
}

impl<T> Default for ComponentTypeArgs<T> {
    fn default() -> Self {
        Self::new()
    }
}
