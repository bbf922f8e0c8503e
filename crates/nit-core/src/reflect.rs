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

//! The minimal reflection contract the storage core depends on.
//!
//! The core never inspects a registered type. It only needs a stable identity,
//! a display name that is written to asset files, the element size, and a
//! fixed set of lifecycle hooks supplied at registration time.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::any::TypeId;

/// Runtime descriptor of a registered type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// The stable name used in asset documents and notifications.
    pub name: &'static str,
    /// The Rust type identity.
    pub type_id: TypeId,
    /// `size_of::<T>()`, the width of one pool slot.
    pub size: usize,
}

impl TypeInfo {
    /// Describes `T`, naming it after the last path segment of its Rust type name.
    ///
    /// `my_game::gfx::Texture2D` becomes `Texture2D`; generic arguments are kept
    /// as written (`Handle<my_game::Mesh>`).
    pub fn of<T: 'static>() -> Self {
        Self::named::<T>(short_type_name(std::any::type_name::<T>()))
    }

    /// Describes `T` under an explicit name.
    pub fn named<T: 'static>(name: &'static str) -> Self {
        Self {
            name,
            type_id: TypeId::of::<T>(),
            size: std::mem::size_of::<T>(),
        }
    }

    /// Returns true if this descriptor was built for `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    let base_end = full.find('<').unwrap_or(full.len());
    let start = full[..base_end].rfind("::").map_or(0, |i| i + 2);
    &full[start..]
}

/// Acquires the runtime resources of a value (uploads, file handles...).
pub type LoadFn<T> = fn(&mut T);

/// Releases what a [`LoadFn`] acquired.
pub type FreeFn<T> = fn(&mut T);

/// Turns a value into the opaque payload stored in documents.
pub type SerializeFn<T> = fn(&T) -> serde_json::Result<Value>;

/// Populates an existing value from its opaque payload.
pub type DeserializeFn<T> = fn(&mut T, Value) -> serde_json::Result<()>;

/// Builds a fresh value from its opaque payload.
pub type ConstructFn<T> = fn(Value) -> serde_json::Result<T>;

/// Serde-backed [`SerializeFn`].
pub fn serde_serialize<T: Serialize>(value: &T) -> serde_json::Result<Value> {
    serde_json::to_value(value)
}

/// Serde-backed [`DeserializeFn`]; replaces the whole value.
pub fn serde_deserialize<T: DeserializeOwned>(
    value: &mut T,
    payload: Value,
) -> serde_json::Result<()> {
    *value = serde_json::from_value(payload)?;
    Ok(())
}

/// Serde-backed [`ConstructFn`].
pub fn serde_construct<T: DeserializeOwned>(payload: Value) -> serde_json::Result<T> {
    serde_json::from_value(payload)
}
