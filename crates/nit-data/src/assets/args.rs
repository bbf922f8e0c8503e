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

use crate::pool::Growth;
use nit_core::asset::DEFAULT_ASSET_VERSION;
use nit_core::reflect::{self, DeserializeFn, FreeFn, LoadFn, SerializeFn};
use serde::{de::DeserializeOwned, Serialize};

/// Hooks and settings supplied when registering an asset type.
///
/// ```
/// use nit_core::asset::Asset;
/// use nit_data::assets::AssetTypeArgs;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct Texture2D {
///     width: u32,
///     height: u32,
/// }
///
/// impl Asset for Texture2D {}
///
/// let args = AssetTypeArgs::<Texture2D>::serde()
///     .with_capacity(10)
///     .with_version(2);
/// assert_eq!(args.version, 2);
/// ```
pub struct AssetTypeArgs<T> {
    /// Name written to documents; defaults to the short Rust type name.
    pub name: Option<&'static str>,
    /// Initial pool capacity; defaults to the registry's configured value.
    pub capacity: Option<u32>,
    /// Whether the pool may grow past its capacity.
    pub growth: Growth,
    /// Current layout version. Documents with an older version are refused.
    pub version: u32,
    /// Acquires runtime resources.
    pub load: Option<LoadFn<T>>,
    /// Releases what `load` acquired.
    pub free: Option<FreeFn<T>>,
    /// Produces the document payload.
    pub serialize: Option<SerializeFn<T>>,
    /// Applies a document payload to a value.
    pub deserialize: Option<DeserializeFn<T>>,
}

impl<T> AssetTypeArgs<T> {
    /// No hooks, default capacity, version 1.
    pub fn new() -> Self {
        Self {
            name: None,
            capacity: None,
            growth: Growth::Double,
            version: DEFAULT_ASSET_VERSION,
            load: None,
            free: None,
            serialize: None,
            deserialize: None,
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Makes the pool refuse new assets once `capacity` is reached.
    pub fn with_fixed_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self.growth = Growth::Fixed;
        self
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn with_load(mut self, load: LoadFn<T>) -> Self {
        self.load = Some(load);
        self
    }

    pub fn with_free(mut self, free: FreeFn<T>) -> Self {
        self.free = Some(free);
        self
    }

    pub fn with_serialize(mut self, serialize: SerializeFn<T>) -> Self {
        self.serialize = Some(serialize);
        self
    }

    pub fn with_deserialize(mut self, deserialize: DeserializeFn<T>) -> Self {
        self.deserialize = Some(deserialize);
        self
    }
}

impl<T: Serialize + DeserializeOwned> AssetTypeArgs<T> {
    /// Serialize and deserialize hooks backed by the type's serde implementation.
    pub fn serde() -> Self {
        Self::new()
            .with_serialize(reflect::serde_serialize::<T>)
            .with_deserialize(reflect::serde_deserialize::<T>)
    }
}

impl<T> Default for AssetTypeArgs<T> {
    fn default() -> Self {
        Self::new()
    }
}
