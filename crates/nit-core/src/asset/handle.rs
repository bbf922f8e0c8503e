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

use super::AssetId;
use crate::reflect::TypeInfo;
use std::fmt;

/// A non-owning reference to an asset: its type, its pool id and the name it
/// had when the handle was made.
///
/// Holding a handle keeps nothing alive. Every registry operation revalidates
/// the `(type, id)` pair, so a handle must not be trusted across a destroy.
/// Operations that free an asset reset the caller's handle to
/// [`AssetHandle::invalid`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetHandle {
    /// Name of the asset when the handle was created.
    pub name: String,
    /// Type of the asset, `None` for the empty handle.
    pub type_info: Option<TypeInfo>,
    /// Pool id of the asset.
    pub id: AssetId,
}

impl AssetHandle {
    /// Creates a handle to asset `id` of the given type.
    pub fn new(name: impl Into<String>, type_info: TypeInfo, id: AssetId) -> Self {
        Self {
            name: name.into(),
            type_info: Some(type_info),
            id,
        }
    }

    /// The empty handle. It never validates.
    pub fn invalid() -> Self {
        Self {
            name: String::new(),
            type_info: None,
            id: AssetId::MAX,
        }
    }

    /// Returns true if this is the empty handle.
    ///
    /// A non-empty handle may still be stale; ask the registry.
    pub fn is_empty(&self) -> bool {
        self.type_info.is_none()
    }

    /// Name of the handle's type, if any.
    pub fn type_name(&self) -> Option<&'static str> {
        self.type_info.map(|info| info.name)
    }

    /// Resets the handle to the empty handle.
    pub fn invalidate(&mut self) {
        *self = Self::invalid();
    }
}

impl Default for AssetHandle {
    fn default() -> Self {
        Self::invalid()
    }
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.type_info {
            Some(info) => write!(f, "{}#{} '{}'", info.name, self.id, self.name),
            None => write!(f, "<empty asset handle>"),
        }
    }
}
