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
use serde::{Deserialize, Serialize};

/// The metadata record kept next to every live asset.
///
/// The first five fields form the `AssetInfo` block of an asset document, in
/// this order. `loaded` and `reference_count` are runtime state and are never
/// written out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    /// Name of the asset's registered type; also the key of the payload block.
    pub type_name: String,
    /// Display name. Not required to be unique.
    pub name: String,
    /// File the asset is serialized to.
    pub path: String,
    /// Pool id.
    pub id: AssetId,
    /// Version of the type's layout the data was written with.
    pub version: u32,
    /// True between a load hook call and the matching free.
    #[serde(skip)]
    pub loaded: bool,
    /// Number of outstanding retains.
    #[serde(skip)]
    pub reference_count: u32,
}

impl AssetInfo {
    /// Creates the record of a freshly created, unloaded asset.
    pub fn new(
        type_name: impl Into<String>,
        id: AssetId,
        name: impl Into<String>,
        path: impl Into<String>,
        version: u32,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
            path: path.into(),
            id,
            version,
            loaded: false,
            reference_count: 0,
        }
    }
}
