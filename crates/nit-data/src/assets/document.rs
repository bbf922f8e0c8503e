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

//! The on-disk form of an asset.
//!
//! A document is a JSON object with exactly two keys, `AssetInfo` first and
//! then the asset's type name:
//!
//! ```json
//! {
//!   "AssetInfo": {
//!     "type_name": "Texture2D",
//!     "name": "tex_a",
//!     "path": "content/tex_a.nit",
//!     "id": 0,
//!     "version": 1
//!   },
//!   "Texture2D": { "width": 64, "height": 64 }
//! }
//! ```
//!
//! The payload under the type name belongs to the type's hooks and is never
//! inspected here.

use super::AssetError;
use nit_core::asset::AssetInfo;
use serde_json::{Map, Value};

/// Key of the metadata block.
pub const ASSET_INFO_KEY: &str = "AssetInfo";

/// A parsed document: the metadata and the opaque payload.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetDocument {
    /// The `AssetInfo` block. Runtime fields are zeroed.
    pub info: AssetInfo,
    /// The block stored under `info.type_name`.
    pub payload: Value,
}

impl AssetDocument {
    /// Parses document text.
    pub fn parse(text: &str) -> Result<Self, AssetError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Object(mut root) = value else {
            return Err(malformed("the document root must be an object"));
        };

        let info = root
            .remove(ASSET_INFO_KEY)
            .ok_or_else(|| malformed("missing the AssetInfo block"))?;
        let info: AssetInfo = serde_json::from_value(info)?;

        let payload = root
            .remove(&info.type_name)
            .ok_or_else(|| malformed(format!("missing the '{}' block", info.type_name)))?;

        Ok(Self { info, payload })
    }

    /// Renders the document as pretty-printed text.
    pub fn to_text(&self) -> Result<String, AssetError> {
        let mut root = Map::new();
        root.insert(ASSET_INFO_KEY.to_string(), serde_json::to_value(&self.info)?);
        root.insert(self.info.type_name.clone(), self.payload.clone());
        Ok(serde_json::to_string_pretty(&Value::Object(root))?)
    }
}

fn malformed(reason: impl Into<String>) -> AssetError {
    AssetError::MalformedDocument(reason.into())
}
