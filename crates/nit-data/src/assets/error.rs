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
use nit_core::asset::AssetHandle;
use std::path::PathBuf;
use thiserror::Error;

/// An error raised by the [`AssetRegistry`](super::AssetRegistry).
#[derive(Debug, Error)]
pub enum AssetError {
    /// No asset type answers to this name.
    #[error("asset type '{0}' is not registered")]
    UnregisteredType(String),
    /// The type, or another type with the same name, is already registered.
    #[error("asset type '{0}' is already registered")]
    AlreadyRegistered(&'static str),
    /// The handle is empty or its asset no longer exists.
    #[error("invalid asset handle {0}")]
    InvalidHandle(AssetHandle),
    /// The document was written by an older layout of its type.
    #[error(
        "asset '{name}' of type '{type_name}' has version {found}, \
         current version is {current}; upgrade the asset"
    )]
    OutdatedAsset {
        /// Type named by the document.
        type_name: String,
        /// Asset name in the document.
        name: String,
        /// Version in the document.
        found: u32,
        /// Version the type was registered with.
        current: u32,
    },
    /// The document does not have the expected shape.
    #[error("malformed asset document: {0}")]
    MalformedDocument(String),
    /// The operation needs a hook the type was registered without.
    #[error("asset type '{type_name}' has no {hook} hook")]
    MissingHook {
        /// The asset type.
        type_name: &'static str,
        /// `"serialize"` or `"deserialize"`.
        hook: &'static str,
    },
    /// An asset file could not be read or written.
    #[error("asset file '{path}': {source}")]
    Io {
        /// The file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid JSON, or a serde-backed hook failed.
    #[error("asset document: {0}")]
    Json(#[from] serde_json::Error),
    /// The directory scan failed.
    #[error("asset discovery: {0}")]
    Discovery(#[from] walkdir::Error),
    /// The asset pool rejected the operation.
    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl AssetError {
    /// Returns true for problems with the data on disk rather than with the
    /// call itself.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::OutdatedAsset { .. } | Self::MalformedDocument(_) | Self::Json(_)
        )
    }
}
