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

use super::{AssetError, AssetRegistry};
use nit_core::asset::AssetHandle;
use std::ffi::OsStr;
use std::path::Path;
use walkdir::WalkDir;

impl AssetRegistry {
    /// Deserializes every asset document found under `root`.
    ///
    /// Files are visited recursively in file-name order and matched on the
    /// configured extension. Outdated documents are skipped with a warning;
    /// any other failure stops the scan.
    pub fn discover(&mut self, root: impl AsRef<Path>) -> Result<Vec<AssetHandle>, AssetError> {
        let root = root.as_ref();
        let extension = self.extension().trim_start_matches('.').to_string();
        let mut handles = Vec::new();
        let mut skipped = 0usize;

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension() != Some(OsStr::new(&extension)) {
                continue;
            }

            match self.deserialize_from_file(path) {
                Ok(handle) => handles.push(handle),
                Err(AssetError::OutdatedAsset { .. }) => {
                    log::warn!("Skipping outdated asset '{}'.", path.display());
                    skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        log::info!(
            "Discovered {} asset(s) under '{}' ({skipped} outdated skipped).",
            handles.len(),
            root.display()
        );
        Ok(handles)
    }
}
