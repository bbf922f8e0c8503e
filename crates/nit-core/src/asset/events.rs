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

use super::AssetHandle;

/// Broadcast when a deserialized document introduced a new asset id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCreated {
    /// Handle to the new asset.
    pub handle: AssetHandle,
}

/// Broadcast after an asset has been freed and right before its slot is erased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDestroyed {
    /// Handle the asset had; it stops validating once listeners return.
    pub handle: AssetHandle,
}
