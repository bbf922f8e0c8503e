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

//! Provides the value types of Nit's asset system.
//!
//! This module defines the "common language" for asset-related operations: the
//! [`Asset`] marker trait, the metadata record kept for every live asset, the
//! non-owning [`AssetHandle`] callers hold, and the notifications broadcast when
//! assets appear or disappear. It has no knowledge of how assets are stored;
//! the registry living in `nit-data` builds on these primitives.

mod events;
mod handle;
mod info;

pub use events::*;
pub use handle::*;
pub use info::*;

/// Identifier of an asset inside its type's pool.
pub type AssetId = u32;

/// Default file extension of serialized assets.
pub const DEFAULT_ASSET_EXTENSION: &str = ".nit";

/// Default number of slots reserved for each asset type.
pub const DEFAULT_ASSET_POOL_CAPACITY: u32 = 100;

/// Default exclusive bound on asset ids accepted from documents.
pub const DEFAULT_MAX_ASSET_ID: u32 = 1 << 20;

/// Version recorded for an asset type registered without an explicit one.
pub const DEFAULT_ASSET_VERSION: u32 = 1;

/// A marker trait for types that can be managed by the asset registry.
///
/// Fresh slots are default-constructed before a document payload is applied,
/// hence the `Default` bound.
///
/// # Examples
///
/// ```
/// use nit_core::asset::Asset;
///
/// #[derive(Default)]
/// struct Texture2D {
///     width: u32,
///     height: u32,
/// }
///
/// impl Asset for Texture2D {}
/// ```
pub trait Asset: Default + 'static {}
