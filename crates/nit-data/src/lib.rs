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

//! # Nit Data
//!
//! The storage core of the engine. Two registries sit on one pool
//! structure:
//!
//! - [`sparse_set`]: the O(1) element-to-slot index every pool is built on.
//! - [`pool`]: dense, typed storage addressed by integer ids.
//! - [`ecs`]: the [`EntityRegistry`](ecs::EntityRegistry), holding one pool per
//!   component type and the cached entity groups.
//! - [`assets`]: the [`AssetRegistry`](assets::AssetRegistry), holding one pool
//!   per asset type with versioned, reference-counted, file-backed entries.

pub mod assets;
pub mod ecs;
pub mod pool;
pub mod sparse_set;
