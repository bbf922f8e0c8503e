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

//! Defines the entity identifier.

/// An entity is a plain integer id into the registry's signature table.
///
/// Ids are recycled once an entity is destroyed. Holders must check
/// `EntityRegistry::is_valid` before using an id they did not just create.
pub type Entity = u32;

/// The id that never names a live entity.
pub const NULL_ENTITY: Entity = u32::MAX;

/// Default upper bound on simultaneously live entities.
pub const DEFAULT_MAX_ENTITIES: u32 = 100_000;
