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

use super::Entity;
use crate::reflect::TypeInfo;

/// Broadcast after a component has been attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentAdded {
    /// The entity that received the component.
    pub entity: Entity,
    /// The component type.
    pub type_info: TypeInfo,
}

/// Broadcast right before a component is detached from an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentRemoved {
    /// The entity losing the component.
    pub entity: Entity,
    /// The component type.
    pub type_info: TypeInfo,
}
