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

//! Cached entity groups.
//!
//! A group is the set of live entities whose signature matches a target built
//! from a [`ComponentSet`]. The registry keeps every created group up to date
//! incrementally: each time an entity's signature changes, all groups are
//! re-evaluated for that entity alone. [`EntityRegistry::rebuild_groups`]
//! recomputes them from scratch and [`EntityRegistry::scan_group`] computes a
//! group without touching the cache, which is how the incremental index is
//! validated.
//!
//! [`EntityRegistry::rebuild_groups`]: super::EntityRegistry::rebuild_groups
//! [`EntityRegistry::scan_group`]: super::EntityRegistry::scan_group

use super::Component;
use nit_core::ecs::{Entity, EntitySignature};
use nit_core::TypeInfo;
use std::collections::BTreeSet;

/// How an entity's signature is compared to a group's target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GroupMatch {
    /// The entity has at least the queried components.
    #[default]
    Superset,
    /// The entity has exactly the queried components and no other.
    Exact,
}

/// Identifies a cached group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupKey {
    /// Component bits of the queried set, live bit excluded.
    pub signature: EntitySignature,
    /// The comparison applied to member signatures.
    pub mode: GroupMatch,
}

impl GroupKey {
    /// Creates a key. The live bit of `signature` is ignored.
    pub fn new(signature: EntitySignature, mode: GroupMatch) -> Self {
        Self {
            signature: signature.components(),
            mode,
        }
    }

    /// Returns true if an entity with `signature` belongs to the group.
    pub fn matches(&self, signature: &EntitySignature) -> bool {
        if !signature.is_live() {
            return false;
        }
        match self.mode {
            GroupMatch::Superset => signature.contains_all(&self.signature),
            GroupMatch::Exact => signature.components() == self.signature,
        }
    }
}

/// The cached members of one group, in ascending id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityGroup {
    key: GroupKey,
    entities: BTreeSet<Entity>,
}

impl EntityGroup {
    pub(crate) fn new(key: GroupKey, entities: BTreeSet<Entity>) -> Self {
        Self { key, entities }
    }

    /// The key the group was created with.
    pub fn key(&self) -> GroupKey {
        self.key
    }

    /// Returns true if `entity` is a member.
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the group has no member.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates members in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied()
    }

    /// The member set.
    pub fn entities(&self) -> &BTreeSet<Entity> {
        &self.entities
    }

    /// Adds or removes `entity` according to its new signature.
    pub(crate) fn refresh(&mut self, entity: Entity, signature: &EntitySignature) {
        if self.key.matches(signature) {
            self.entities.insert(entity);
        } else {
            self.entities.remove(&entity);
        }
    }

    pub(crate) fn evict(&mut self, entity: Entity) {
        self.entities.remove(&entity);
    }

    pub(crate) fn replace(&mut self, entities: BTreeSet<Entity>) {
        self.entities = entities;
    }
}

/// A set of component types that a group can be queried by.
///
/// Implemented for tuples of one to eight components, e.g. `(Transform,)` or
/// `(Transform, Sprite)`. Order does not matter: `(A, B)` and `(B, A)` name
/// the same group.
pub trait ComponentSet: 'static {
    /// The types in the set.
    fn type_infos() -> Vec<TypeInfo>;
}

macro_rules! impl_component_set {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            fn type_infos() -> Vec<TypeInfo> {
                vec![$(TypeInfo::of::<$name>()),+]
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);
