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

use super::group::{ComponentSet, EntityGroup, GroupKey, GroupMatch};
use super::storage::{ComponentColumn, ComponentStorage};
use super::{Component, ComponentTypeArgs, EcsError};
use crate::pool::Pool;
use nit_core::check;
use nit_core::config::EntityConfig;
use nit_core::ecs::{
    ComponentAdded, ComponentRemoved, Entity, EntitySignature, LIVE_BIT, MAX_COMPONENT_TYPES,
};
use nit_core::event::EventBus;
use nit_core::TypeInfo;
use std::any::TypeId;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt;

/// The owner of every entity, component pool and cached group.
///
/// An entity is a slot in the signature table. Its signature records which
/// component pools hold data for it: bit `i` is the component type registered
/// `i`-th, bit 0 marks the slot as live. Every mutation updates the cached
/// groups before returning.
pub struct EntityRegistry {
    config: EntityConfig,
    signatures: Vec<EntitySignature>,
    available_entities: VecDeque<Entity>,
    entity_count: u32,
    /// Column `i` stores the component type whose signature bit is `i + 1`.
    columns: Vec<Box<dyn ComponentColumn>>,
    type_bits: HashMap<TypeId, u32>,
    groups: HashMap<GroupKey, EntityGroup>,
    component_added: EventBus<ComponentAdded>,
    component_removed: EventBus<ComponentRemoved>,
}

impl EntityRegistry {
    /// Creates an empty registry.
    pub fn new(config: EntityConfig) -> Self {
        log::info!(
            "Entity registry initialized: up to {} entities and {} component types.",
            config.max_entities,
            config.max_component_types
        );
        Self {
            config,
            signatures: Vec::new(),
            available_entities: VecDeque::new(),
            entity_count: 0,
            columns: Vec::new(),
            type_bits: HashMap::new(),
            groups: HashMap::new(),
            component_added: EventBus::new(),
            component_removed: EventBus::new(),
        }
    }

    /// The configuration the registry was built with.
    pub fn config(&self) -> &EntityConfig {
        &self.config
    }

    // --- Component types ---

    /// Registers `T` without serialization hooks.
    pub fn register_component<T: Component>(&mut self) -> Result<(), EcsError> {
        self.register_component_with(ComponentTypeArgs::<T>::new())
    }

    /// Registers `T` with the given hooks.
    pub fn register_component_with<T: Component>(
        &mut self,
        args: ComponentTypeArgs<T>,
    ) -> Result<(), EcsError> {
        let type_info = match args.name {
            Some(name) => TypeInfo::named::<T>(name),
            None => TypeInfo::of::<T>(),
        };
        // Entity documents are keyed by name, so names must be unique too.
        if self.type_bits.contains_key(&type_info.type_id)
            || self.component_types().any(|registered| registered.name == type_info.name)
        {
            return check::fail(EcsError::AlreadyRegistered(type_info.name));
        }
        let limit = self.config.max_component_types.min(MAX_COMPONENT_TYPES as u32);
        if self.columns.len() as u32 >= limit {
            return check::fail(EcsError::ComponentTypeLimit(limit));
        }

        let capacity = args.capacity.unwrap_or(self.config.component_pool_capacity);
        let storage = ComponentStorage::new(type_info, capacity, args)?;
        self.columns.push(Box::new(storage));
        let bit = self.columns.len() as u32;
        self.type_bits.insert(type_info.type_id, bit);

        log::debug!(
            "Registered component type '{}' at signature bit {bit} ({capacity} slots).",
            type_info.name
        );
        Ok(())
    }

    /// The signature bit of `T`, if registered.
    pub fn component_type_index<T: 'static>(&self) -> Option<u32> {
        self.type_bits.get(&TypeId::of::<T>()).copied()
    }

    /// Number of registered component types.
    pub fn component_type_count(&self) -> usize {
        self.columns.len()
    }

    /// Descriptors of the registered component types, in registration order.
    pub fn component_types(&self) -> impl Iterator<Item = TypeInfo> + '_ {
        self.columns.iter().map(|column| column.type_info())
    }

    fn bit_of<T: 'static>(&self) -> Result<u32, EcsError> {
        match self.component_type_index::<T>() {
            Some(bit) => Ok(bit),
            None => check::fail(EcsError::UnregisteredComponent(TypeInfo::of::<T>().name)),
        }
    }

    pub(crate) fn column(&self, bit: u32) -> Option<&dyn ComponentColumn> {
        let index = bit.checked_sub(1)? as usize;
        self.columns.get(index).map(|column| &**column)
    }

    pub(crate) fn column_mut(&mut self, bit: u32) -> Option<&mut Box<dyn ComponentColumn>> {
        let index = bit.checked_sub(1)? as usize;
        self.columns.get_mut(index)
    }

    fn storage<T: Component>(&self) -> Option<&ComponentStorage<T>> {
        let bit = self.component_type_index::<T>()?;
        self.column(bit)?.as_any().downcast_ref()
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut ComponentStorage<T>> {
        let bit = self.component_type_index::<T>()?;
        self.column_mut(bit)?.as_any_mut().downcast_mut()
    }

    /// The pool of `T`, for dense iteration over every instance.
    pub fn component_pool<T: Component>(&self) -> Option<&Pool<T>> {
        self.storage::<T>().map(|storage| &storage.pool)
    }

    /// Every `T` in dense order, mutably. Structural changes go through the
    /// registry.
    pub fn component_values_mut<T: Component>(&mut self) -> Option<&mut [T]> {
        self.storage_mut::<T>()
            .map(|storage| storage.pool.values_mut())
    }

    // --- Entities ---

    /// Creates an entity without components.
    ///
    /// Destroyed ids are reused first, oldest first.
    pub fn create_entity(&mut self) -> Result<Entity, EcsError> {
        let entity = match self.available_entities.pop_front() {
            Some(entity) => entity,
            None => {
                if self.entity_count >= self.config.max_entities {
                    return check::fail(EcsError::EntityLimitReached(self.config.max_entities));
                }
                self.signatures.push(EntitySignature::new());
                (self.signatures.len() - 1) as Entity
            }
        };

        self.signatures[entity as usize].set(LIVE_BIT);
        self.entity_count += 1;
        self.refresh_groups(entity);
        log::trace!("Created entity {entity}.");
        Ok(entity)
    }

    /// Destroys `entity` and every component it holds.
    ///
    /// A removal notification is broadcast for each component, in signature
    /// bit order, before its data is erased.
    pub fn destroy_entity(&mut self, entity: Entity) -> Result<(), EcsError> {
        let signature = self.live_signature(entity)?;

        for bit in signature.components().iter_ones() {
            self.detach(entity, bit)?;
        }

        self.signatures[entity as usize].reset();
        for group in self.groups.values_mut() {
            group.evict(entity);
        }
        self.entity_count -= 1;
        self.available_entities.push_back(entity);
        log::trace!("Destroyed entity {entity}.");
        Ok(())
    }

    /// Returns true if `entity` is live.
    pub fn is_valid(&self, entity: Entity) -> bool {
        self.signatures
            .get(entity as usize)
            .is_some_and(EntitySignature::is_live)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> u32 {
        self.entity_count
    }

    /// Iterates the live entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.signatures
            .iter()
            .enumerate()
            .filter(|(_, signature)| signature.is_live())
            .map(|(entity, _)| entity as Entity)
    }

    /// The signature of a live entity.
    pub fn signature(&self, entity: Entity) -> Option<EntitySignature> {
        self.signatures
            .get(entity as usize)
            .copied()
            .filter(EntitySignature::is_live)
    }

    fn live_signature(&self, entity: Entity) -> Result<EntitySignature, EcsError> {
        match self.signature(entity) {
            Some(signature) => Ok(signature),
            None => check::fail(EcsError::InvalidEntity(entity)),
        }
    }

    // --- Components ---

    /// Attaches `component` to `entity` and broadcasts [`ComponentAdded`].
    ///
    /// Fails without touching anything if the entity already has a `T`.
    pub fn add_component<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<(), EcsError> {
        let bit = self.insert_component(entity, component)?;
        self.broadcast_added(entity, bit);
        Ok(())
    }

    /// Attaches `component` to `entity` without broadcasting.
    ///
    /// Signatures and groups are updated as for [`EntityRegistry::add_component`].
    pub fn add_component_silent<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<(), EcsError> {
        self.insert_component(entity, component).map(|_| ())
    }

    fn insert_component<T: Component>(
        &mut self,
        entity: Entity,
        component: T,
    ) -> Result<u32, EcsError> {
        self.live_signature(entity)?;
        let bit = self.bit_of::<T>()?;
        let storage = self
            .storage_mut::<T>()
            .ok_or(EcsError::UnregisteredComponent(TypeInfo::of::<T>().name))?;
        storage.pool.insert_with_id(entity, component)?;
        self.mark_attached(entity, bit);
        Ok(bit)
    }

    pub(crate) fn mark_attached(&mut self, entity: Entity, bit: u32) {
        self.signatures[entity as usize].set(bit);
        self.refresh_groups(entity);
    }

    pub(crate) fn broadcast_added(&mut self, entity: Entity, bit: u32) {
        if let Some(type_info) = self.column(bit).map(|column| column.type_info()) {
            self.component_added.publish(&ComponentAdded { entity, type_info });
        }
    }

    /// Detaches the `T` of `entity`, broadcasting [`ComponentRemoved`] first.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<(), EcsError> {
        let signature = self.live_signature(entity)?;
        let bit = self.bit_of::<T>()?;
        if !signature.test(bit) {
            return check::fail(EcsError::MissingComponent {
                entity,
                type_name: TypeInfo::of::<T>().name,
            });
        }
        self.detach(entity, bit)?;
        self.refresh_groups(entity);
        Ok(())
    }

    fn detach(&mut self, entity: Entity, bit: u32) -> Result<(), EcsError> {
        let Some(column) = self.column_mut(bit) else {
            return Ok(());
        };
        let type_info = column.type_info();
        self.component_removed
            .publish(&ComponentRemoved { entity, type_info });

        if let Some(column) = self.column_mut(bit) {
            column.remove(entity)?;
        }
        self.signatures[entity as usize].clear(bit);
        Ok(())
    }

    /// Returns true if `entity` is live and holds a `T`.
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        match (self.signature(entity), self.component_type_index::<T>()) {
            (Some(signature), Some(bit)) => signature.test(bit),
            _ => false,
        }
    }

    /// The `T` of `entity`.
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        if !self.is_valid(entity) {
            return None;
        }
        self.storage::<T>()?.pool.get(entity)
    }

    /// The `T` of `entity`, mutably.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        if !self.is_valid(entity) {
            return None;
        }
        self.storage_mut::<T>()?.pool.get_mut(entity)
    }

    // --- Groups ---

    fn signature_of<Q: ComponentSet>(&self) -> Result<EntitySignature, EcsError> {
        let mut signature = EntitySignature::new();
        for type_info in Q::type_infos() {
            match self.type_bits.get(&type_info.type_id) {
                Some(&bit) => signature.set(bit),
                None => return check::fail(EcsError::UnregisteredComponent(type_info.name)),
            }
        }
        Ok(signature)
    }

    /// The key of the group of entities matching `Q`.
    pub fn group_key<Q: ComponentSet>(&self, mode: GroupMatch) -> Result<GroupKey, EcsError> {
        Ok(GroupKey::new(self.signature_of::<Q>()?, mode))
    }

    /// Creates the group of entities matching `Q` and returns it.
    ///
    /// The first call scans every entity; afterwards the group is maintained
    /// incrementally and later calls return the cached set.
    pub fn create_group<Q: ComponentSet>(
        &mut self,
        mode: GroupMatch,
    ) -> Result<&EntityGroup, EcsError> {
        let key = self.group_key::<Q>(mode)?;
        let signatures = &self.signatures;
        let group = self.groups.entry(key).or_insert_with(|| {
            let entities = scan(signatures, &key);
            log::debug!(
                "Created {mode:?} group over bits {:?} with {} entities.",
                key.signature.iter_ones().collect::<Vec<_>>(),
                entities.len()
            );
            EntityGroup::new(key, entities)
        });
        Ok(&*group)
    }

    /// The cached group of entities matching `Q`, if it was created.
    pub fn group<Q: ComponentSet>(&self, mode: GroupMatch) -> Option<&EntityGroup> {
        let mut signature = EntitySignature::new();
        for type_info in Q::type_infos() {
            signature.set(*self.type_bits.get(&type_info.type_id)?);
        }
        self.groups.get(&GroupKey::new(signature, mode))
    }

    /// The cached group for `key`.
    pub fn group_by_key(&self, key: &GroupKey) -> Option<&EntityGroup> {
        self.groups.get(key)
    }

    /// Iterates every cached group.
    pub fn groups(&self) -> impl Iterator<Item = &EntityGroup> {
        self.groups.values()
    }

    /// Drops a cached group. Returns false if it did not exist.
    pub fn remove_group(&mut self, key: &GroupKey) -> bool {
        self.groups.remove(key).is_some()
    }

    /// Computes the members of `key` from scratch without touching the cache.
    pub fn scan_group(&self, key: &GroupKey) -> BTreeSet<Entity> {
        scan(&self.signatures, key)
    }

    /// Recomputes every cached group from scratch.
    pub fn rebuild_groups(&mut self) {
        let signatures = &self.signatures;
        for group in self.groups.values_mut() {
            group.replace(scan(signatures, &group.key()));
        }
        log::debug!("Rebuilt {} entity group(s).", self.groups.len());
    }

    fn refresh_groups(&mut self, entity: Entity) {
        let signature = self.signatures[entity as usize];
        for group in self.groups.values_mut() {
            group.refresh(entity, &signature);
        }
    }

    // --- Listeners ---

    /// Listeners notified after a component is attached.
    pub fn on_component_added(&mut self) -> &mut EventBus<ComponentAdded> {
        &mut self.component_added
    }

    /// Listeners notified right before a component is detached.
    pub fn on_component_removed(&mut self) -> &mut EventBus<ComponentRemoved> {
        &mut self.component_removed
    }
}

fn scan(signatures: &[EntitySignature], key: &GroupKey) -> BTreeSet<Entity> {
    signatures
        .iter()
        .enumerate()
        .filter(|(_, signature)| key.matches(signature))
        .map(|(entity, _)| entity as Entity)
        .collect()
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new(EntityConfig::default())
    }
}

impl fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("entity_count", &self.entity_count)
            .field("component_types", &self.columns.len())
            .field("groups", &self.groups.len())
            .finish()
    }
}
