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

//! A generic object pool addressed by integer ids.
//!
//! A [`Pool`] pairs a [`SparseSet`] over ids with a dense `Vec<T>` kept in
//! lockstep with the set's dense array: the value of id `dense()[i]` lives at
//! `values()[i]`. Deleting moves the last value into the hole, mirroring the
//! sparse set, so iteration over `values()` is always contiguous.

use crate::sparse_set::{SparseSet, SparseSetDeletion, SparseSetError};
use nit_core::{check, TypeInfo};
use std::collections::VecDeque;
use thiserror::Error;

/// An error raised by an operation on a [`Pool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The underlying index rejected the operation.
    #[error(transparent)]
    SparseSet(#[from] SparseSetError),
    /// Inserting would need growth but the pool is fixed-size.
    #[error("{type_name} pool is full ({capacity} slots) and cannot grow")]
    CapacityExceeded {
        /// The pool's element type.
        type_name: &'static str,
        /// The fixed capacity.
        capacity: u32,
    },
    /// `insert_new` on a pool whose ids are chosen by the caller.
    #[error("{0} pool does not manage its own ids")]
    NotSelfManaged(&'static str),
}

/// Who picks the ids of a pool's elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdMode {
    /// Ids mirror an external key, such as the owning entity.
    External,
    /// The pool hands out ids from its own free list.
    SelfManaged,
}

/// What happens when an insertion does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// Double the capacity.
    Double,
    /// Refuse the insertion.
    Fixed,
}

/// A value container indexed by `u32` ids with O(1) insert, lookup and delete.
///
/// References returned by [`Pool::get`] and friends borrow the pool, so the
/// borrow checker already forbids keeping them across an insert or delete.
#[derive(Debug, Clone)]
pub struct Pool<T> {
    type_info: TypeInfo,
    sparse_set: SparseSet,
    values: Vec<T>,
    id_mode: IdMode,
    growth: Growth,
    available_ids: VecDeque<u32>,
}

impl<T: 'static> Pool<T> {
    /// Creates a pool with room for `capacity` elements.
    pub fn new(capacity: u32, id_mode: IdMode, growth: Growth) -> Result<Self, PoolError> {
        Self::with_type_info(TypeInfo::of::<T>(), capacity, id_mode, growth)
    }

    /// Creates a pool described by an explicit [`TypeInfo`].
    pub fn with_type_info(
        type_info: TypeInfo,
        capacity: u32,
        id_mode: IdMode,
        growth: Growth,
    ) -> Result<Self, PoolError> {
        let sparse_set = SparseSet::with_capacity(capacity)?;
        let available_ids = match id_mode {
            IdMode::SelfManaged => (0..capacity).collect(),
            IdMode::External => VecDeque::new(),
        };
        log::debug!(
            "Created {} pool: {capacity} slots of {} bytes.",
            type_info.name,
            type_info.size
        );
        Ok(Self {
            type_info,
            sparse_set,
            values: Vec::with_capacity(capacity as usize),
            id_mode,
            growth,
            available_ids,
        })
    }
}

impl<T> Pool<T> {
    /// Descriptor of the element type.
    pub fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// How ids are assigned.
    pub fn id_mode(&self) -> IdMode {
        self.id_mode
    }

    /// Number of stored elements.
    pub fn len(&self) -> u32 {
        self.sparse_set.len()
    }

    /// Returns true if no element is stored.
    pub fn is_empty(&self) -> bool {
        self.sparse_set.is_empty()
    }

    /// Number of slots before growth.
    pub fn capacity(&self) -> u32 {
        self.sparse_set.capacity()
    }

    /// Returns true if the pool owns storage (it has not been released).
    pub fn is_valid(&self) -> bool {
        self.sparse_set.is_valid()
    }

    /// Returns true if `id` is stored.
    pub fn contains(&self, id: u32) -> bool {
        self.sparse_set.contains(id)
    }

    /// Dense slot of `id`.
    pub fn slot_of(&self, id: u32) -> Option<u32> {
        self.sparse_set.slot_of(id)
    }

    /// Ids in dense order; parallel to [`Pool::values`].
    pub fn ids(&self) -> &[u32] {
        self.sparse_set.dense()
    }

    /// Values in dense order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Mutable values in dense order.
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Iterates `(id, value)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> {
        self.sparse_set.dense().iter().copied().zip(self.values.iter())
    }

    /// Iterates `(id, value)` pairs in dense order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, &mut T)> {
        self.sparse_set
            .dense()
            .iter()
            .copied()
            .zip(self.values.iter_mut())
    }

    /// Returns the value stored for `id`.
    pub fn get(&self, id: u32) -> Option<&T> {
        let slot = self.sparse_set.slot_of(id)?;
        self.values.get(slot as usize)
    }

    /// Returns the value stored for `id`, mutably.
    pub fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        let slot = self.sparse_set.slot_of(id)?;
        self.values.get_mut(slot as usize)
    }

    /// Stores `value` under the caller-chosen `id`.
    ///
    /// Fails if `id` is already stored; replacing requires a delete first.
    pub fn insert_with_id(&mut self, id: u32, value: T) -> Result<&mut T, PoolError> {
        if self.growth == Growth::Fixed && (id >= self.capacity() || self.sparse_set.is_full()) {
            return check::fail(PoolError::CapacityExceeded {
                type_name: self.type_info.name,
                capacity: self.capacity(),
            });
        }

        let old_capacity = self.capacity();
        let slot = self.sparse_set.insert(id)?;
        debug_assert_eq!(slot as usize, self.values.len());
        self.after_growth(old_capacity);

        log::trace!("{} pool: inserted id {id} at slot {slot}.", self.type_info.name);
        self.values.push(value);
        Ok(&mut self.values[slot as usize])
    }

    /// Stores `value` under an id taken from the free list and returns that id.
    pub fn insert_new(&mut self, value: T) -> Result<(u32, &mut T), PoolError> {
        if self.id_mode != IdMode::SelfManaged {
            return check::fail(PoolError::NotSelfManaged(self.type_info.name));
        }

        let id = match self.next_free_id() {
            Some(id) => id,
            None if self.growth == Growth::Double => {
                // Every id below capacity is in use: the next one forces growth.
                let id = self.capacity();
                self.available_ids.push_back(id);
                self.next_free_id().unwrap_or(id)
            }
            None => {
                return check::fail(PoolError::CapacityExceeded {
                    type_name: self.type_info.name,
                    capacity: self.capacity(),
                })
            }
        };

        let value = self.insert_with_id(id, value)?;
        Ok((id, value))
    }

    /// Pops free ids until one is found that is not in use.
    ///
    /// Ids inserted explicitly into a self-managed pool stay queued; they are
    /// discarded here instead of being searched for on every insert.
    fn next_free_id(&mut self) -> Option<u32> {
        while let Some(id) = self.available_ids.pop_front() {
            if !self.sparse_set.contains(id) {
                return Some(id);
            }
        }
        None
    }

    fn after_growth(&mut self, old_capacity: u32) {
        let new_capacity = self.capacity();
        if new_capacity == old_capacity {
            return;
        }
        log::debug!(
            "{} pool grew from {old_capacity} to {new_capacity} slots.",
            self.type_info.name
        );
        self.values
            .reserve_exact((new_capacity - old_capacity) as usize);
        if self.id_mode == IdMode::SelfManaged {
            self.available_ids.extend(old_capacity..new_capacity);
        }
    }

    /// Removes the value stored for `id` and returns it with the slots touched.
    pub fn remove(&mut self, id: u32) -> Result<(T, SparseSetDeletion), PoolError> {
        let deletion = self.sparse_set.delete(id)?;
        let value = self.values.swap_remove(deletion.deleted_slot as usize);
        if self.id_mode == IdMode::SelfManaged {
            self.available_ids.push_back(id);
        }
        log::trace!(
            "{} pool: removed id {id} from slot {}.",
            self.type_info.name,
            deletion.deleted_slot
        );
        Ok((value, deletion))
    }

    /// Removes the value stored for `id`, dropping it.
    pub fn delete(&mut self, id: u32) -> Result<SparseSetDeletion, PoolError> {
        self.remove(id).map(|(_, deletion)| deletion)
    }

    /// Grows the pool to `new_capacity` slots.
    pub fn resize(&mut self, new_capacity: u32) -> Result<(), PoolError> {
        let old_capacity = self.capacity();
        self.sparse_set.resize(new_capacity)?;
        self.after_growth(old_capacity);
        Ok(())
    }

    /// Drops every value and frees all storage.
    pub fn release(&mut self) -> Result<(), PoolError> {
        self.sparse_set.release()?;
        self.values = Vec::new();
        self.available_ids.clear();
        Ok(())
    }
}
