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

//! Implements the sparse set that indexes every pool.
//!
//! A sparse set maps a wide range of element ids onto a compact range of slots.
//! `sparse[element]` holds the element's slot (or [`INVALID_INDEX`]) and
//! `dense[slot]` holds the element back, so membership, insertion and removal
//! are all O(1) and the occupied slots `0..len` stay contiguous.

use nit_core::check;
use thiserror::Error;

/// The sentinel stored in vacant sparse entries. Never a legal element.
pub const INVALID_INDEX: u32 = u32::MAX;

/// An error raised by an operation on a [`SparseSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SparseSetError {
    /// The set has not been loaded, or has been released.
    #[error("sparse set is not initialized")]
    Uninitialized,
    /// `load` was called on a set that already owns storage.
    #[error("sparse set is already loaded with capacity {0}")]
    AlreadyLoaded(u32),
    /// The requested capacity is zero or the sentinel value.
    #[error("invalid sparse set capacity {0}")]
    InvalidCapacity(u32),
    /// The element is the reserved sentinel.
    #[error("element {INVALID_INDEX} is reserved")]
    InvalidElement,
    /// The element is already in the set.
    #[error("element {0} is already present")]
    AlreadyPresent(u32),
    /// The element is not in the set.
    #[error("element {0} is not present")]
    Absent(u32),
    /// Deleting from an empty set.
    #[error("sparse set is empty")]
    Empty,
    /// `resize` was asked to shrink.
    #[error("cannot shrink sparse set from {current} to {requested}")]
    ShrinkRejected {
        /// The current capacity.
        current: u32,
        /// The rejected capacity.
        requested: u32,
    },
    /// Growing would overflow the id space.
    #[error("sparse set capacity cannot grow past {0}")]
    CapacityOverflow(u32),
}

/// The two slots touched by a deletion.
///
/// The element formerly stored in `last_slot` now lives in `deleted_slot`;
/// owners of a parallel array must perform the same move. When both are equal
/// the deleted element was the last one and nothing moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparseSetDeletion {
    /// The slot the deleted element occupied.
    pub deleted_slot: u32,
    /// The slot that was the last occupied one before the deletion.
    pub last_slot: u32,
}

impl SparseSetDeletion {
    /// Returns true if another element moved into the freed slot.
    pub fn moved(&self) -> bool {
        self.deleted_slot != self.last_slot
    }
}

/// A sparse-to-dense index over `u32` elements.
///
/// The default value is uninitialized: every structural operation fails until
/// [`SparseSet::load`] is called.
#[derive(Debug, Default, Clone)]
pub struct SparseSet {
    sparse: Vec<u32>,
    dense: Vec<u32>,
    count: u32,
}

impl SparseSet {
    /// Creates a loaded set with room for `capacity` elements.
    pub fn with_capacity(capacity: u32) -> Result<Self, SparseSetError> {
        let mut set = Self::default();
        set.load(capacity)?;
        Ok(set)
    }

    /// Returns true if the set owns storage.
    pub fn is_valid(&self) -> bool {
        !self.sparse.is_empty()
    }

    /// Returns true if no element is stored. An uninitialized set is empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns true if the next insertion will grow the set.
    pub fn is_full(&self) -> bool {
        self.is_valid() && self.count == self.capacity()
    }

    /// Number of stored elements.
    pub fn len(&self) -> u32 {
        self.count
    }

    /// Number of addressable elements before growth.
    pub fn capacity(&self) -> u32 {
        self.sparse.len() as u32
    }

    /// The occupied dense prefix: `dense()[slot]` is the element stored at `slot`.
    pub fn dense(&self) -> &[u32] {
        &self.dense[..self.count as usize]
    }

    /// Allocates storage for `capacity` elements.
    pub fn load(&mut self, capacity: u32) -> Result<(), SparseSetError> {
        if self.is_valid() {
            return check::fail(SparseSetError::AlreadyLoaded(self.capacity()));
        }
        if capacity == 0 || capacity == INVALID_INDEX {
            return check::fail(SparseSetError::InvalidCapacity(capacity));
        }

        self.sparse = vec![INVALID_INDEX; capacity as usize];
        self.dense = vec![INVALID_INDEX; capacity as usize];
        self.count = 0;
        Ok(())
    }

    /// Returns true if `element` is stored.
    pub fn contains(&self, element: u32) -> bool {
        self.slot_of(element).is_some()
    }

    /// Returns the slot of `element`, or `None` if it is not stored.
    pub fn slot_of(&self, element: u32) -> Option<u32> {
        match self.sparse.get(element as usize) {
            Some(&slot) if slot != INVALID_INDEX => Some(slot),
            _ => None,
        }
    }

    /// Appends `element` and returns its slot, which is always the previous `len()`.
    ///
    /// Grows by doubling when the set is full or when `element` lies beyond
    /// the current capacity.
    pub fn insert(&mut self, element: u32) -> Result<u32, SparseSetError> {
        if !self.is_valid() {
            return check::fail(SparseSetError::Uninitialized);
        }
        if element == INVALID_INDEX {
            return check::fail(SparseSetError::InvalidElement);
        }
        if self.contains(element) {
            return check::fail(SparseSetError::AlreadyPresent(element));
        }

        let mut required = self.capacity();
        while self.count >= required || element >= required {
            required = required
                .checked_mul(2)
                .filter(|grown| *grown != INVALID_INDEX)
                .or_else(|| (required < INVALID_INDEX - 1).then_some(INVALID_INDEX - 1))
                .ok_or_else(|| check::violation(SparseSetError::CapacityOverflow(required)))?;
        }
        if required != self.capacity() {
            self.resize(required)?;
        }

        let slot = self.count;
        self.sparse[element as usize] = slot;
        self.dense[slot as usize] = element;
        self.count += 1;
        Ok(slot)
    }

    /// Removes `element` by moving the last occupied slot into its place.
    pub fn delete(&mut self, element: u32) -> Result<SparseSetDeletion, SparseSetError> {
        if !self.is_valid() {
            return check::fail(SparseSetError::Uninitialized);
        }
        if self.count == 0 {
            return check::fail(SparseSetError::Empty);
        }
        let Some(deleted_slot) = self.slot_of(element) else {
            return check::fail(SparseSetError::Absent(element));
        };

        let last_slot = self.count - 1;
        let last_element = self.dense[last_slot as usize];

        // Redirect the moved element before vacating the deleted one, so that
        // deleting the last element leaves it vacant.
        self.dense[deleted_slot as usize] = last_element;
        self.sparse[last_element as usize] = deleted_slot;
        self.sparse[element as usize] = INVALID_INDEX;
        self.dense[last_slot as usize] = INVALID_INDEX;
        self.count -= 1;

        Ok(SparseSetDeletion {
            deleted_slot,
            last_slot,
        })
    }

    /// Grows the set to `new_capacity`, keeping every mapping.
    pub fn resize(&mut self, new_capacity: u32) -> Result<(), SparseSetError> {
        if !self.is_valid() {
            return check::fail(SparseSetError::Uninitialized);
        }
        let current = self.capacity();
        if new_capacity < current {
            return check::fail(SparseSetError::ShrinkRejected {
                current,
                requested: new_capacity,
            });
        }
        if new_capacity == INVALID_INDEX {
            return check::fail(SparseSetError::InvalidCapacity(new_capacity));
        }
        if new_capacity == current {
            return Ok(());
        }

        log::debug!("Growing sparse set from {current} to {new_capacity} elements.");
        self.sparse.resize(new_capacity as usize, INVALID_INDEX);
        self.dense.resize(new_capacity as usize, INVALID_INDEX);
        Ok(())
    }

    /// Frees all storage; the set becomes uninitialized.
    pub fn release(&mut self) -> Result<(), SparseSetError> {
        if !self.is_valid() {
            return check::fail(SparseSetError::Uninitialized);
        }
        self.sparse = Vec::new();
        self.dense = Vec::new();
        self.count = 0;
        Ok(())
    }
}
