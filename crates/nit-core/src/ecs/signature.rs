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

//! Implements the fixed-width bitset recording which components an entity has.

/// Upper bound on registered component types. Bits `1..=MAX_COMPONENT_TYPES`
/// of a signature are available to component types.
pub const MAX_COMPONENT_TYPES: usize = 100;

/// Bit 0 of every signature: set while the entity slot is live.
pub const LIVE_BIT: u32 = 0;

const WORDS: usize = 2;
const BITS: u32 = (WORDS * 64) as u32;

/// A fixed-width bitset: bit 0 is the liveness flag, bit `i > 0` is set when
/// the entity holds the component whose type index is `i`.
///
/// Signatures are `Copy`, hashable and ordered so they can key the registry's
/// group cache directly.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntitySignature {
    bits: [u64; WORDS],
}

impl EntitySignature {
    /// Number of addressable bits.
    pub const CAPACITY: u32 = BITS;

    /// Creates an empty signature.
    pub const fn new() -> Self {
        Self { bits: [0; WORDS] }
    }

    /// Builds a signature with exactly the given bits set.
    pub fn from_bits(indices: impl IntoIterator<Item = u32>) -> Self {
        let mut signature = Self::new();
        for index in indices {
            signature.set(index);
        }
        signature
    }

    /// Sets the bit at `index`. Out-of-range indices are ignored.
    pub fn set(&mut self, index: u32) {
        if index < BITS {
            self.bits[(index / 64) as usize] |= 1 << (index % 64);
        }
    }

    /// Clears the bit at `index`.
    pub fn clear(&mut self, index: u32) {
        if index < BITS {
            self.bits[(index / 64) as usize] &= !(1 << (index % 64));
        }
    }

    /// Returns true if the bit at `index` is set.
    pub fn test(&self, index: u32) -> bool {
        index < BITS && (self.bits[(index / 64) as usize] & (1 << (index % 64))) != 0
    }

    /// Returns true if the liveness bit is set.
    pub fn is_live(&self) -> bool {
        self.test(LIVE_BIT)
    }

    /// The same signature with the liveness bit cleared.
    pub fn components(&self) -> Self {
        let mut components = *self;
        components.clear(LIVE_BIT);
        components
    }

    /// Returns true if every bit set in `other` is also set in `self`.
    pub fn contains_all(&self, other: &EntitySignature) -> bool {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .all(|(mine, theirs)| mine & theirs == *theirs)
    }

    /// Returns true if no bit is set.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|word| *word == 0)
    }

    /// Number of set bits.
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|word| word.count_ones()).sum()
    }

    /// Resets every bit.
    pub fn reset(&mut self) {
        self.bits = [0; WORDS];
    }

    /// Iterates the indices of the set bits in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = u32> + '_ {
        self.bits.iter().enumerate().flat_map(|(word_idx, &word)| {
            (0..64u32)
                .filter(move |bit| word & (1 << bit) != 0)
                .map(move |bit| word_idx as u32 * 64 + bit)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_clear_and_test_across_words() {
        let mut signature = EntitySignature::new();
        signature.set(LIVE_BIT);
        signature.set(3);
        signature.set(70);
        assert!(signature.is_live());
        assert!(signature.test(3));
        assert!(signature.test(70));
        assert_eq!(signature.count(), 3);

        signature.clear(70);
        assert!(!signature.test(70));
        assert_eq!(signature.iter_ones().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn components_drop_the_live_bit() {
        let signature = EntitySignature::from_bits([LIVE_BIT, 2, 5]);
        assert_eq!(signature.components(), EntitySignature::from_bits([2, 5]));
        assert!(!signature.components().is_live());
    }

    #[test]
    fn superset_matching() {
        let entity = EntitySignature::from_bits([0, 1, 2, 90]);
        assert!(entity.contains_all(&EntitySignature::from_bits([1, 2])));
        assert!(entity.contains_all(&EntitySignature::from_bits([90])));
        assert!(!entity.contains_all(&EntitySignature::from_bits([1, 3])));
        assert!(entity.contains_all(&EntitySignature::new()));
    }

    #[test]
    fn out_of_range_bits_are_ignored() {
        let mut signature = EntitySignature::new();
        signature.set(EntitySignature::CAPACITY);
        assert!(signature.is_empty());
        assert!(!signature.test(EntitySignature::CAPACITY + 5));
    }
}
