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

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Number of bits reserved for the slot index in a raw handle id.
pub(crate) const SLOT_SHIFT: u32 = 16;
/// Mask extracting the slot index from a raw handle id.
pub(crate) const SLOT_MASK: u32 = (1 << SLOT_SHIFT) - 1;

/// An opaque, typed identifier for a pool-resident resource.
///
/// The raw value packs `(generation << 16) | slot_index`. Slot index zero is
/// reserved, so a raw value of `0` is the invalid handle. Equality compares
/// the whole raw value; two handles for the same slot but different
/// generations are distinct.
///
/// The type parameter ties a handle to the payload type of the [`Pool`]
/// that issued it, so an atlas handle cannot be passed where a skeleton
/// handle is expected.
///
/// [`Pool`]: crate::resource::Pool
pub struct Handle<T> {
    id: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// The reserved invalid handle. Returned by a pool on exhaustion and
    /// never resolves to a resource.
    pub const INVALID: Self = Self {
        id: 0,
        _marker: PhantomData,
    };

    /// Reconstitutes a handle from its raw id.
    pub(crate) const fn from_raw(id: u32) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// The raw packed id.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.id
    }

    /// Whether this is the reserved invalid handle.
    #[inline]
    pub const fn is_invalid(self) -> bool {
        self.id == 0
    }

    /// The slot index this handle points at.
    #[inline]
    pub const fn slot_index(self) -> usize {
        (self.id & SLOT_MASK) as usize
    }

    /// The generation counter baked into this handle.
    #[inline]
    pub const fn generation(self) -> u16 {
        (self.id >> SLOT_SHIFT) as u16
    }
}

// Manual impls: the derives would put unnecessary bounds on `T`.

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Handle(gen={}, slot={})",
            self.generation(),
            self.slot_index()
        )
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::INVALID
    }
}
