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

use super::handle::{Handle, SLOT_MASK, SLOT_SHIFT};
use super::state::ResourceState;

/// Maximum capacity of a [`Pool`] (slot indices are 16-bit, slot 0 reserved).
pub const MAX_POOL_CAPACITY: usize = SLOT_MASK as usize;

/// One pool slot: the current raw id, the lifecycle state, and the payload.
#[derive(Debug)]
struct Entry<T> {
    id: u32,
    state: ResourceState,
    payload: Option<T>,
}

impl<T> Entry<T> {
    const fn empty() -> Self {
        Self {
            id: 0,
            state: ResourceState::Initial,
            payload: None,
        }
    }
}

/// A fixed-capacity slot pool issuing generation-checked [`Handle`]s.
///
/// All storage is allocated once at construction and never resized. The
/// free list is a LIFO stack pre-filled in descending order, so slot 1 is
/// handed out first — the deterministic allocation order is part of the
/// contract and relied on by tests.
///
/// Exhaustion is a recoverable condition: [`Pool::alloc`] returns
/// [`Handle::INVALID`] rather than failing. Double-freeing a slot is a
/// contract violation and is detected in debug builds.
#[derive(Debug)]
pub struct Pool<T> {
    entries: Vec<Entry<T>>,
    gen_ctrs: Vec<u16>,
    free_stack: Vec<u16>,
}

impl<T> Pool<T> {
    /// Creates a pool able to hold `capacity` live resources.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or exceeds [`MAX_POOL_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        assert!(
            capacity >= 1 && capacity <= MAX_POOL_CAPACITY,
            "pool capacity out of range: {capacity}"
        );
        // Slot 0 is reserved for the invalid handle, so storage holds one
        // extra entry that is never handed out.
        let mut entries = Vec::with_capacity(capacity + 1);
        entries.resize_with(capacity + 1, Entry::empty);
        let mut free_stack = Vec::with_capacity(capacity);
        for i in (1..=capacity).rev() {
            free_stack.push(i as u16);
        }
        Self {
            entries,
            gen_ctrs: vec![0; capacity + 1],
            free_stack,
        }
    }

    /// The number of resources this pool can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len() - 1
    }

    /// Reserves a slot and moves it to the `Alloc` state.
    ///
    /// Returns [`Handle::INVALID`] when the pool is exhausted; the caller
    /// must treat that as resource exhaustion, not a fault.
    pub fn alloc(&mut self) -> Handle<T> {
        let Some(slot_index) = self.free_stack.pop() else {
            log::debug!("pool exhausted (capacity {})", self.capacity());
            return Handle::INVALID;
        };
        let ix = slot_index as usize;
        let entry = &mut self.entries[ix];
        debug_assert_eq!(entry.id, 0, "allocated a non-initial pool slot");
        debug_assert_eq!(entry.state, ResourceState::Initial);

        // Bump the slot's generation. The counter wraps at 16 bits and
        // skips zero, so a recycled slot can never reconstitute a raw id
        // equal to a bare slot index.
        let ctr = &mut self.gen_ctrs[ix];
        *ctr = ctr.wrapping_add(1);
        if *ctr == 0 {
            *ctr = 1;
        }
        let id = (u32::from(*ctr) << SLOT_SHIFT) | u32::from(slot_index);
        entry.id = id;
        entry.state = ResourceState::Alloc;
        Handle::from_raw(id)
    }

    /// Completes construction of a freshly allocated slot with its payload.
    ///
    /// Must be called exactly once on a handle in the `Alloc` state;
    /// anything else is a contract violation checked in debug builds.
    pub fn set_valid(&mut self, handle: Handle<T>, payload: T) {
        let entry = &mut self.entries[handle.slot_index()];
        debug_assert_eq!(entry.id, handle.raw(), "stale handle in set_valid");
        debug_assert_eq!(
            entry.state,
            ResourceState::Alloc,
            "double-initialized pool slot"
        );
        entry.state = ResourceState::Valid;
        entry.payload = Some(payload);
    }

    /// Marks a freshly allocated slot as failed.
    ///
    /// The handle stays allocated and queryable (so callers can ask why a
    /// `make_*` call failed) until it is explicitly freed.
    pub fn set_failed(&mut self, handle: Handle<T>) {
        let entry = &mut self.entries[handle.slot_index()];
        debug_assert_eq!(entry.id, handle.raw(), "stale handle in set_failed");
        debug_assert_eq!(
            entry.state,
            ResourceState::Alloc,
            "double-initialized pool slot"
        );
        entry.state = ResourceState::Failed;
        entry.payload = None;
    }

    fn entry(&self, handle: Handle<T>) -> Option<&Entry<T>> {
        if handle.is_invalid() {
            return None;
        }
        let entry = self.entries.get(handle.slot_index())?;
        (entry.id == handle.raw()).then_some(entry)
    }

    /// Resolves a handle to its payload.
    ///
    /// Returns `None` for stale or invalid handles and for resources that
    /// are not in the `Valid` state.
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.entry(handle)?.payload.as_ref()
    }

    /// Mutable variant of [`Pool::get`].
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        if handle.is_invalid() {
            return None;
        }
        let entry = self.entries.get_mut(handle.slot_index())?;
        if entry.id != handle.raw() {
            return None;
        }
        entry.payload.as_mut()
    }

    /// Whether the handle resolves to a live slot in any state.
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.entry(handle).is_some()
    }

    /// The lifecycle state of the resource behind `handle`.
    ///
    /// Degrades to [`ResourceState::Invalid`] for any handle that fails
    /// lookup, regardless of what the slot's last known state was.
    pub fn state(&self, handle: Handle<T>) -> ResourceState {
        self.entry(handle)
            .map(|e| e.state)
            .unwrap_or(ResourceState::Invalid)
    }

    /// Releases the slot behind `handle`, returning the payload if any.
    ///
    /// Freeing a stale or invalid handle is a no-op.
    pub fn free(&mut self, handle: Handle<T>) -> Option<T> {
        if self.entry(handle).is_none() {
            return None;
        }
        let ix = handle.slot_index();
        let entry = &mut self.entries[ix];
        let payload = entry.payload.take();
        entry.id = 0;
        entry.state = ResourceState::Initial;
        #[cfg(debug_assertions)]
        {
            // Double-free check: the slot must not already be on the free
            // list.
            assert!(
                !self.free_stack.contains(&(ix as u16)),
                "double free of pool slot {ix}"
            );
        }
        debug_assert!(self.free_stack.len() < self.capacity() + 1);
        self.free_stack.push(ix as u16);
        payload
    }

    /// Handles of all live slots, in slot order. Used for bulk teardown.
    pub fn live_handles(&self) -> impl Iterator<Item = Handle<T>> + '_ {
        self.entries
            .iter()
            .filter(|e| e.id != 0)
            .map(|e| Handle::from_raw(e.id))
    }
}
