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

//! Frame-scoped, auto-rewinding storage for vertices, indices, and draw
//! commands.
//!
//! A [`FramePool`] never allocates after construction. Starting a new frame
//! costs O(1): nothing is cleared eagerly, each pool rewinds its own write
//! cursor the first time it is touched after the global frame counter has
//! moved on. A pool a given frame never touches is never rewound.

use sinew_core::math::Vec2;

/// One vertex of the shared stream: position, texture coordinate, and a
/// packed RGBA8 color.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// World-space position.
    pub pos: Vec2,
    /// Texture coordinate.
    pub uv: Vec2,
    /// Packed RGBA8 color (see [`Rgba::to_rgba8`]).
    ///
    /// [`Rgba::to_rgba8`]: sinew_core::math::Rgba::to_rgba8
    pub color: u32,
}

/// A fixed-capacity, frame-scoped growable buffer with a write cursor.
///
/// Writers pass the current global frame number into every call; the pool
/// compares it against the frame it last rewound in and resets its cursor
/// exactly once per frame, on first touch. Allocation past capacity fails
/// closed: the cursor is left untouched and the caller is expected to drop
/// the geometry for that slot rather than corrupt adjacent data.
#[derive(Debug)]
pub struct FramePool<T> {
    buf: Vec<T>,
    cursor: usize,
    rewind_frame: u32,
}

impl<T: Copy + Default> FramePool<T> {
    /// Creates a pool holding at most `capacity` elements per frame.
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![T::default(); capacity],
            cursor: 0,
            rewind_frame: 0,
        }
    }

    /// The fixed per-frame capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of elements written in the pool's current frame.
    #[inline]
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// The elements written in the pool's current frame.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.buf[..self.cursor]
    }

    fn rewind(&mut self, frame: u32) {
        if self.rewind_frame != frame {
            self.cursor = 0;
            self.rewind_frame = frame;
        }
    }

    /// Reserves `count` elements, returning the base offset and a writable
    /// view of the reserved range.
    ///
    /// Returns `None` without moving the cursor when the reservation would
    /// exceed capacity.
    pub fn alloc(&mut self, frame: u32, count: usize) -> Option<(u32, &mut [T])> {
        self.rewind(frame);
        if self.cursor + count <= self.buf.len() {
            let base = self.cursor;
            self.cursor += count;
            Some((base as u32, &mut self.buf[base..base + count]))
        } else {
            None
        }
    }

    /// Appends a single element. Returns `false` when the pool is full.
    pub fn push(&mut self, frame: u32, value: T) -> bool {
        match self.alloc(frame, 1) {
            Some((_, dst)) => {
                dst[0] = value;
                true
            }
            None => false,
        }
    }

    /// The most recently written element of the current frame, if any.
    pub fn last_mut(&mut self, frame: u32) -> Option<&mut T> {
        self.rewind(frame);
        if self.cursor > 0 {
            Some(&mut self.buf[self.cursor - 1])
        } else {
            None
        }
    }
}
