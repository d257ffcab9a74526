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

//! Defines data structures related to GPU buffer resources.

use std::borrow::Cow;

/// What a buffer is bound as during a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// A vertex buffer.
    Vertex,
    /// An index buffer holding 32-bit indices.
    Index,
}

/// The update pattern of a buffer's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    /// Written once at creation, never updated.
    Immutable,
    /// Updated infrequently.
    Dynamic,
    /// Rewritten every frame (the batcher's vertex/index streams).
    #[default]
    Stream,
}

/// A descriptor used to create a GPU buffer.
#[derive(Debug, Clone)]
pub struct BufferDescriptor<'a> {
    /// An optional debug label for the buffer.
    pub label: Option<Cow<'a, str>>,
    /// The total size of the buffer in bytes.
    pub size: u64,
    /// What the buffer is bound as.
    pub kind: BufferKind,
    /// How often the buffer's contents change.
    pub usage: BufferUsage,
}

/// An opaque handle to a GPU buffer resource.
///
/// This id is returned by [`GpuDevice::create_buffer`] and is used to
/// reference the buffer in all subsequent operations.
///
/// [`GpuDevice::create_buffer`]: crate::gpu::GpuDevice::create_buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub usize);
