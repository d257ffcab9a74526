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

//! Defines data structures related to GPU image resources.
//!
//! Atlas page images are allocated in a deferred-init state: the batcher
//! reserves the id via [`GpuDevice::alloc_image`] and the embedding
//! application completes the upload asynchronously. Draw commands check
//! [`GpuDevice::image_ready`] before binding, so a command that races an
//! in-flight upload is skipped rather than rendered with garbage.
//!
//! [`GpuDevice::alloc_image`]: crate::gpu::GpuDevice::alloc_image
//! [`GpuDevice::image_ready`]: crate::gpu::GpuDevice::image_ready

/// A texture sampling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    /// Nearest-neighbor sampling.
    Nearest,
    /// Bilinear sampling.
    #[default]
    Linear,
    /// Nearest within a mip level, nearest between levels.
    NearestMipmapNearest,
    /// Linear within a mip level, nearest between levels.
    LinearMipmapNearest,
    /// Nearest within a mip level, linear between levels.
    NearestMipmapLinear,
    /// Linear within a mip level, linear between levels.
    LinearMipmapLinear,
}

/// A texture coordinate wrapping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Wrap {
    /// Repeat the texture.
    Repeat,
    /// Repeat the texture, mirrored.
    MirroredRepeat,
    /// Clamp coordinates to the edge texel.
    #[default]
    ClampToEdge,
}

/// An opaque handle to a GPU image resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub usize);
