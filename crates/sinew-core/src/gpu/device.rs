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

use crate::gpu::buffer::{BufferDescriptor, BufferId};
use crate::gpu::error::GpuError;
use crate::gpu::image::ImageId;
use crate::gpu::pipeline::{PipelineDescriptor, PipelineId};
use std::fmt::Debug;

/// The programmable stage a uniform block is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// The vertex shader stage.
    Vertex,
    /// The fragment shader stage.
    Fragment,
}

/// The resource bindings applied before an indexed draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    /// The vertex stream buffer.
    pub vertex_buffer: BufferId,
    /// The 32-bit index stream buffer.
    pub index_buffer: BufferId,
    /// The fragment-stage texture.
    pub image: ImageId,
}

/// The GPU capability the batcher renders through.
///
/// Implemented by the embedding application's graphics backend. The batcher
/// only ever calls into this trait; it never owns a swapchain, a shader, or
/// a window. Resource creation is fallible; the submission path
/// (`apply_*`/`draw_indexed`) is fire-and-forget, mirroring a command-list
/// recording API.
///
/// Index buffers always hold 32-bit indices.
pub trait GpuDevice: Send + Sync + Debug {
    /// Creates a new GPU buffer.
    ///
    /// # Errors
    /// * `GpuError` - If the buffer creation fails.
    fn create_buffer(&self, descriptor: &BufferDescriptor<'_>) -> Result<BufferId, GpuError>;

    /// Destroys a GPU buffer.
    ///
    /// # Errors
    /// * `GpuError` - If the buffer destruction fails.
    fn destroy_buffer(&self, id: BufferId) -> Result<(), GpuError>;

    /// Overwrites the contents of a GPU buffer starting at `offset`.
    ///
    /// # Errors
    /// * `GpuError` - If the write fails or overruns the buffer.
    fn write_buffer(&self, id: BufferId, offset: u64, data: &[u8]) -> Result<(), GpuError>;

    /// Reserves an image id in a deferred-init state.
    ///
    /// The embedding application completes the image (pixel upload, sampler
    /// configuration) on its own schedule; until it does,
    /// [`GpuDevice::image_ready`] reports `false` for the id.
    ///
    /// # Errors
    /// * `GpuError` - If no image id can be reserved.
    fn alloc_image(&self) -> Result<ImageId, GpuError>;

    /// Destroys a GPU image.
    ///
    /// # Errors
    /// * `GpuError` - If the image destruction fails.
    fn destroy_image(&self, id: ImageId) -> Result<(), GpuError>;

    /// Whether the image behind `id` is fully initialized and drawable.
    fn image_ready(&self, id: ImageId) -> bool;

    /// Creates a render pipeline.
    ///
    /// # Errors
    /// * `GpuError` - If the pipeline creation fails.
    fn create_pipeline(&self, descriptor: &PipelineDescriptor<'_>) -> Result<PipelineId, GpuError>;

    /// Destroys a render pipeline.
    ///
    /// # Errors
    /// * `GpuError` - If the pipeline destruction fails.
    fn destroy_pipeline(&self, id: PipelineId) -> Result<(), GpuError>;

    /// Makes `id` the active pipeline for subsequent draws.
    fn apply_pipeline(&self, id: PipelineId);

    /// Applies vertex/index/texture bindings for subsequent draws.
    fn apply_bindings(&self, bindings: &Bindings);

    /// Uploads a uniform block to the given shader stage.
    fn apply_uniforms(&self, stage: ShaderStage, data: &[u8]);

    /// Issues an indexed draw of `num_elements` indices starting at
    /// `base_element`.
    fn draw_indexed(&self, base_element: u32, num_elements: u32, num_instances: u32);
}
