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

//! The renderer surface: resource creation and destruction, the per-frame
//! loop, and the thin instance accessors.
//!
//! One [`SkeletonRenderer`] is one isolated system instance. It owns every
//! pool, the global frame counter, and the current-context selection;
//! dropping it tears everything down. Tests create independent instances —
//! there is no hidden global state.

use crate::atlas::{Atlas, AtlasDesc, AtlasId, ImageInfo};
use crate::batcher;
use crate::context::{Context, ContextDesc, ContextId, LayerTransform};
use crate::error::RuntimeError;
use crate::instance::{Instance, InstanceDesc, InstanceId};
use crate::runtime::AnimationRuntime;
use crate::skeleton::{Skeleton, SkeletonDesc, SkeletonId};
use sinew_core::gpu::{ColorMask, GpuDevice, PixelFormat};
use sinew_core::math::{Rgba, Vec2};
use sinew_core::{Pool, ResourceState};
use std::sync::Arc;

/// Default capacity of the context pool.
pub const DEFAULT_CONTEXT_POOL_SIZE: usize = 4;
/// Default capacity of the atlas pool.
pub const DEFAULT_ATLAS_POOL_SIZE: usize = 64;
/// Default capacity of the skeleton pool.
pub const DEFAULT_SKELETON_POOL_SIZE: usize = 64;
/// Default capacity of the instance pool.
pub const DEFAULT_INSTANCE_POOL_SIZE: usize = 1024;

/// Top-level configuration for [`SkeletonRenderer::new`].
///
/// Zero-valued fields are patched with defaults; pool capacities and arena
/// sizes are fixed for the renderer's lifetime. The render-target fields
/// configure the default context.
#[derive(Debug, Clone, Copy)]
pub struct RendererDesc {
    /// Per-frame vertex capacity of the default context.
    pub max_vertices: usize,
    /// Per-frame draw-command capacity of the default context.
    pub max_commands: usize,
    /// Capacity of the context pool.
    pub context_pool_size: usize,
    /// Capacity of the atlas pool.
    pub atlas_pool_size: usize,
    /// Capacity of the skeleton pool.
    pub skeleton_pool_size: usize,
    /// Capacity of the instance pool.
    pub instance_pool_size: usize,
    /// Default context: color attachment format.
    pub color_format: PixelFormat,
    /// Default context: depth attachment format.
    pub depth_format: PixelFormat,
    /// Default context: samples per pixel.
    pub sample_count: u32,
    /// Default context: color write mask.
    pub color_write_mask: ColorMask,
}

impl Default for RendererDesc {
    fn default() -> Self {
        Self {
            max_vertices: 0,
            max_commands: 0,
            context_pool_size: 0,
            atlas_pool_size: 0,
            skeleton_pool_size: 0,
            instance_pool_size: 0,
            color_format: PixelFormat::Rgba8,
            depth_format: PixelFormat::DepthStencil,
            sample_count: 0,
            color_write_mask: ColorMask::ALL,
        }
    }
}

impl RendererDesc {
    fn resolved(&self) -> Self {
        let mut desc = *self;
        if desc.context_pool_size == 0 {
            desc.context_pool_size = DEFAULT_CONTEXT_POOL_SIZE;
        }
        if desc.atlas_pool_size == 0 {
            desc.atlas_pool_size = DEFAULT_ATLAS_POOL_SIZE;
        }
        if desc.skeleton_pool_size == 0 {
            desc.skeleton_pool_size = DEFAULT_SKELETON_POOL_SIZE;
        }
        if desc.instance_pool_size == 0 {
            desc.instance_pool_size = DEFAULT_INSTANCE_POOL_SIZE;
        }
        desc
    }

    fn as_context_desc(&self) -> ContextDesc {
        ContextDesc {
            max_vertices: self.max_vertices,
            max_commands: self.max_commands,
            color_format: self.color_format,
            depth_format: self.depth_format,
            sample_count: self.sample_count,
            color_write_mask: self.color_write_mask,
        }
    }
}

/// The per-frame geometry batcher and resource manager.
///
/// Sits between an [`AnimationRuntime`] (which evaluates skeletal poses)
/// and a [`GpuDevice`] (which owns the actual graphics resources). All
/// operations are single-threaded and synchronous.
///
/// Every `make_*` call returns a handle whose lifecycle state must be
/// polled via the matching `*_state`/`*_valid` query; construction failures
/// surface as the `Failed` state, never as a panic or a `Result`.
#[derive(Debug)]
pub struct SkeletonRenderer {
    device: Arc<dyn GpuDevice>,
    runtime: Arc<dyn AnimationRuntime>,
    frame_count: u32,
    contexts: Pool<Context>,
    atlases: Pool<Atlas>,
    skeletons: Pool<Skeleton>,
    instances: Pool<Instance>,
    default_context: ContextId,
    current_context: ContextId,
}

impl SkeletonRenderer {
    /// Sets up a renderer: creates every pool and the default context.
    ///
    /// If the default context cannot be created (GPU failure) the renderer
    /// still comes up; the failure is observable via
    /// [`SkeletonRenderer::context_state`] on the default context handle.
    pub fn new(
        device: Arc<dyn GpuDevice>,
        runtime: Arc<dyn AnimationRuntime>,
        desc: &RendererDesc,
    ) -> Self {
        let desc = desc.resolved();
        let mut renderer = Self {
            frame_count: 0,
            contexts: Pool::new(desc.context_pool_size),
            atlases: Pool::new(desc.atlas_pool_size),
            skeletons: Pool::new(desc.skeleton_pool_size),
            instances: Pool::new(desc.instance_pool_size),
            default_context: ContextId::INVALID,
            current_context: ContextId::INVALID,
            device,
            runtime,
        };
        let default_context = renderer.make_context(&desc.as_context_desc());
        renderer.default_context = default_context;
        renderer.current_context = default_context;
        renderer
    }

    // --- Frame loop ---

    /// Marks the start of a new frame.
    ///
    /// O(1): nothing is cleared here. Every context's frame pools rewind
    /// lazily the first time they are touched afterwards. Must be called
    /// before batching or drawing in a frame.
    pub fn new_frame(&mut self) {
        self.frame_count = self.frame_count.wrapping_add(1);
    }

    /// Advances an instance's animation state by `delta_seconds` and
    /// updates its world transform.
    ///
    /// A stale handle or a destroyed dependency makes this a silent no-op.
    pub fn update_instance(&mut self, id: InstanceId, delta_seconds: f32) {
        let Some(instance) = self.instances.get_mut(id) else {
            return;
        };
        if !self.skeletons.contains(instance.skeleton) || !self.atlases.contains(instance.atlas) {
            return;
        }
        instance.pose.advance(delta_seconds);
    }

    /// Batches an instance into the current context under `layer`.
    pub fn draw_instance_in_layer(&mut self, id: InstanceId, layer: i32) {
        let ctx_id = self.current_context;
        self.context_draw_instance_in_layer(ctx_id, id, layer);
    }

    /// Batches an instance into an explicit context under `layer`.
    ///
    /// A stale instance or context handle, or a destroyed atlas/skeleton
    /// dependency, makes this a silent no-op.
    pub fn context_draw_instance_in_layer(
        &mut self,
        ctx_id: ContextId,
        instance_id: InstanceId,
        layer: i32,
    ) {
        let Some(instance) = self.instances.get_mut(instance_id) else {
            return;
        };
        let Some(atlas) = self.atlases.get(instance.atlas) else {
            return;
        };
        if !self.skeletons.contains(instance.skeleton) {
            return;
        }
        let Some(ctx) = self.contexts.get_mut(ctx_id) else {
            return;
        };
        batcher::draw_instance(ctx, instance.pose.as_mut(), atlas, self.frame_count, layer);
    }

    /// Replays the current context's commands for `layer`.
    pub fn draw_layer(&mut self, layer: i32, tform: &LayerTransform) {
        let ctx_id = self.current_context;
        self.context_draw_layer(ctx_id, layer, tform);
    }

    /// Replays an explicit context's commands for `layer`.
    pub fn context_draw_layer(&mut self, ctx_id: ContextId, layer: i32, tform: &LayerTransform) {
        let Some(ctx) = self.contexts.get_mut(ctx_id) else {
            return;
        };
        ctx.draw_layer(self.device.as_ref(), self.frame_count, layer, tform);
    }

    // --- Contexts ---

    /// Creates a render context.
    ///
    /// Returns an invalid handle when the context pool is exhausted; a
    /// handle in the `Failed` state when GPU resource creation fails.
    pub fn make_context(&mut self, desc: &ContextDesc) -> ContextId {
        let id = self.contexts.alloc();
        if id.is_invalid() {
            log::warn!("SkeletonRenderer: context pool exhausted");
            return id;
        }
        match Context::new(self.device.as_ref(), &desc.resolved()) {
            Ok(ctx) => self.contexts.set_valid(id, ctx),
            Err(err) => {
                log::warn!("SkeletonRenderer: context creation failed: {err}");
                self.contexts.set_failed(id);
            }
        }
        id
    }

    /// Destroys a context and its GPU resources.
    ///
    /// The default context cannot be destroyed.
    pub fn destroy_context(&mut self, id: ContextId) {
        if id == self.default_context {
            log::warn!("SkeletonRenderer: cannot destroy the default context");
            return;
        }
        if let Some(ctx) = self.contexts.free(id) {
            ctx.destroy(self.device.as_ref());
        }
    }

    /// Makes `id` the current context for subsequent batching and drawing.
    pub fn set_context(&mut self, id: ContextId) {
        self.current_context = id;
    }

    /// The current context.
    pub fn context(&self) -> ContextId {
        self.current_context
    }

    /// The context created at setup.
    pub fn default_context(&self) -> ContextId {
        self.default_context
    }

    // --- Resources ---

    /// Creates an atlas from raw atlas data.
    pub fn make_atlas(&mut self, desc: &AtlasDesc<'_>) -> AtlasId {
        let id = self.atlases.alloc();
        if id.is_invalid() {
            log::warn!("SkeletonRenderer: atlas pool exhausted");
            return id;
        }
        match Atlas::build(self.device.as_ref(), self.runtime.as_ref(), desc) {
            Ok(atlas) => self.atlases.set_valid(id, atlas),
            Err(err) => {
                log::warn!("SkeletonRenderer: atlas creation failed: {err}");
                self.atlases.set_failed(id);
            }
        }
        id
    }

    /// Destroys an atlas and releases its page images.
    ///
    /// Skeletons and instances still referencing it degrade to silent
    /// no-ops; they never observe freed memory.
    pub fn destroy_atlas(&mut self, id: AtlasId) {
        if let Some(atlas) = self.atlases.free(id) {
            atlas.destroy(self.device.as_ref());
        }
    }

    /// Creates shared skeleton data against a `Valid` atlas.
    pub fn make_skeleton(&mut self, desc: &SkeletonDesc<'_>) -> SkeletonId {
        let id = self.skeletons.alloc();
        if id.is_invalid() {
            log::warn!("SkeletonRenderer: skeleton pool exhausted");
            return id;
        }
        match self.build_skeleton(desc) {
            Ok(skeleton) => self.skeletons.set_valid(id, skeleton),
            Err(err) => {
                log::warn!("SkeletonRenderer: skeleton creation failed: {err}");
                self.skeletons.set_failed(id);
            }
        }
        id
    }

    fn build_skeleton(&self, desc: &SkeletonDesc<'_>) -> Result<Skeleton, RuntimeError> {
        if !desc.has_data() {
            return Err(RuntimeError::MalformedData {
                what: "skeleton",
                details: "neither JSON nor binary data provided".into(),
            });
        }
        let desc = desc.resolved();
        let Some(atlas) = self.atlases.get(desc.atlas) else {
            return Err(RuntimeError::MissingDependency("atlas"));
        };
        let data = self.runtime.load_skeleton(atlas.data.as_ref(), &desc)?;
        Ok(Skeleton {
            atlas: desc.atlas,
            data,
        })
    }

    /// Destroys a skeleton.
    pub fn destroy_skeleton(&mut self, id: SkeletonId) {
        self.skeletons.free(id);
    }

    /// Creates one animated instance of a `Valid` skeleton.
    ///
    /// The fresh instance is set to the setup pose with its world transform
    /// evaluated once, so it is drawable before the first update.
    pub fn make_instance(&mut self, desc: &InstanceDesc) -> InstanceId {
        let id = self.instances.alloc();
        if id.is_invalid() {
            log::warn!("SkeletonRenderer: instance pool exhausted");
            return id;
        }
        match self.build_instance(desc) {
            Ok(instance) => self.instances.set_valid(id, instance),
            Err(err) => {
                log::warn!("SkeletonRenderer: instance creation failed: {err}");
                self.instances.set_failed(id);
            }
        }
        id
    }

    fn build_instance(&self, desc: &InstanceDesc) -> Result<Instance, RuntimeError> {
        let Some(skeleton) = self.skeletons.get(desc.skeleton) else {
            return Err(RuntimeError::MissingDependency("skeleton"));
        };
        if self.atlases.get(skeleton.atlas).is_none() {
            return Err(RuntimeError::MissingDependency("atlas"));
        }
        let mut pose = self.runtime.instantiate(&skeleton.data)?;
        pose.set_to_setup_pose();
        pose.advance(0.0);
        Ok(Instance {
            skeleton: desc.skeleton,
            atlas: skeleton.atlas,
            pose,
        })
    }

    /// Destroys an instance.
    pub fn destroy_instance(&mut self, id: InstanceId) {
        self.instances.free(id);
    }

    // --- State queries ---

    /// Lifecycle state of a context handle.
    pub fn context_state(&self, id: ContextId) -> ResourceState {
        self.contexts.state(id)
    }

    /// Lifecycle state of an atlas handle.
    pub fn atlas_state(&self, id: AtlasId) -> ResourceState {
        self.atlases.state(id)
    }

    /// Lifecycle state of a skeleton handle.
    pub fn skeleton_state(&self, id: SkeletonId) -> ResourceState {
        self.skeletons.state(id)
    }

    /// Lifecycle state of an instance handle.
    pub fn instance_state(&self, id: InstanceId) -> ResourceState {
        self.instances.state(id)
    }

    /// Shortcut for `context_state(id) == ResourceState::Valid`.
    pub fn context_valid(&self, id: ContextId) -> bool {
        self.context_state(id) == ResourceState::Valid
    }

    /// Shortcut for `atlas_state(id) == ResourceState::Valid`.
    pub fn atlas_valid(&self, id: AtlasId) -> bool {
        self.atlas_state(id) == ResourceState::Valid
    }

    /// Shortcut for `skeleton_state(id) == ResourceState::Valid`.
    pub fn skeleton_valid(&self, id: SkeletonId) -> bool {
        self.skeleton_state(id) == ResourceState::Valid
    }

    /// Shortcut for `instance_state(id) == ResourceState::Valid`.
    pub fn instance_valid(&self, id: InstanceId) -> bool {
        self.instance_state(id) == ResourceState::Valid
    }

    // --- Atlas queries ---

    /// Number of page images in an atlas (0 for a non-`Valid` handle).
    pub fn num_images(&self, id: AtlasId) -> usize {
        self.atlases.get(id).map(Atlas::num_pages).unwrap_or(0)
    }

    /// Page image metadata, for the embedding application to complete the
    /// deferred image upload.
    pub fn image_info(&self, id: AtlasId, index: usize) -> Option<ImageInfo> {
        self.atlases.get(id)?.image_info(index)
    }

    // --- Instance accessors ---

    /// Moves an instance. No-op on a stale handle.
    pub fn set_position(&mut self, id: InstanceId, position: Vec2) {
        if let Some(instance) = self.instances.get_mut(id) {
            instance.pose.set_position(position);
        }
    }

    /// The instance position, or zero for a stale handle.
    pub fn position(&self, id: InstanceId) -> Vec2 {
        self.instances
            .get(id)
            .map(|i| i.pose.position())
            .unwrap_or(Vec2::ZERO)
    }

    /// Rescales an instance. No-op on a stale handle.
    pub fn set_scale(&mut self, id: InstanceId, scale: Vec2) {
        if let Some(instance) = self.instances.get_mut(id) {
            instance.pose.set_scale(scale);
        }
    }

    /// The instance scale, or zero for a stale handle.
    pub fn scale(&self, id: InstanceId) -> Vec2 {
        self.instances
            .get(id)
            .map(|i| i.pose.scale())
            .unwrap_or(Vec2::ZERO)
    }

    /// Replaces the skeleton-level tint. No-op on a stale handle.
    pub fn set_color(&mut self, id: InstanceId, color: Rgba) {
        if let Some(instance) = self.instances.get_mut(id) {
            instance.pose.set_color(color);
        }
    }

    /// The skeleton-level tint, or transparent black for a stale handle.
    pub fn color(&self, id: InstanceId) -> Rgba {
        self.instances
            .get(id)
            .map(|i| i.pose.color())
            .unwrap_or(Rgba::TRANSPARENT)
    }

    /// Starts the named animation on a track. Returns `false` for a stale
    /// handle or an unknown animation.
    pub fn set_animation(&mut self, id: InstanceId, track: usize, name: &str, looping: bool) -> bool {
        match self.instances.get_mut(id) {
            Some(instance) => instance.pose.set_animation(track, name, looping),
            None => false,
        }
    }

    /// Queues the named animation on a track. Returns `false` for a stale
    /// handle or an unknown animation.
    pub fn add_animation(
        &mut self,
        id: InstanceId,
        track: usize,
        name: &str,
        looping: bool,
        delay: f32,
    ) -> bool {
        match self.instances.get_mut(id) {
            Some(instance) => instance.pose.add_animation(track, name, looping, delay),
            None => false,
        }
    }

    /// Clears all animation tracks of an instance.
    pub fn clear_tracks(&mut self, id: InstanceId) {
        if let Some(instance) = self.instances.get_mut(id) {
            instance.pose.clear_tracks();
        }
    }

    // --- Teardown ---

    fn destroy_all(&mut self) {
        let ids: Vec<_> = self.instances.live_handles().collect();
        for id in ids {
            self.destroy_instance(id);
        }
        let ids: Vec<_> = self.skeletons.live_handles().collect();
        for id in ids {
            self.destroy_skeleton(id);
        }
        let ids: Vec<_> = self.atlases.live_handles().collect();
        for id in ids {
            self.destroy_atlas(id);
        }
        // The default context goes down with everything else at shutdown.
        let ids: Vec<_> = self.contexts.live_handles().collect();
        for id in ids {
            if let Some(ctx) = self.contexts.free(id) {
                ctx.destroy(self.device.as_ref());
            }
        }
    }
}

impl Drop for SkeletonRenderer {
    fn drop(&mut self) {
        self.destroy_all();
    }
}
