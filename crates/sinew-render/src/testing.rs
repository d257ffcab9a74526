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

//! Mock GPU device and animation runtime shared by the unit tests.

use crate::atlas::AtlasDesc;
use crate::error::RuntimeError;
use crate::runtime::{
    AnimationRuntime, AtlasData, InstancePose, PageDesc, SkeletonData, SlotGeometry, SlotInfo,
};
use crate::skeleton::SkeletonDesc;
use sinew_core::gpu::{
    Bindings, BufferDescriptor, BufferId, GpuDevice, GpuError, ImageId, PipelineDescriptor,
    PipelineId, ShaderStage,
};
use sinew_core::math::{Rgba, Vec2};
use std::any::Any;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One recorded GPU call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GpuCall {
    CreateBuffer(BufferId),
    DestroyBuffer(BufferId),
    WriteBuffer { id: BufferId, bytes: usize },
    AllocImage(ImageId),
    DestroyImage(ImageId),
    CreatePipeline(PipelineId),
    DestroyPipeline(PipelineId),
    ApplyPipeline(PipelineId),
    ApplyBindings { image: ImageId },
    ApplyUniforms { stage: ShaderStage, bytes: usize },
    DrawIndexed { base_element: u32, num_elements: u32 },
}

/// A mock graphics device that produces unique resource ids and records
/// every call for later inspection.
#[derive(Debug)]
pub(crate) struct MockGpuDevice {
    next_id: AtomicUsize,
    calls: Mutex<Vec<GpuCall>>,
    unready_images: Mutex<HashSet<ImageId>>,
    fail_creations: AtomicBool,
}

impl MockGpuDevice {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(1),
            calls: Mutex::new(Vec::new()),
            unready_images: Mutex::new(HashSet::new()),
            fail_creations: AtomicBool::new(false),
        }
    }

    fn next(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn record(&self, call: GpuCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn creation_error(&self) -> Option<GpuError> {
        self.fail_creations.load(Ordering::Relaxed).then(|| {
            GpuError::CreationFailed {
                label: None,
                details: "mock device set to fail".into(),
            }
        })
    }

    pub(crate) fn calls(&self) -> Vec<GpuCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub(crate) fn set_image_ready(&self, id: ImageId, ready: bool) {
        let mut unready = self.unready_images.lock().unwrap();
        if ready {
            unready.remove(&id);
        } else {
            unready.insert(id);
        }
    }

    pub(crate) fn set_fail_creations(&self, fail: bool) {
        self.fail_creations.store(fail, Ordering::Relaxed);
    }
}

impl GpuDevice for MockGpuDevice {
    fn create_buffer(&self, _descriptor: &BufferDescriptor<'_>) -> Result<BufferId, GpuError> {
        if let Some(err) = self.creation_error() {
            return Err(err);
        }
        let id = BufferId(self.next());
        self.record(GpuCall::CreateBuffer(id));
        Ok(id)
    }

    fn destroy_buffer(&self, id: BufferId) -> Result<(), GpuError> {
        self.record(GpuCall::DestroyBuffer(id));
        Ok(())
    }

    fn write_buffer(&self, id: BufferId, _offset: u64, data: &[u8]) -> Result<(), GpuError> {
        self.record(GpuCall::WriteBuffer {
            id,
            bytes: data.len(),
        });
        Ok(())
    }

    fn alloc_image(&self) -> Result<ImageId, GpuError> {
        if let Some(err) = self.creation_error() {
            return Err(err);
        }
        let id = ImageId(self.next());
        self.record(GpuCall::AllocImage(id));
        Ok(id)
    }

    fn destroy_image(&self, id: ImageId) -> Result<(), GpuError> {
        self.record(GpuCall::DestroyImage(id));
        Ok(())
    }

    fn image_ready(&self, id: ImageId) -> bool {
        !self.unready_images.lock().unwrap().contains(&id)
    }

    fn create_pipeline(&self, _descriptor: &PipelineDescriptor<'_>) -> Result<PipelineId, GpuError> {
        if let Some(err) = self.creation_error() {
            return Err(err);
        }
        let id = PipelineId(self.next());
        self.record(GpuCall::CreatePipeline(id));
        Ok(id)
    }

    fn destroy_pipeline(&self, id: PipelineId) -> Result<(), GpuError> {
        self.record(GpuCall::DestroyPipeline(id));
        Ok(())
    }

    fn apply_pipeline(&self, id: PipelineId) {
        self.record(GpuCall::ApplyPipeline(id));
    }

    fn apply_bindings(&self, bindings: &Bindings) {
        self.record(GpuCall::ApplyBindings {
            image: bindings.image,
        });
    }

    fn apply_uniforms(&self, stage: ShaderStage, data: &[u8]) {
        self.record(GpuCall::ApplyUniforms {
            stage,
            bytes: data.len(),
        });
    }

    fn draw_indexed(&self, base_element: u32, num_elements: u32, _num_instances: u32) {
        self.record(GpuCall::DrawIndexed {
            base_element,
            num_elements,
        });
    }
}

/// Script for one slot of a [`MockPose`].
#[derive(Debug, Clone)]
pub(crate) struct MockSlot {
    pub(crate) info: SlotInfo,
    pub(crate) positions: Vec<Vec2>,
    pub(crate) uvs: Vec<Vec2>,
    pub(crate) indices: Vec<u16>,
    pub(crate) page: usize,
}

impl MockSlot {
    /// A visible quad on page 0 with default slot state.
    pub(crate) fn quad() -> Self {
        Self {
            info: SlotInfo {
                attachment: crate::runtime::AttachmentKind::Region,
                ..Default::default()
            },
            positions: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            uvs: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            indices: vec![0, 1, 2, 2, 3, 0],
            page: 0,
        }
    }
}

/// Clip-protocol events recorded by a [`MockPose`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClipEvent {
    Start(usize),
    End(usize),
    EndAll,
}

/// A scripted pose that serves pre-baked slot geometry and records the
/// clip protocol the batcher routes through it.
#[derive(Debug)]
pub(crate) struct MockPose {
    pub(crate) slots: Vec<MockSlot>,
    pub(crate) color: Rgba,
    pub(crate) position: Vec2,
    pub(crate) scale: Vec2,
    pub(crate) clip_events: Vec<ClipEvent>,
}

impl MockPose {
    pub(crate) fn new(slots: Vec<MockSlot>) -> Self {
        Self {
            slots,
            color: Rgba::WHITE,
            position: Vec2::ZERO,
            scale: Vec2::ONE,
            clip_events: Vec::new(),
        }
    }
}

impl InstancePose for MockPose {
    fn set_to_setup_pose(&mut self) {}

    fn advance(&mut self, _delta_seconds: f32) {}

    fn color(&self) -> Rgba {
        self.color
    }

    fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn scale(&self) -> Vec2 {
        self.scale
    }

    fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    fn set_animation(&mut self, _track: usize, name: &str, _looping: bool) -> bool {
        name != "missing"
    }

    fn add_animation(&mut self, _track: usize, name: &str, _looping: bool, _delay: f32) -> bool {
        name != "missing"
    }

    fn clear_tracks(&mut self) {}

    fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn slot_info(&self, draw_index: usize) -> SlotInfo {
        self.slots[draw_index].info
    }

    fn slot_geometry(&mut self, draw_index: usize) -> SlotGeometry<'_> {
        let slot = &self.slots[draw_index];
        SlotGeometry {
            positions: &slot.positions,
            uvs: &slot.uvs,
            indices: &slot.indices,
            page: slot.page,
        }
    }

    fn clip_start(&mut self, draw_index: usize) {
        self.clip_events.push(ClipEvent::Start(draw_index));
    }

    fn clip_end(&mut self, draw_index: usize) {
        self.clip_events.push(ClipEvent::End(draw_index));
    }

    fn end_draw_order(&mut self) {
        self.clip_events.push(ClipEvent::EndAll);
    }
}

#[derive(Debug)]
pub(crate) struct MockAtlasData {
    pages: Vec<PageDesc>,
}

impl AtlasData for MockAtlasData {
    fn pages(&self) -> &[PageDesc] {
        &self.pages
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
pub(crate) struct MockSkeletonData;

impl SkeletonData for MockSkeletonData {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A scripted animation runtime.
///
/// Parsing "fails" when the descriptor data equals `b"bad"`, and every
/// instantiated pose serves the slots configured on the runtime.
#[derive(Debug)]
pub(crate) struct MockRuntime {
    pub(crate) pages: Vec<PageDesc>,
    pub(crate) slots: Vec<MockSlot>,
}

impl MockRuntime {
    pub(crate) fn new(slots: Vec<MockSlot>) -> Self {
        Self {
            pages: vec![
                PageDesc {
                    name: "page0.png".into(),
                    width: 256,
                    height: 256,
                    premultiplied_alpha: false,
                    min_filter: Default::default(),
                    mag_filter: Default::default(),
                    wrap_u: Default::default(),
                    wrap_v: Default::default(),
                },
                PageDesc {
                    name: "page1.png".into(),
                    width: 128,
                    height: 128,
                    premultiplied_alpha: true,
                    min_filter: Default::default(),
                    mag_filter: Default::default(),
                    wrap_u: Default::default(),
                    wrap_v: Default::default(),
                },
            ],
            slots,
        }
    }
}

impl AnimationRuntime for MockRuntime {
    fn parse_atlas(&self, desc: &AtlasDesc<'_>) -> Result<Arc<dyn AtlasData>, RuntimeError> {
        if desc.data == b"bad" {
            return Err(RuntimeError::MalformedData {
                what: "atlas",
                details: "unparseable".into(),
            });
        }
        Ok(Arc::new(MockAtlasData {
            pages: self.pages.clone(),
        }))
    }

    fn load_skeleton(
        &self,
        _atlas: &dyn AtlasData,
        desc: &SkeletonDesc<'_>,
    ) -> Result<Arc<dyn SkeletonData>, RuntimeError> {
        if desc.json_data == Some("bad") {
            return Err(RuntimeError::MalformedData {
                what: "skeleton",
                details: "unparseable".into(),
            });
        }
        Ok(Arc::new(MockSkeletonData))
    }

    fn instantiate(
        &self,
        _data: &Arc<dyn SkeletonData>,
    ) -> Result<Box<dyn InstancePose>, RuntimeError> {
        Ok(Box::new(MockPose::new(self.slots.clone())))
    }
}
