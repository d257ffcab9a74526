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

//! Mock collaborators for the end-to-end scenarios.

use sinew_render::error::RuntimeError;
use sinew_render::runtime::{
    AnimationRuntime, AtlasData, AttachmentKind, InstancePose, PageDesc, SkeletonData,
    SlotGeometry, SlotInfo,
};
use sinew_render::{AtlasDesc, SkeletonDesc};
use sinew_core::gpu::{
    Bindings, BufferDescriptor, BufferId, GpuDevice, GpuError, ImageId, PipelineDescriptor,
    PipelineId, ShaderStage,
};
use sinew_core::math::{Rgba, Vec2};
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One recorded GPU submission call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpuCall {
    WriteBuffer { id: BufferId, bytes: usize },
    ApplyPipeline(PipelineId),
    ApplyBindings { image: ImageId },
    ApplyUniforms { stage: ShaderStage, bytes: usize },
    DrawIndexed { base_element: u32, num_elements: u32 },
}

/// A recording mock GPU device.
#[derive(Debug, Default)]
pub struct RecordingDevice {
    next_id: AtomicUsize,
    calls: Mutex<Vec<GpuCall>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(1),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn next(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn record(&self, call: GpuCall) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<GpuCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn draws(&self) -> Vec<(u32, u32)> {
        self.calls()
            .iter()
            .filter_map(|c| match c {
                GpuCall::DrawIndexed {
                    base_element,
                    num_elements,
                } => Some((*base_element, *num_elements)),
                _ => None,
            })
            .collect()
    }
}

impl GpuDevice for RecordingDevice {
    fn create_buffer(&self, _descriptor: &BufferDescriptor<'_>) -> Result<BufferId, GpuError> {
        Ok(BufferId(self.next()))
    }

    fn destroy_buffer(&self, _id: BufferId) -> Result<(), GpuError> {
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
        Ok(ImageId(self.next()))
    }

    fn destroy_image(&self, _id: ImageId) -> Result<(), GpuError> {
        Ok(())
    }

    fn image_ready(&self, _id: ImageId) -> bool {
        true
    }

    fn create_pipeline(&self, _descriptor: &PipelineDescriptor<'_>) -> Result<PipelineId, GpuError> {
        Ok(PipelineId(self.next()))
    }

    fn destroy_pipeline(&self, _id: PipelineId) -> Result<(), GpuError> {
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

/// Script for one slot served by every instantiated pose.
#[derive(Debug, Clone)]
pub struct ScriptedSlot {
    pub info: SlotInfo,
    pub positions: Vec<Vec2>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u16>,
    pub page: usize,
}

impl ScriptedSlot {
    /// A visible quad with `vertex_count` fan vertices on page 0.
    pub fn fan(vertex_count: usize) -> Self {
        let positions: Vec<Vec2> = (0..vertex_count).map(|i| Vec2::new(i as f32, 0.0)).collect();
        let uvs = positions.clone();
        let indices: Vec<u16> = (0..vertex_count.saturating_sub(2) as u16)
            .flat_map(|i| [0, i + 1, i + 2])
            .collect();
        Self {
            info: SlotInfo {
                attachment: AttachmentKind::Mesh,
                ..Default::default()
            },
            positions,
            uvs,
            indices,
            page: 0,
        }
    }

    pub fn quad() -> Self {
        Self::fan(4)
    }

    pub fn on_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }
}

#[derive(Debug)]
struct ScriptedAtlasData {
    pages: Vec<PageDesc>,
}

impl AtlasData for ScriptedAtlasData {
    fn pages(&self) -> &[PageDesc] {
        &self.pages
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
struct ScriptedSkeletonData;

impl SkeletonData for ScriptedSkeletonData {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
struct ScriptedPose {
    slots: Vec<ScriptedSlot>,
    color: Rgba,
    position: Vec2,
    scale: Vec2,
}

impl InstancePose for ScriptedPose {
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

    fn set_animation(&mut self, _track: usize, _name: &str, _looping: bool) -> bool {
        true
    }

    fn add_animation(&mut self, _track: usize, _name: &str, _looping: bool, _delay: f32) -> bool {
        true
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

    fn clip_start(&mut self, _draw_index: usize) {}

    fn clip_end(&mut self, _draw_index: usize) {}

    fn end_draw_order(&mut self) {}
}

/// A scripted animation runtime serving two atlas pages (page 1 is
/// premultiplied) and the configured slots per instance.
#[derive(Debug)]
pub struct ScriptedRuntime {
    slots: Vec<ScriptedSlot>,
}

impl ScriptedRuntime {
    pub fn new(slots: Vec<ScriptedSlot>) -> Self {
        Self { slots }
    }
}

impl AnimationRuntime for ScriptedRuntime {
    fn parse_atlas(&self, desc: &AtlasDesc<'_>) -> Result<Arc<dyn AtlasData>, RuntimeError> {
        if desc.data == b"bad" {
            return Err(RuntimeError::MalformedData {
                what: "atlas",
                details: "unparseable".into(),
            });
        }
        let page = |name: &str, premultiplied_alpha| PageDesc {
            name: name.into(),
            width: 256,
            height: 256,
            premultiplied_alpha,
            min_filter: Default::default(),
            mag_filter: Default::default(),
            wrap_u: Default::default(),
            wrap_v: Default::default(),
        };
        Ok(Arc::new(ScriptedAtlasData {
            pages: vec![page("page0.png", false), page("page1.png", true)],
        }))
    }

    fn load_skeleton(
        &self,
        _atlas: &dyn AtlasData,
        _desc: &SkeletonDesc<'_>,
    ) -> Result<Arc<dyn SkeletonData>, RuntimeError> {
        Ok(Arc::new(ScriptedSkeletonData))
    }

    fn instantiate(
        &self,
        _data: &Arc<dyn SkeletonData>,
    ) -> Result<Box<dyn InstancePose>, RuntimeError> {
        Ok(Box::new(ScriptedPose {
            slots: self.slots.clone(),
            color: Rgba::WHITE,
            position: Vec2::ZERO,
            scale: Vec2::ONE,
        }))
    }
}
