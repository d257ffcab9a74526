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

//! The render context: an isolated batching scope with its own frame
//! arena, GPU stream buffers, and pipelines.
//!
//! Applications that render to several targets create one context per
//! target; batching into one context never disturbs another. A context's
//! stream buffers are uploaded at most once per frame no matter how many
//! layers are drawn from it.

use crate::arena::{FramePool, Vertex};
use crate::command::DrawCommand;
use sinew_core::gpu::{
    Bindings, BlendFactor, BlendState, BufferDescriptor, BufferId, BufferKind, BufferUsage,
    ColorMask, GpuDevice, GpuError, PipelineDescriptor, PipelineId, PixelFormat, ShaderStage,
};
use sinew_core::math::{Mat4, Vec2};
use sinew_core::Handle;

/// Handle to a pool-resident [`Context`].
pub type ContextId = Handle<Context>;

/// Default vertex capacity of a context's frame arena.
pub const DEFAULT_MAX_VERTICES: usize = 1 << 16;
/// Default draw-command capacity of a context's frame arena.
pub const DEFAULT_MAX_COMMANDS: usize = 1 << 14;

/// Descriptor for [`SkeletonRenderer::make_context`].
///
/// Zero-valued fields are patched with defaults, so `Default::default()`
/// yields a usable configuration.
///
/// [`SkeletonRenderer::make_context`]: crate::renderer::SkeletonRenderer::make_context
#[derive(Debug, Clone, Copy)]
pub struct ContextDesc {
    /// Per-frame vertex capacity (0 selects [`DEFAULT_MAX_VERTICES`]).
    /// The index capacity is three times this value.
    pub max_vertices: usize,
    /// Per-frame draw-command capacity (0 selects
    /// [`DEFAULT_MAX_COMMANDS`]).
    pub max_commands: usize,
    /// Color attachment format of the target this context draws into.
    pub color_format: PixelFormat,
    /// Depth attachment format of the target ([`PixelFormat::None`] when
    /// absent).
    pub depth_format: PixelFormat,
    /// Samples per pixel of the target (0 selects 1).
    pub sample_count: u32,
    /// Color channels written by this context's pipelines.
    pub color_write_mask: ColorMask,
}

impl Default for ContextDesc {
    fn default() -> Self {
        Self {
            max_vertices: 0,
            max_commands: 0,
            color_format: PixelFormat::Rgba8,
            depth_format: PixelFormat::DepthStencil,
            sample_count: 0,
            color_write_mask: ColorMask::ALL,
        }
    }
}

impl ContextDesc {
    /// Returns a copy with zero-valued fields replaced by their defaults.
    pub(crate) fn resolved(&self) -> Self {
        let mut desc = *self;
        if desc.max_vertices == 0 {
            desc.max_vertices = DEFAULT_MAX_VERTICES;
        }
        if desc.max_commands == 0 {
            desc.max_commands = DEFAULT_MAX_COMMANDS;
        }
        if desc.sample_count == 0 {
            desc.sample_count = 1;
        }
        desc
    }
}

/// The origin/size pair a layer is projected with.
///
/// The orthographic projection spans `-origin .. size - origin` on both
/// axes with the y-axis pointing down, near/far fixed at -1/+1.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayerTransform {
    /// Size of the layer in world units.
    pub size: Vec2,
    /// Origin offset inside the layer.
    pub origin: Vec2,
}

impl LayerTransform {
    pub(crate) fn projection(&self) -> Mat4 {
        let left = -self.origin.x;
        let right = self.size.x - self.origin.x;
        let top = -self.origin.y;
        let bottom = self.size.y - self.origin.y;
        Mat4::orthographic_rh_no(left, right, bottom, top, -1.0, 1.0)
    }
}

/// Vertex-stage uniform block: the layer projection.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct VsParams {
    mvp: [f32; 16],
}

/// Fragment-stage uniform block: the premultiplied-alpha correction factor,
/// padded to 16 bytes for std140 layout.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct FsParams {
    pma: f32,
    _pad: [f32; 3],
}

/// The context payload stored in the context pool.
#[derive(Debug)]
pub struct Context {
    pub(crate) vertices: FramePool<Vertex>,
    pub(crate) indices: FramePool<u32>,
    pub(crate) commands: FramePool<DrawCommand>,
    pub(crate) vbuf: BufferId,
    pub(crate) ibuf: BufferId,
    pub(crate) pip_normal_additive: PipelineId,
    pub(crate) pip_multiply: PipelineId,
    /// Frame the stream buffers were last uploaded in.
    update_frame: u32,
}

impl Context {
    /// Creates the context's GPU resources and frame pools.
    ///
    /// On failure every resource created so far is released, so a `Failed`
    /// context holds nothing.
    pub(crate) fn new(device: &dyn GpuDevice, desc: &ContextDesc) -> Result<Self, GpuError> {
        let max_vertices = desc.max_vertices;
        let max_indices = max_vertices * 3;

        let vbuf = device.create_buffer(&BufferDescriptor {
            label: Some("sinew-vbuf".into()),
            size: (max_vertices * std::mem::size_of::<Vertex>()) as u64,
            kind: BufferKind::Vertex,
            usage: BufferUsage::Stream,
        })?;
        let ibuf = match device.create_buffer(&BufferDescriptor {
            label: Some("sinew-ibuf".into()),
            size: (max_indices * std::mem::size_of::<u32>()) as u64,
            kind: BufferKind::Index,
            usage: BufferUsage::Stream,
        }) {
            Ok(buf) => buf,
            Err(err) => {
                release(device, &[vbuf], &[]);
                return Err(err);
            }
        };

        // Both pipelines are configured for premultiplied alpha; when the
        // source texture is not premultiplied, the fragment stage performs
        // the multiplication, steered by the per-command pma factor.
        let mut pip_desc = PipelineDescriptor {
            label: Some("sinew-pip-normal-additive".into()),
            blend: BlendState {
                src_factor_rgb: BlendFactor::One,
                dst_factor_rgb: BlendFactor::OneMinusSrcAlpha,
                src_factor_alpha: BlendFactor::One,
                dst_factor_alpha: BlendFactor::OneMinusSrcAlpha,
            },
            color_format: desc.color_format,
            depth_format: desc.depth_format,
            sample_count: desc.sample_count,
            color_write_mask: desc.color_write_mask,
        };
        let pip_normal_additive = match device.create_pipeline(&pip_desc) {
            Ok(pip) => pip,
            Err(err) => {
                release(device, &[vbuf, ibuf], &[]);
                return Err(err);
            }
        };

        pip_desc.label = Some("sinew-pip-multiply".into());
        pip_desc.blend = BlendState {
            src_factor_rgb: BlendFactor::Zero,
            dst_factor_rgb: BlendFactor::SrcColor,
            src_factor_alpha: BlendFactor::Zero,
            dst_factor_alpha: BlendFactor::One,
        };
        let pip_multiply = match device.create_pipeline(&pip_desc) {
            Ok(pip) => pip,
            Err(err) => {
                release(device, &[vbuf, ibuf], &[pip_normal_additive]);
                return Err(err);
            }
        };

        Ok(Self {
            vertices: FramePool::new(max_vertices),
            indices: FramePool::new(max_indices),
            commands: FramePool::new(desc.max_commands),
            vbuf,
            ibuf,
            pip_normal_additive,
            pip_multiply,
            update_frame: 0,
        })
    }

    /// Releases the context's GPU resources.
    pub(crate) fn destroy(&self, device: &dyn GpuDevice) {
        release(
            device,
            &[self.ibuf, self.vbuf],
            &[self.pip_normal_additive, self.pip_multiply],
        );
    }

    /// Replays the commands of `layer` in append order.
    ///
    /// GPU state is applied lazily: the pipeline only when it differs from
    /// the previously applied one (which also re-uploads the projection and
    /// invalidates the image binding), the image binding and the pma
    /// uniform only when they change. Commands whose image is not ready yet
    /// are skipped. The vertex/index streams are uploaded at most once per
    /// frame, on the first layer drawn from this context.
    pub(crate) fn draw_layer(
        &mut self,
        device: &dyn GpuDevice,
        frame: u32,
        layer: i32,
        tform: &LayerTransform,
    ) {
        if self.vertices.used() == 0 || self.commands.used() == 0 {
            return;
        }

        if self.update_frame != frame {
            self.update_frame = frame;
            if let Err(err) =
                device.write_buffer(self.vbuf, 0, bytemuck::cast_slice(self.vertices.as_slice()))
            {
                log::warn!("Context: vertex stream upload failed: {err}");
            }
            if let Err(err) =
                device.write_buffer(self.ibuf, 0, bytemuck::cast_slice(self.indices.as_slice()))
            {
                log::warn!("Context: index stream upload failed: {err}");
            }
        }

        let vs_params = VsParams {
            mvp: tform.projection().to_cols_array(),
        };

        let mut cur_pipeline = None;
        let mut cur_image = None;
        let mut cur_pma = None;
        for cmd in self.commands.as_slice() {
            if cmd.layer != layer || !device.image_ready(cmd.image) {
                continue;
            }
            if cur_pipeline != Some(cmd.pipeline) {
                device.apply_pipeline(cmd.pipeline);
                cur_pipeline = Some(cmd.pipeline);
                device.apply_uniforms(ShaderStage::Vertex, bytemuck::bytes_of(&vs_params));
                // A pipeline switch invalidates the bindings.
                cur_image = None;
            }
            if cur_image != Some(cmd.image) {
                device.apply_bindings(&Bindings {
                    vertex_buffer: self.vbuf,
                    index_buffer: self.ibuf,
                    image: cmd.image,
                });
                cur_image = Some(cmd.image);
            }
            if cur_pma != Some(cmd.pma.to_bits()) {
                let fs_params = FsParams {
                    pma: cmd.pma,
                    _pad: [0.0; 3],
                };
                device.apply_uniforms(ShaderStage::Fragment, bytemuck::bytes_of(&fs_params));
                cur_pma = Some(cmd.pma.to_bits());
            }
            if cmd.num_elements > 0 {
                device.draw_indexed(cmd.base_element, cmd.num_elements, 1);
            }
        }
    }
}

fn release(device: &dyn GpuDevice, buffers: &[BufferId], pipelines: &[PipelineId]) {
    for &pip in pipelines {
        if let Err(err) = device.destroy_pipeline(pip) {
            log::warn!("Context: failed to destroy pipeline: {err}");
        }
    }
    for &buf in buffers {
        if let Err(err) = device.destroy_buffer(buf) {
            log::warn!("Context: failed to destroy buffer: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{GpuCall, MockGpuDevice};
    use sinew_core::gpu::ImageId;

    fn test_context(device: &MockGpuDevice) -> Context {
        Context::new(
            device,
            &ContextDesc {
                max_vertices: 64,
                max_commands: 8,
                ..Default::default()
            }
            .resolved(),
        )
        .expect("context creation")
    }

    /// Fills `count` vertices/indices and appends a command for them.
    fn append(ctx: &mut Context, frame: u32, cmd: DrawCommand, count: usize) {
        let (_, verts) = ctx.vertices.alloc(frame, count).expect("vertex alloc");
        for v in verts.iter_mut() {
            *v = Vertex::default();
        }
        ctx.indices.alloc(frame, count).expect("index alloc");
        assert!(ctx.commands.push(frame, cmd));
    }

    #[test]
    fn test_creation_reserves_buffers_and_pipelines() {
        let device = MockGpuDevice::new();
        let ctx = test_context(&device);
        assert_ne!(ctx.vbuf, ctx.ibuf);
        assert_ne!(ctx.pip_normal_additive, ctx.pip_multiply);
        assert_eq!(ctx.vertices.capacity(), 64);
        assert_eq!(ctx.indices.capacity(), 192);
        assert_eq!(ctx.commands.capacity(), 8);
    }

    #[test]
    fn test_empty_context_draws_nothing() {
        let device = MockGpuDevice::new();
        let mut ctx = test_context(&device);
        device.clear_calls();
        ctx.draw_layer(&device, 1, 0, &LayerTransform::default());
        assert!(device.calls().is_empty());
    }

    #[test]
    fn test_stream_upload_is_memoized_per_frame() {
        let device = MockGpuDevice::new();
        let mut ctx = test_context(&device);
        let cmd = DrawCommand {
            pipeline: ctx.pip_normal_additive,
            image: ImageId(99),
            num_elements: 6,
            ..Default::default()
        };
        append(&mut ctx, 1, cmd, 6);
        device.clear_calls();

        ctx.draw_layer(&device, 1, 0, &LayerTransform::default());
        ctx.draw_layer(&device, 1, 0, &LayerTransform::default());
        let uploads = device
            .calls()
            .iter()
            .filter(|c| matches!(c, GpuCall::WriteBuffer { .. }))
            .count();
        // One vertex and one index upload, for two layer draws.
        assert_eq!(uploads, 2);
    }

    #[test]
    fn test_lazy_state_application_order() {
        let device = MockGpuDevice::new();
        let mut ctx = test_context(&device);
        let pip = ctx.pip_normal_additive;
        let base = DrawCommand {
            pipeline: pip,
            image: ImageId(7),
            pma: 1.0,
            num_elements: 6,
            ..Default::default()
        };
        // Two commands sharing pipeline and image, differing only in pma.
        append(&mut ctx, 1, base, 6);
        append(
            &mut ctx,
            1,
            DrawCommand {
                pma: 0.0,
                base_element: 6,
                ..base
            },
            6,
        );
        device.clear_calls();
        ctx.draw_layer(&device, 1, 0, &LayerTransform::default());

        let calls: Vec<_> = device
            .calls()
            .iter()
            .filter(|c| !matches!(c, GpuCall::WriteBuffer { .. }))
            .cloned()
            .collect();
        assert_eq!(
            calls,
            vec![
                GpuCall::ApplyPipeline(pip),
                GpuCall::ApplyUniforms {
                    stage: ShaderStage::Vertex,
                    bytes: 64,
                },
                GpuCall::ApplyBindings { image: ImageId(7) },
                GpuCall::ApplyUniforms {
                    stage: ShaderStage::Fragment,
                    bytes: 16,
                },
                GpuCall::DrawIndexed {
                    base_element: 0,
                    num_elements: 6,
                },
                // Second command: only the pma uniform changes.
                GpuCall::ApplyUniforms {
                    stage: ShaderStage::Fragment,
                    bytes: 16,
                },
                GpuCall::DrawIndexed {
                    base_element: 6,
                    num_elements: 6,
                },
            ]
        );
    }

    #[test]
    fn test_layer_filter_preserves_append_order() {
        let device = MockGpuDevice::new();
        let mut ctx = test_context(&device);
        let base = DrawCommand {
            pipeline: ctx.pip_normal_additive,
            image: ImageId(7),
            num_elements: 3,
            ..Default::default()
        };
        append(&mut ctx, 1, DrawCommand { layer: 0, ..base }, 3);
        append(
            &mut ctx,
            1,
            DrawCommand {
                layer: 1,
                base_element: 3,
                ..base
            },
            3,
        );
        append(
            &mut ctx,
            1,
            DrawCommand {
                layer: 0,
                base_element: 6,
                ..base
            },
            3,
        );
        device.clear_calls();
        ctx.draw_layer(&device, 1, 0, &LayerTransform::default());

        let draws: Vec<_> = device
            .calls()
            .iter()
            .filter_map(|c| match c {
                GpuCall::DrawIndexed { base_element, .. } => Some(*base_element),
                _ => None,
            })
            .collect();
        assert_eq!(draws, vec![0, 6]);
    }

    #[test]
    fn test_commands_with_unready_images_are_skipped() {
        let device = MockGpuDevice::new();
        let mut ctx = test_context(&device);
        let cmd = DrawCommand {
            pipeline: ctx.pip_normal_additive,
            image: ImageId(55),
            num_elements: 6,
            ..Default::default()
        };
        append(&mut ctx, 1, cmd, 6);
        device.set_image_ready(ImageId(55), false);
        device.clear_calls();
        ctx.draw_layer(&device, 1, 0, &LayerTransform::default());
        assert!(!device
            .calls()
            .iter()
            .any(|c| matches!(c, GpuCall::DrawIndexed { .. })));
    }

    #[test]
    fn test_projection_matches_layer_transform() {
        let tform = LayerTransform {
            size: Vec2::new(800.0, 600.0),
            origin: Vec2::new(400.0, 300.0),
        };
        let m = tform.projection().to_cols_array();
        // Centered origin: pure scale, no translation.
        assert!((m[0] - 2.0 / 800.0).abs() < 1e-6);
        assert!((m[5] + 2.0 / 600.0).abs() < 1e-6);
        assert!(m[12].abs() < 1e-6);
        assert!(m[13].abs() < 1e-6);
    }
}
