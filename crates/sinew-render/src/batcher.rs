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

//! The draw batcher: turns one instance's slot polygons into arena-resident
//! geometry and a minimal run of draw commands.
//!
//! Slots are visited strictly in draw order; a new polygon only ever merges
//! into the most recently appended command, never out of order, because
//! draw order is what makes 2D alpha blending correct. Arena exhaustion
//! drops the affected slot's geometry silently — for a per-frame renderer a
//! partially drawn frame beats a failed one.

use crate::arena::Vertex;
use crate::atlas::{Atlas, AtlasPage};
use crate::command::DrawCommand;
use crate::context::Context;
use crate::runtime::{AttachmentKind, BlendMode, InstancePose, SlotGeometry};

/// Batches every visible slot of `pose` into `ctx` under `layer`.
pub(crate) fn draw_instance(
    ctx: &mut Context,
    pose: &mut dyn InstancePose,
    atlas: &Atlas,
    frame: u32,
    layer: i32,
) {
    let skeleton_color = pose.color();
    for draw_index in 0..pose.slot_count() {
        let info = pose.slot_info(draw_index);
        match info.attachment {
            AttachmentKind::Clipping => {
                pose.clip_start(draw_index);
                continue;
            }
            AttachmentKind::None => {
                pose.clip_end(draw_index);
                continue;
            }
            AttachmentKind::Region | AttachmentKind::Mesh => {}
        }
        if !info.bone_active || info.color.a == 0.0 || info.attachment_color.a == 0.0 {
            pose.clip_end(draw_index);
            continue;
        }

        let color = skeleton_color
            .modulate(info.color)
            .modulate(info.attachment_color)
            .to_rgba8();

        {
            let geom = pose.slot_geometry(draw_index);
            // Clipping may have consumed the whole polygon.
            if !geom.is_empty() {
                match atlas.pages.get(geom.page) {
                    Some(page) => {
                        emit_polygon(ctx, frame, layer, page, info.blend_mode, color, &geom);
                    }
                    None => {
                        log::warn!(
                            "draw_instance: slot references unknown atlas page {}",
                            geom.page
                        );
                    }
                }
            }
        }
        pose.clip_end(draw_index);
    }
    // A clip region with no matching end is tolerated: always close out.
    pose.end_draw_order();
}

/// Writes one polygon into the frame arena and appends or merges its draw
/// command.
fn emit_polygon(
    ctx: &mut Context,
    frame: u32,
    layer: i32,
    page: &AtlasPage,
    blend_mode: BlendMode,
    color: u32,
    geom: &SlotGeometry<'_>,
) {
    let num_vertices = geom.positions.len();
    let num_indices = geom.indices.len();

    let Some((base_vertex, dst_vertices)) = ctx.vertices.alloc(frame, num_vertices) else {
        log::debug!("draw_instance: vertex arena exhausted, dropping slot geometry");
        return;
    };
    let Some((base_index, dst_indices)) = ctx.indices.alloc(frame, num_indices) else {
        log::debug!("draw_instance: index arena exhausted, dropping slot geometry");
        return;
    };

    for ((dst, &pos), &uv) in dst_vertices.iter_mut().zip(geom.positions).zip(geom.uvs) {
        *dst = Vertex { pos, uv, color };
    }
    for (dst, &src) in dst_indices.iter_mut().zip(geom.indices) {
        *dst = u32::from(src) + base_vertex;
    }

    let (pipeline, pma) = match blend_mode {
        BlendMode::Normal | BlendMode::Additive | BlendMode::Screen => (
            ctx.pip_normal_additive,
            // Inverted on purpose: a page that is already premultiplied
            // needs no fragment-stage correction, an unpremultiplied page
            // does.
            if page.premultiplied_alpha { 0.0 } else { 1.0 },
        ),
        // The multiply pipeline always samples the texture as-is.
        BlendMode::Multiply => (ctx.pip_multiply, 0.0),
    };

    match ctx.commands.last_mut(frame) {
        Some(prev) if prev.can_merge(layer, pipeline, page.image, pma) => {
            prev.num_elements += num_indices as u32;
        }
        _ => {
            let appended = ctx.commands.push(
                frame,
                DrawCommand {
                    layer,
                    pipeline,
                    image: page.image,
                    pma,
                    base_element: base_index,
                    num_elements: num_indices as u32,
                },
            );
            if !appended {
                log::debug!("draw_instance: command arena exhausted, dropping slot geometry");
            }
        }
    }
}
