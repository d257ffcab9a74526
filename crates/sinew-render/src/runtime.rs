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

//! The animation-runtime collaborator contract.
//!
//! All animation math — bone transforms, mixing, attachment geometry, and
//! polygon clipping — lives behind these traits. The batcher consumes a
//! drawable, ordered sequence of per-slot polygons and routes the clip
//! start/end protocol; it never computes a pose itself.

use crate::atlas::AtlasDesc;
use crate::error::RuntimeError;
use crate::skeleton::SkeletonDesc;
use sinew_core::gpu::{Filter, Wrap};
use sinew_core::math::{Rgba, Vec2};
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// Blend mode requested by a slot, as authored in the animation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendMode {
    /// Standard alpha blending.
    #[default]
    Normal,
    /// Additive blending.
    Additive,
    /// Multiply blending. Selects the dedicated multiply pipeline.
    Multiply,
    /// Screen blending.
    Screen,
}

/// The kind of attachment a slot currently draws.
///
/// A closed set: the batcher matches exhaustively, so a new attachment kind
/// is a compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttachmentKind {
    /// The slot has no visible attachment.
    #[default]
    None,
    /// A textured quad.
    Region,
    /// A free-form triangle mesh.
    Mesh,
    /// A clipping polygon; starts a clip region that persists across
    /// subsequent slots until the matching clip end.
    Clipping,
}

/// Per-slot state the batcher inspects before asking for geometry.
#[derive(Debug, Clone, Copy)]
pub struct SlotInfo {
    /// What the slot draws.
    pub attachment: AttachmentKind,
    /// Whether the slot's owning bone is active this frame.
    pub bone_active: bool,
    /// The slot-level tint.
    pub color: Rgba,
    /// The attachment-level tint.
    pub attachment_color: Rgba,
    /// The slot's blend mode.
    pub blend_mode: BlendMode,
}

impl Default for SlotInfo {
    fn default() -> Self {
        Self {
            attachment: AttachmentKind::None,
            bone_active: true,
            color: Rgba::WHITE,
            attachment_color: Rgba::WHITE,
            blend_mode: BlendMode::Normal,
        }
    }
}

/// A slot's world-space polygon, with any active clip region already
/// applied.
///
/// Invariants: `positions` and `uvs` have the same length; every index is a
/// valid position index. Both slices may be empty when clipping consumed
/// the whole polygon.
#[derive(Debug, Clone, Copy)]
pub struct SlotGeometry<'a> {
    /// World-space vertex positions.
    pub positions: &'a [Vec2],
    /// Texture coordinates, one per position.
    pub uvs: &'a [Vec2],
    /// Triangle indices into `positions`.
    pub indices: &'a [u16],
    /// Index of the atlas page the polygon samples from.
    pub page: usize,
}

impl SlotGeometry<'_> {
    /// A polygon with no geometry.
    pub const EMPTY: Self = Self {
        positions: &[],
        uvs: &[],
        indices: &[],
        page: 0,
    };

    /// Whether there is nothing to draw.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }
}

/// Metadata for one page of a parsed atlas.
#[derive(Debug, Clone)]
pub struct PageDesc {
    /// The page's source image name, as authored.
    pub name: String,
    /// Width of the page image in pixels.
    pub width: u32,
    /// Height of the page image in pixels.
    pub height: u32,
    /// Whether the page image data is premultiplied-alpha.
    pub premultiplied_alpha: bool,
    /// Minification filter.
    pub min_filter: Filter,
    /// Magnification filter.
    pub mag_filter: Filter,
    /// Horizontal wrap mode.
    pub wrap_u: Wrap,
    /// Vertical wrap mode.
    pub wrap_v: Wrap,
}

/// A parsed atlas, owned by the animation runtime.
pub trait AtlasData: Send + Sync + Debug {
    /// The pages this atlas groups, in page order.
    fn pages(&self) -> &[PageDesc];

    /// Downcast support for runtime implementations.
    fn as_any(&self) -> &dyn Any;
}

/// Shared skeleton data (bone hierarchy, attachments, animations), owned by
/// the animation runtime and shared by all instances of one skeleton.
pub trait SkeletonData: Send + Sync + Debug {
    /// Downcast support for runtime implementations.
    fn as_any(&self) -> &dyn Any;
}

/// One animated, positioned copy of a skeleton.
///
/// The slot protocol: `draw_index` always walks `0..slot_count()` in the
/// skeleton's draw order (the order is semantically meaningful and must be
/// preserved). For each index the batcher reads [`InstancePose::slot_info`]
/// first and then either routes the clip protocol or asks for geometry.
pub trait InstancePose: Send + Debug {
    /// Resets the pose to the setup pose.
    fn set_to_setup_pose(&mut self);

    /// Advances animation tracks by `delta_seconds`, applies them, and
    /// updates the world transform — the full per-update step.
    fn advance(&mut self, delta_seconds: f32);

    /// The skeleton-level tint.
    fn color(&self) -> Rgba;
    /// Replaces the skeleton-level tint.
    fn set_color(&mut self, color: Rgba);
    /// The instance position in world space.
    fn position(&self) -> Vec2;
    /// Moves the instance.
    fn set_position(&mut self, position: Vec2);
    /// The instance scale.
    fn scale(&self) -> Vec2;
    /// Rescales the instance.
    fn set_scale(&mut self, scale: Vec2);

    /// Starts the named animation on a track. Returns `false` if the
    /// animation does not exist.
    fn set_animation(&mut self, track: usize, name: &str, looping: bool) -> bool;
    /// Queues the named animation on a track after the current one.
    /// Returns `false` if the animation does not exist.
    fn add_animation(&mut self, track: usize, name: &str, looping: bool, delay: f32) -> bool;
    /// Clears all animation tracks.
    fn clear_tracks(&mut self);

    /// Number of slots in draw order.
    fn slot_count(&self) -> usize;
    /// State of the slot at `draw_index` in draw order.
    fn slot_info(&self, draw_index: usize) -> SlotInfo;
    /// The slot's world-space polygon with any active clip applied.
    fn slot_geometry(&mut self, draw_index: usize) -> SlotGeometry<'_>;

    /// Activates the clip region defined by the slot at `draw_index`.
    fn clip_start(&mut self, draw_index: usize);
    /// Deactivates the clip region if the slot at `draw_index` ends it.
    fn clip_end(&mut self, draw_index: usize);
    /// Closes any clip region left open at the end of a draw-order pass.
    fn end_draw_order(&mut self);
}

/// The skeletal-animation evaluator the batcher delegates to.
///
/// Constructed by the embedding application (typically wrapping a C
/// animation runtime) and handed to the renderer at setup.
pub trait AnimationRuntime: Send + Sync + Debug {
    /// Parses atlas data into runtime-owned page metadata.
    ///
    /// # Errors
    /// * `RuntimeError` - If the data is malformed.
    fn parse_atlas(&self, desc: &AtlasDesc<'_>) -> Result<Arc<dyn AtlasData>, RuntimeError>;

    /// Loads shared skeleton data against a parsed atlas.
    ///
    /// The descriptor has already had its defaults resolved (prescale,
    /// default mix).
    ///
    /// # Errors
    /// * `RuntimeError` - If the data is malformed or inconsistent with the
    ///   atlas.
    fn load_skeleton(
        &self,
        atlas: &dyn AtlasData,
        desc: &SkeletonDesc<'_>,
    ) -> Result<Arc<dyn SkeletonData>, RuntimeError>;

    /// Creates one animated copy of a skeleton.
    ///
    /// # Errors
    /// * `RuntimeError` - If instantiation fails.
    fn instantiate(&self, data: &Arc<dyn SkeletonData>)
        -> Result<Box<dyn InstancePose>, RuntimeError>;
}
