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

//! The skeleton resource: shared animation/pose data loaded against an
//! atlas.

use crate::atlas::AtlasId;
use crate::runtime::SkeletonData;
use sinew_core::Handle;
use std::sync::Arc;

/// Handle to a pool-resident [`Skeleton`].
pub type SkeletonId = Handle<Skeleton>;

/// Default prescale applied when the descriptor leaves it at zero.
pub(crate) const DEFAULT_PRESCALE: f32 = 1.0;
/// Default animation cross-fade duration in seconds.
pub(crate) const DEFAULT_ANIM_MIX: f32 = 0.2;

/// Descriptor for [`SkeletonRenderer::make_skeleton`].
///
/// Exactly one of `json_data` / `binary_data` must be provided. Zero-valued
/// numeric fields are patched with defaults before the descriptor reaches
/// the animation runtime.
///
/// [`SkeletonRenderer::make_skeleton`]: crate::renderer::SkeletonRenderer::make_skeleton
#[derive(Debug, Clone, Copy, Default)]
pub struct SkeletonDesc<'a> {
    /// The atlas this skeleton's attachments resolve against. Must be in
    /// the `Valid` state.
    pub atlas: AtlasId,
    /// Uniform scale applied while loading (0 selects 1.0).
    pub prescale: f32,
    /// Default animation cross-fade duration in seconds (0 selects 0.2).
    pub anim_default_mix: f32,
    /// Skeleton data in JSON form.
    pub json_data: Option<&'a str>,
    /// Skeleton data in binary form.
    pub binary_data: Option<&'a [u8]>,
}

impl SkeletonDesc<'_> {
    /// Returns a copy with zero-valued fields replaced by their defaults.
    pub(crate) fn resolved(&self) -> Self {
        let mut desc = *self;
        if desc.prescale == 0.0 {
            desc.prescale = DEFAULT_PRESCALE;
        }
        if desc.anim_default_mix == 0.0 {
            desc.anim_default_mix = DEFAULT_ANIM_MIX;
        }
        desc
    }

    /// Whether the descriptor carries any skeleton data at all.
    pub(crate) fn has_data(&self) -> bool {
        self.json_data.is_some() || self.binary_data.map_or(false, |d| !d.is_empty())
    }
}

/// The skeleton payload stored in the skeleton pool.
///
/// Holds the atlas dependency as a handle, never as a pointer: every use
/// re-resolves it through the pool, so destroying the atlas first degrades
/// dependents to no-ops instead of dangling.
#[derive(Debug)]
pub struct Skeleton {
    pub(crate) atlas: AtlasId,
    pub(crate) data: Arc<dyn SkeletonData>,
}
