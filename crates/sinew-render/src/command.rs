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

use sinew_core::gpu::{ImageId, PipelineId};

/// A batched instruction to render one contiguous index range with a given
/// pipeline/image/blend-correction state.
///
/// Commands are appended in per-slot draw order within a layer and never
/// reordered: draw order is semantically meaningful for 2D alpha blending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// The layer this command belongs to.
    pub layer: i32,
    /// The pipeline to draw with.
    pub pipeline: PipelineId,
    /// The texture to bind.
    pub image: ImageId,
    /// Premultiplied-alpha correction factor, exactly `0.0` (use texture
    /// color as-is) or `1.0` (multiply rgb by alpha in the fragment stage).
    pub pma: f32,
    /// First index of the range in the index stream.
    pub base_element: u32,
    /// Number of indices to draw.
    pub num_elements: u32,
}

impl DrawCommand {
    /// Whether a new polygon with this state can extend `self` in place.
    ///
    /// Merging is only ever attempted against the most recently appended
    /// command — adjacency is what keeps draw order intact.
    #[inline]
    pub fn can_merge(&self, layer: i32, pipeline: PipelineId, image: ImageId, pma: f32) -> bool {
        self.layer == layer
            && self.pipeline == pipeline
            && self.image == image
            && self.pma.to_bits() == pma.to_bits()
    }
}

impl Default for DrawCommand {
    fn default() -> Self {
        Self {
            layer: 0,
            pipeline: PipelineId(0),
            image: ImageId(0),
            pma: 0.0,
            base_element: 0,
            num_elements: 0,
        }
    }
}
