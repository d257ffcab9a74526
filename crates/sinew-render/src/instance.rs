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

//! The instance resource: one animated, positioned copy of a skeleton.

use crate::atlas::AtlasId;
use crate::runtime::InstancePose;
use crate::skeleton::SkeletonId;
use sinew_core::Handle;

/// Handle to a pool-resident [`Instance`].
pub type InstanceId = Handle<Instance>;

/// Descriptor for [`SkeletonRenderer::make_instance`].
///
/// [`SkeletonRenderer::make_instance`]: crate::renderer::SkeletonRenderer::make_instance
#[derive(Debug, Clone, Copy, Default)]
pub struct InstanceDesc {
    /// The skeleton to instantiate. Must be in the `Valid` state.
    pub skeleton: SkeletonId,
}

/// The instance payload stored in the instance pool.
///
/// Both dependencies are held as handles and re-resolved through their
/// pools on every operation; destroying the atlas or skeleton degrades this
/// instance to a silent no-op instead of touching freed memory.
#[derive(Debug)]
pub struct Instance {
    pub(crate) skeleton: SkeletonId,
    pub(crate) atlas: AtlasId,
    pub(crate) pose: Box<dyn InstancePose>,
}
