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

//! # Sinew Render
//!
//! A per-frame geometry batcher and handle-based resource manager for 2D
//! skeletal animation. It sits between a skeletal-animation evaluator (the
//! [`runtime::AnimationRuntime`] collaborator) and a GPU command layer (the
//! [`sinew_core::gpu::GpuDevice`] collaborator): per frame it collects
//! per-slot mesh geometry, transforms it into a shared vertex/index stream,
//! and emits the minimum number of draw commands by coalescing adjacent
//! draws that share pipeline state.
//!
//! The entry point is [`SkeletonRenderer`].

#![warn(missing_docs)]

pub mod arena;
pub mod atlas;
pub mod command;
pub mod context;
pub mod error;
pub mod instance;
pub mod renderer;
pub mod runtime;
pub mod skeleton;

mod batcher;
#[cfg(test)]
mod testing;

pub use atlas::{AtlasDesc, AtlasId, AtlasOverrides, ImageInfo};
pub use context::{ContextDesc, ContextId, LayerTransform};
pub use error::RuntimeError;
pub use instance::{InstanceDesc, InstanceId};
pub use renderer::{RendererDesc, SkeletonRenderer};
pub use skeleton::{SkeletonDesc, SkeletonId};
pub use sinew_core::ResourceState;
