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

//! The backend-agnostic GPU contract.
//!
//! This module defines the "common language" the batcher speaks to whatever
//! graphics backend hosts it: opaque resource ids, descriptor structs, and
//! the [`GpuDevice`] trait. It defines the *what* of GPU submission; the
//! *how* lives in a backend implementation supplied by the embedding
//! application (or a mock device in tests).

pub mod buffer;
pub mod device;
pub mod error;
pub mod image;
pub mod pipeline;

pub use buffer::{BufferDescriptor, BufferId, BufferKind, BufferUsage};
pub use device::{Bindings, GpuDevice, ShaderStage};
pub use error::GpuError;
pub use image::{Filter, ImageId, Wrap};
pub use pipeline::{BlendFactor, BlendState, ColorMask, PipelineDescriptor, PipelineId, PixelFormat};
