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

//! Provides the 2D math primitives used by the batcher.
//!
//! This module contains vectors, a column-major 4x4 matrix for the layer
//! projection, and an RGBA color type with the channel-product and 8-bit
//! packing operations the vertex writer needs.

pub mod color;
pub mod matrix;
pub mod vector;

pub use color::Rgba;
pub use matrix::Mat4;
pub use vector::{Vec2, Vec4};

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

/// Compares two `f32` values for approximate equality using [`EPSILON`].
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    approx::abs_diff_eq!(a, b, epsilon = EPSILON)
}
