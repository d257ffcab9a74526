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

use super::vector::Vec4;

/// A 4x4 column-major matrix.
///
/// The memory layout is column-major, which is compatible with modern
/// graphics APIs. The only matrix the batcher ever builds is the per-layer
/// orthographic projection, but the type is kept general so backends can
/// compose it with their own view transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat4 {
    /// The columns of the matrix. `cols[0]` is the first column, and so on.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// Creates a new matrix from four column vectors.
    #[inline]
    pub fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Creates a right-handed orthographic projection matrix with a
    /// [-1, 1] depth range (NO).
    #[inline]
    pub fn orthographic_rh_no(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        let rml = right - left;
        let rpl = right + left;
        let tmb = top - bottom;
        let tpb = top + bottom;
        let fmn = z_far - z_near;
        let fpn = z_far + z_near;

        Self::from_cols(
            Vec4::new(2.0 / rml, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 2.0 / tmb, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -2.0 / fmn, 0.0),
            Vec4::new(-rpl / rml, -tpb / tmb, -fpn / fmn, 1.0),
        )
    }

    /// Returns the matrix elements as a flat column-major array, the layout
    /// expected by a `mat4` uniform.
    #[inline]
    pub fn to_cols_array(&self) -> [f32; 16] {
        let c = &self.cols;
        [
            c[0].x, c[0].y, c[0].z, c[0].w, //
            c[1].x, c[1].y, c[1].z, c[1].w, //
            c[2].x, c[2].y, c[2].z, c[2].w, //
            c[3].x, c[3].y, c[3].z, c[3].w, //
        ]
    }
}
