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

//! Defines static pipeline state: blend configuration, target formats, and
//! the pipeline descriptor.

use std::borrow::Cow;
use std::ops::BitOr;

/// The pixel format of a render target attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    /// The attachment is absent (e.g. no depth buffer).
    None,
    /// 8-bit-per-channel RGBA.
    #[default]
    Rgba8,
    /// 8-bit-per-channel BGRA.
    Bgra8,
    /// 32-bit float depth.
    Depth,
    /// Combined depth + stencil.
    DepthStencil,
}

/// A source or destination factor in the blend equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// Factor `0`.
    Zero,
    /// Factor `1`.
    One,
    /// The source color.
    SrcColor,
    /// One minus the source color.
    OneMinusSrcColor,
    /// The source alpha.
    SrcAlpha,
    /// One minus the source alpha.
    OneMinusSrcAlpha,
    /// The destination color.
    DstColor,
    /// One minus the destination color.
    OneMinusDstColor,
    /// The destination alpha.
    DstAlpha,
    /// One minus the destination alpha.
    OneMinusDstAlpha,
}

/// The blend function of a pipeline's color attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendState {
    /// Source factor for the RGB channels.
    pub src_factor_rgb: BlendFactor,
    /// Destination factor for the RGB channels.
    pub dst_factor_rgb: BlendFactor,
    /// Source factor for the alpha channel.
    pub src_factor_alpha: BlendFactor,
    /// Destination factor for the alpha channel.
    pub dst_factor_alpha: BlendFactor,
}

/// A mask selecting which color channels a pipeline writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorMask(pub u8);

impl ColorMask {
    /// Write no channels.
    pub const NONE: Self = Self(0);
    /// Write the red channel.
    pub const R: Self = Self(1);
    /// Write the green channel.
    pub const G: Self = Self(2);
    /// Write the blue channel.
    pub const B: Self = Self(4);
    /// Write the alpha channel.
    pub const A: Self = Self(8);
    /// Write the color channels but not alpha.
    pub const RGB: Self = Self(7);
    /// Write all channels.
    pub const ALL: Self = Self(15);
}

impl Default for ColorMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for ColorMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// A descriptor used to create a render pipeline.
///
/// The hosting backend supplies the shader program; the batcher only varies
/// blend state and target configuration between its pipelines.
#[derive(Debug, Clone)]
pub struct PipelineDescriptor<'a> {
    /// An optional debug label for the pipeline.
    pub label: Option<Cow<'a, str>>,
    /// The blend function of the color attachment.
    pub blend: BlendState,
    /// The color attachment format.
    pub color_format: PixelFormat,
    /// The depth attachment format ([`PixelFormat::None`] when absent).
    pub depth_format: PixelFormat,
    /// Samples per pixel of the render target.
    pub sample_count: u32,
    /// Which color channels the pipeline writes.
    pub color_write_mask: ColorMask,
}

/// An opaque handle to a GPU render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineId(pub usize);
