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

//! The atlas resource: a group of page images referenced by slot geometry.
//!
//! Parsing the atlas format is delegated to the animation runtime; this
//! module only owns the per-page GPU image ids and the resolved sampling
//! parameters. Page images are allocated in a deferred-init state — the
//! embedding application uploads pixel data on its own schedule and draw
//! commands skip pages whose image is not ready yet.

use crate::error::RuntimeError;
use crate::runtime::{AnimationRuntime, AtlasData};
use sinew_core::gpu::{Filter, GpuDevice, ImageId, Wrap};
use sinew_core::Handle;
use std::sync::Arc;

/// Handle to a pool-resident [`Atlas`].
pub type AtlasId = Handle<Atlas>;

/// Optional overrides applied on top of the parsed page metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtlasOverrides {
    /// Overrides the minification filter of every page.
    pub min_filter: Option<Filter>,
    /// Overrides the magnification filter of every page.
    pub mag_filter: Option<Filter>,
    /// Overrides the horizontal wrap mode of every page.
    pub wrap_u: Option<Wrap>,
    /// Overrides the vertical wrap mode of every page.
    pub wrap_v: Option<Wrap>,
    /// Overrides the premultiplied-alpha flag of every page.
    pub premultiplied_alpha: Option<bool>,
}

/// Descriptor for [`SkeletonRenderer::make_atlas`].
///
/// [`SkeletonRenderer::make_atlas`]: crate::renderer::SkeletonRenderer::make_atlas
#[derive(Debug, Clone, Copy, Default)]
pub struct AtlasDesc<'a> {
    /// Raw atlas data, handed to the animation runtime for parsing.
    pub data: &'a [u8],
    /// Overrides applied on top of the parsed page metadata.
    pub overrides: AtlasOverrides,
}

/// One atlas page with its GPU image and resolved sampling parameters.
#[derive(Debug, Clone)]
pub struct AtlasPage {
    /// The deferred-init GPU image for this page.
    pub image: ImageId,
    /// The page's source image name.
    pub name: String,
    /// Width of the page in pixels.
    pub width: u32,
    /// Height of the page in pixels.
    pub height: u32,
    /// Whether the page's pixel data is premultiplied-alpha.
    pub premultiplied_alpha: bool,
    /// Resolved minification filter.
    pub min_filter: Filter,
    /// Resolved magnification filter.
    pub mag_filter: Filter,
    /// Resolved horizontal wrap mode.
    pub wrap_u: Wrap,
    /// Resolved vertical wrap mode.
    pub wrap_v: Wrap,
}

/// Information about one atlas page, for the embedding application to
/// complete the image upload.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// The GPU image to initialize.
    pub image: ImageId,
    /// The page's source image name.
    pub name: String,
    /// Width of the page in pixels.
    pub width: u32,
    /// Height of the page in pixels.
    pub height: u32,
    /// Whether the pixel data is premultiplied-alpha.
    pub premultiplied_alpha: bool,
    /// Minification filter to configure.
    pub min_filter: Filter,
    /// Magnification filter to configure.
    pub mag_filter: Filter,
    /// Horizontal wrap mode to configure.
    pub wrap_u: Wrap,
    /// Vertical wrap mode to configure.
    pub wrap_v: Wrap,
}

/// The atlas payload stored in the atlas pool.
#[derive(Debug)]
pub struct Atlas {
    pub(crate) data: Arc<dyn AtlasData>,
    pub(crate) pages: Vec<AtlasPage>,
}

impl Atlas {
    /// Builds an atlas payload: parses the data through the runtime and
    /// reserves one deferred-init GPU image per page.
    ///
    /// On failure any already-reserved images are released before the error
    /// is returned, so a `Failed` atlas holds no GPU resources.
    pub(crate) fn build(
        device: &dyn GpuDevice,
        runtime: &dyn AnimationRuntime,
        desc: &AtlasDesc<'_>,
    ) -> Result<Self, RuntimeError> {
        if desc.data.is_empty() {
            return Err(RuntimeError::MalformedData {
                what: "atlas",
                details: "empty data".into(),
            });
        }
        let data = runtime.parse_atlas(desc)?;

        let mut pages = Vec::with_capacity(data.pages().len());
        for page in data.pages() {
            let image = match device.alloc_image() {
                Ok(image) => image,
                Err(err) => {
                    release_images(device, &pages);
                    return Err(err.into());
                }
            };
            let ov = &desc.overrides;
            pages.push(AtlasPage {
                image,
                name: page.name.clone(),
                width: page.width,
                height: page.height,
                premultiplied_alpha: ov.premultiplied_alpha.unwrap_or(page.premultiplied_alpha),
                min_filter: ov.min_filter.unwrap_or(page.min_filter),
                mag_filter: ov.mag_filter.unwrap_or(page.mag_filter),
                wrap_u: ov.wrap_u.unwrap_or(page.wrap_u),
                wrap_v: ov.wrap_v.unwrap_or(page.wrap_v),
            });
        }
        Ok(Self { data, pages })
    }

    /// Releases the page images.
    pub(crate) fn destroy(&self, device: &dyn GpuDevice) {
        release_images(device, &self.pages);
    }

    /// Number of pages in the atlas.
    pub(crate) fn num_pages(&self) -> usize {
        self.pages.len()
    }

    pub(crate) fn image_info(&self, index: usize) -> Option<ImageInfo> {
        let page = self.pages.get(index)?;
        Some(ImageInfo {
            image: page.image,
            name: page.name.clone(),
            width: page.width,
            height: page.height,
            premultiplied_alpha: page.premultiplied_alpha,
            min_filter: page.min_filter,
            mag_filter: page.mag_filter,
            wrap_u: page.wrap_u,
            wrap_v: page.wrap_v,
        })
    }
}

fn release_images(device: &dyn GpuDevice, pages: &[AtlasPage]) {
    for page in pages {
        if let Err(err) = device.destroy_image(page.image) {
            log::warn!("Atlas: failed to destroy page image: {err}");
        }
    }
}
