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

use sinew_core::gpu::GpuError;
use thiserror::Error;

/// An error raised while constructing a resource payload.
///
/// These errors never cross the public surface as `Result`s; `make_*`
/// operations log them and park the resource in the `Failed` lifecycle
/// state, which callers poll instead.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The descriptor carried data the animation runtime could not parse.
    #[error("malformed {what} data: {details}")]
    MalformedData {
        /// What kind of data failed to parse (e.g. "atlas", "skeleton").
        what: &'static str,
        /// Parser diagnostics.
        details: String,
    },

    /// A resource this one depends on is missing or not in the `Valid`
    /// state.
    #[error("missing or invalid dependency: {0}")]
    MissingDependency(&'static str),

    /// The animation runtime reported a construction failure.
    #[error("animation runtime error: {0}")]
    Runtime(String),

    /// The GPU backend refused a resource the payload needs.
    #[error(transparent)]
    Gpu(#[from] GpuError),
}
