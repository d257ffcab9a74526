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

//! # Sinew Core
//!
//! Foundational crate containing the generation-checked handle pool, math
//! primitives, and the backend-agnostic GPU interface contracts shared by the
//! rest of the workspace.

#![warn(missing_docs)]

pub mod gpu;
pub mod math;
pub mod resource;

pub use resource::{Handle, Pool, ResourceState};
