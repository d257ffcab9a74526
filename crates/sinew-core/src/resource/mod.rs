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

//! The generation-checked handle pool and the resource lifecycle state
//! machine.
//!
//! Every long-lived resource kind in the workspace is stored in a [`Pool`]
//! and addressed by a [`Handle`]. Handles encode a slot index and a
//! generation counter; a lookup succeeds only if the slot's current id
//! matches the handle exactly, so a handle from a freed-and-reused slot can
//! never alias the new occupant.

pub mod handle;
pub mod pool;
pub mod state;

pub use handle::Handle;
pub use pool::{Pool, MAX_POOL_CAPACITY};
pub use state::ResourceState;
