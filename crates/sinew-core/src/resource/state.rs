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

/// The lifecycle state of a pool-resident resource.
///
/// Every `make_*` operation moves a slot from `Initial` through `Alloc` to
/// either `Valid` or `Failed`. `Invalid` is never stored in a slot; it is
/// the answer returned for any handle that fails lookup (stale generation,
/// freed slot, or the reserved invalid handle).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceState {
    /// The slot is reserved but carries no payload.
    #[default]
    Initial,
    /// Payload construction has begun.
    Alloc,
    /// The resource is fully constructed and usable.
    Valid,
    /// Payload construction failed; the handle stays queryable until the
    /// resource is destroyed.
    Failed,
    /// Returned for any handle that does not resolve to a live slot.
    Invalid,
}
