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

//! Defines the error type surfaced by [`GpuDevice`] operations.
//!
//! [`GpuDevice`]: crate::gpu::GpuDevice

use std::fmt;

/// An error reported by the GPU backend.
#[derive(Debug)]
pub enum GpuError {
    /// The backend failed to create a resource.
    CreationFailed {
        /// A descriptive label for the resource, if available.
        label: Option<String>,
        /// Detailed error messages from the backend.
        details: String,
    },
    /// An operation referenced a resource the backend does not know.
    ResourceNotFound {
        /// A description of the missing resource.
        details: String,
    },
    /// A buffer update could not be performed.
    WriteFailed {
        /// A description of the failed write.
        details: String,
    },
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::CreationFailed { label, details } => {
                let label = label.as_deref().unwrap_or("<unlabeled>");
                write!(f, "Failed to create GPU resource '{label}': {details}")
            }
            GpuError::ResourceNotFound { details } => {
                write!(f, "GPU resource not found: {details}")
            }
            GpuError::WriteFailed { details } => {
                write!(f, "GPU buffer write failed: {details}")
            }
        }
    }
}

impl std::error::Error for GpuError {}
