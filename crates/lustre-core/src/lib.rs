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

//! Backend-agnostic binding-table contract for PBR materials.
//!
//! A material binding table groups six texture handles and one constants
//! record into a single addressable block that a shading stage binds in one
//! operation. This crate owns the layout of that block: how slots are
//! enumerated, how the host-side mirror is laid out in memory, and how the
//! matching device-side WGSL declaration is produced.

#![warn(missing_docs)]

pub mod binding;
pub mod config;
pub mod material;
pub mod renderer;
pub mod shader;

pub use binding::{BindingModel, BindingSlot, BindingTable, BindingTableLayout};
pub use config::MaterialBindingConfig;
pub use material::{Material, MaterialBindingTable, MaterialTextureRole};
pub use renderer::api::texture::TextureHandle;
pub use renderer::error::{BindingError, LayoutError};
