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

//! Concrete backend for lustre binding tables.
//!
//! - [`graphics::wgpu`] creates bind group layouts, bind groups and argument
//!   buffers from binding tables.
//! - [`reflection`] parses WGSL with `naga` and checks that the device-side
//!   declaration of a table matches its host mirror byte for byte.

#![warn(missing_docs)]

pub mod graphics;
pub mod reflection;

pub use graphics::wgpu::{
    create_material_bind_group, ArgumentBuffer, IntoWgpu, MaterialBindGroup,
    MaterialBindGroupLayout, TextureViewPool, TextureViewSource,
};
pub use reflection::{verify_wgsl, ShaderReflection};
