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

//! Renderer-facing vocabulary shared by the host and the graphics backends.

pub mod api;
pub mod error;

pub use self::api::bind_group::{
    BindGroupLayoutEntry, BindingType, BufferBindingType, TextureSampleType,
    TextureViewDimension,
};
pub use self::api::texture::TextureHandle;
pub use self::api::util::enums::ShaderStage;
pub use self::api::util::flags::ShaderStageFlags;
pub use self::error::{BindingError, LayoutError};
