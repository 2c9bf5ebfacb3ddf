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

//! Backend-agnostic bind group layout entries.
//!
//! A binding table is turned into a list of these entries, which a backend
//! then converts into its native layout object (a `wgpu::BindGroupLayout`,
//! a Vulkan descriptor set layout, ...).

use std::num::NonZeroU64;

use crate::renderer::api::util::flags::ShaderStageFlags;

/// Describes a single binding entry in a bind group layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindGroupLayoutEntry {
    /// The binding index (`@binding(n)` in WGSL).
    pub binding: u32,
    /// Which shader stages can access this binding.
    pub visibility: ShaderStageFlags,
    /// The type of resource being bound.
    pub ty: BindingType,
}

impl BindGroupLayoutEntry {
    /// A filterable, single-sampled `texture_2d<f32>` binding.
    pub fn texture_2d(binding: u32, visibility: ShaderStageFlags) -> Self {
        Self {
            binding,
            visibility,
            ty: BindingType::Texture {
                sample_type: TextureSampleType::Float { filterable: true },
                view_dimension: TextureViewDimension::D2,
                multisampled: false,
            },
        }
    }

    /// A uniform buffer binding holding at least `size` bytes.
    pub fn uniform(binding: u32, visibility: ShaderStageFlags, size: u64) -> Self {
        Self {
            binding,
            visibility,
            ty: BindingType::Buffer {
                ty: BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size),
            },
        }
    }

    /// A read-only storage buffer binding whose elements are `element_size` bytes.
    pub fn storage_read_only(
        binding: u32,
        visibility: ShaderStageFlags,
        element_size: u64,
    ) -> Self {
        Self {
            binding,
            visibility,
            ty: BindingType::Buffer {
                ty: BufferBindingType::Storage { read_only: true },
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(element_size),
            },
        }
    }
}

/// Describes the type of buffer binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferBindingType {
    /// A uniform buffer.
    Uniform,
    /// A storage buffer.
    Storage {
        /// Whether the buffer is read-only in the shader.
        read_only: bool,
    },
}

/// The dimension of a texture view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureViewDimension {
    /// A 2D texture view.
    D2,
}

/// The type of texture sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSampleType {
    /// A floating-point texture sample.
    Float {
        /// Whether the texture can be filtered.
        filterable: bool,
    },
}

/// The type of resource bound at a binding point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingType {
    /// A buffer binding (uniform or storage).
    Buffer {
        /// The type of buffer binding.
        ty: BufferBindingType,
        /// Whether this buffer has dynamic offsets.
        has_dynamic_offset: bool,
        /// Minimum size required for the buffer binding.
        min_binding_size: Option<NonZeroU64>,
    },
    /// A sampled texture binding.
    Texture {
        /// The type of sampler that can sample this texture.
        sample_type: TextureSampleType,
        /// The dimension of the texture view.
        view_dimension: TextureViewDimension,
        /// Whether the texture supports multisampling.
        multisampled: bool,
    },
}

impl BindingType {
    /// Whether this is a sampled texture binding.
    pub fn is_texture(&self) -> bool {
        matches!(self, BindingType::Texture { .. })
    }
}
