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

use lustre_core::renderer::{
    BindGroupLayoutEntry, BindingType, BufferBindingType, ShaderStage, ShaderStageFlags,
    TextureSampleType, TextureViewDimension,
};

/// A local extension trait to convert binding descriptions into WGPU-compatible types.
/// This avoids Rust's orphan rules while keeping an idiomatic `.into_wgpu()` syntax.
pub trait IntoWgpu<T> {
    /// Consumes self and converts it into a WGPU-compatible type.
    fn into_wgpu(self) -> T;
}

// --- Stages ---

impl IntoWgpu<wgpu::ShaderStages> for ShaderStage {
    fn into_wgpu(self) -> wgpu::ShaderStages {
        match self {
            ShaderStage::Vertex => wgpu::ShaderStages::VERTEX,
            ShaderStage::Fragment => wgpu::ShaderStages::FRAGMENT,
            ShaderStage::Compute => wgpu::ShaderStages::COMPUTE,
        }
    }
}

impl IntoWgpu<wgpu::ShaderStages> for ShaderStageFlags {
    fn into_wgpu(self) -> wgpu::ShaderStages {
        wgpu::ShaderStages::from_bits_truncate(self.bits())
    }
}

// --- Texture bindings ---

impl IntoWgpu<wgpu::TextureSampleType> for TextureSampleType {
    fn into_wgpu(self) -> wgpu::TextureSampleType {
        match self {
            TextureSampleType::Float { filterable } => {
                wgpu::TextureSampleType::Float { filterable }
            }
        }
    }
}

impl IntoWgpu<wgpu::TextureViewDimension> for TextureViewDimension {
    fn into_wgpu(self) -> wgpu::TextureViewDimension {
        match self {
            TextureViewDimension::D2 => wgpu::TextureViewDimension::D2,
        }
    }
}

// --- Buffer bindings ---

impl IntoWgpu<wgpu::BufferBindingType> for BufferBindingType {
    fn into_wgpu(self) -> wgpu::BufferBindingType {
        match self {
            BufferBindingType::Uniform => wgpu::BufferBindingType::Uniform,
            BufferBindingType::Storage { read_only } => {
                wgpu::BufferBindingType::Storage { read_only }
            }
        }
    }
}

// --- Layout entries ---

impl IntoWgpu<wgpu::BindingType> for BindingType {
    fn into_wgpu(self) -> wgpu::BindingType {
        match self {
            BindingType::Buffer {
                ty,
                has_dynamic_offset,
                min_binding_size,
            } => wgpu::BindingType::Buffer {
                ty: ty.into_wgpu(),
                has_dynamic_offset,
                min_binding_size,
            },
            BindingType::Texture {
                sample_type,
                view_dimension,
                multisampled,
            } => wgpu::BindingType::Texture {
                sample_type: sample_type.into_wgpu(),
                view_dimension: view_dimension.into_wgpu(),
                multisampled,
            },
        }
    }
}

impl IntoWgpu<wgpu::BindGroupLayoutEntry> for BindGroupLayoutEntry {
    fn into_wgpu(self) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding: self.binding,
            visibility: self.visibility.into_wgpu(),
            ty: self.ty.into_wgpu(),
            count: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_stage_flags_conversion() {
        assert_eq!(
            wgpu::ShaderStages::VERTEX_FRAGMENT,
            ShaderStageFlags::VERTEX_FRAGMENT.into_wgpu()
        );
        assert_eq!(
            wgpu::ShaderStages::COMPUTE,
            ShaderStageFlags::COMPUTE.into_wgpu()
        );
        assert_eq!(wgpu::ShaderStages::NONE, ShaderStageFlags::NONE.into_wgpu());
        assert_eq!(
            wgpu::ShaderStages::FRAGMENT,
            ShaderStage::Fragment.into_wgpu()
        );
    }

    #[test]
    fn test_texture_sample_type_conversion() {
        assert_eq!(
            wgpu::TextureSampleType::Float { filterable: true },
            TextureSampleType::Float { filterable: true }.into_wgpu()
        );
        assert_eq!(
            wgpu::TextureSampleType::Float { filterable: false },
            TextureSampleType::Float { filterable: false }.into_wgpu()
        );
        assert_eq!(
            wgpu::TextureViewDimension::D2,
            TextureViewDimension::D2.into_wgpu()
        );
    }

    #[test]
    fn test_storage_buffer_conversion() {
        assert_eq!(
            wgpu::BufferBindingType::Storage { read_only: true },
            BufferBindingType::Storage { read_only: true }.into_wgpu()
        );
        assert_eq!(
            wgpu::BufferBindingType::Uniform,
            BufferBindingType::Uniform.into_wgpu()
        );
    }

    #[test]
    fn test_layout_entry_conversion() {
        let entry = BindGroupLayoutEntry::uniform(6, ShaderStageFlags::FRAGMENT, 48);
        let w: wgpu::BindGroupLayoutEntry = entry.into_wgpu();
        assert_eq!(w.binding, 6);
        assert_eq!(w.visibility, wgpu::ShaderStages::FRAGMENT);
        assert_eq!(w.count, None);
        match w.ty {
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                min_binding_size,
                has_dynamic_offset: false,
            } => assert_eq!(min_binding_size.map(|s| s.get()), Some(48)),
            other => panic!("expected a uniform buffer, got {other:?}"),
        }

        let texture: wgpu::BindGroupLayoutEntry =
            BindGroupLayoutEntry::texture_2d(0, ShaderStageFlags::FRAGMENT).into_wgpu();
        assert!(matches!(
            texture.ty,
            wgpu::BindingType::Texture {
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
                ..
            }
        ));
    }
}
