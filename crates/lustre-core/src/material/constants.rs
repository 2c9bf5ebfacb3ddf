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

//! Scalar PBR parameters, formatted for GPU consumption.

use std::mem::{offset_of, size_of};

use crate::binding::HostField;
use crate::shader::{GpuStruct, WgslMember};

/// Scalar parameters of a PBR material.
///
/// Each `vec3` is followed by a scalar so it fills a 16-byte row, which is
/// exactly where WGSL places the members. The trailing pad rounds the size up
/// to the struct's 16-byte alignment.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Material {
    /// Albedo tint (linear RGB), multiplied with the base color texture.
    pub base_color: [f32; 3],
    /// Specular exponent for the non-PBR fallback path.
    pub shininess: f32,
    /// Specular tint (linear RGB).
    pub specular_color: [f32; 3],
    /// Perceptual roughness in `[0, 1]`.
    pub roughness: f32,
    /// Metalness in `[0, 1]`.
    pub metallic: f32,
    /// Ambient occlusion factor in `[0, 1]`.
    pub ambient_occlusion: f32,
    /// Opacity in `[0, 1]`; `1.0` is fully opaque.
    pub opacity: f32,
    /// Pads the struct to 48 bytes.
    pub _padding: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0],
            shininess: 32.0,
            specular_color: [1.0, 1.0, 1.0],
            roughness: 0.5,
            metallic: 0.0,
            ambient_occlusion: 1.0,
            opacity: 1.0,
            _padding: 0.0,
        }
    }
}

const MATERIAL_MEMBERS: &[WgslMember] = &[
    WgslMember::new("base_color", "vec3<f32>"),
    WgslMember::new("shininess", "f32"),
    WgslMember::new("specular_color", "vec3<f32>"),
    WgslMember::new("roughness", "f32"),
    WgslMember::new("metallic", "f32"),
    WgslMember::new("ambient_occlusion", "f32"),
    WgslMember::new("opacity", "f32"),
];

impl GpuStruct for Material {
    const WGSL_NAME: &'static str = "Material";

    fn wgsl_members() -> &'static [WgslMember] {
        MATERIAL_MEMBERS
    }

    fn host_fields() -> Vec<HostField> {
        vec![
            HostField::new("base_color", offset_of!(Material, base_color), size_of::<[f32; 3]>()),
            HostField::new("shininess", offset_of!(Material, shininess), size_of::<f32>()),
            HostField::new(
                "specular_color",
                offset_of!(Material, specular_color),
                size_of::<[f32; 3]>(),
            ),
            HostField::new("roughness", offset_of!(Material, roughness), size_of::<f32>()),
            HostField::new("metallic", offset_of!(Material, metallic), size_of::<f32>()),
            HostField::new(
                "ambient_occlusion",
                offset_of!(Material, ambient_occlusion),
                size_of::<f32>(),
            ),
            HostField::new("opacity", offset_of!(Material, opacity), size_of::<f32>()),
        ]
    }
}

const _: () = assert!(size_of::<Material>() == 48);
