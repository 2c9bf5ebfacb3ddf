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

use super::Material;

crate::binding_table! {
    /// Where a shading stage finds a PBR material's textures and constants.
    ///
    /// Six texture handles occupy `base + 0 ..= base + 5` in declaration
    /// order; the constants record follows on the next slot.
    pub struct MaterialBindingTable {
        /// A texture role of [`MaterialBindingTable`].
        roles enum MaterialTextureRole;
        textures {
            /// Albedo.
            base_color_texture => BaseColor,
            /// Tangent-space normal map.
            normal_texture => Normal,
            /// Perceptual roughness.
            roughness_texture => Roughness,
            /// Metalness.
            metallic_texture => Metallic,
            /// Ambient occlusion.
            ao_texture => AmbientOcclusion,
            /// Opacity.
            opacity_texture => Opacity,
        }
        /// Scalar parameters.
        constants material: Material,
    }
}
