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

use approx::assert_relative_eq;
use lustre_core::binding::{
    BindingSlot, BindingTable, BindingTableBuilder, Placeholders, TextureRole,
};
use lustre_core::shader::wgsl::material_bindings;
use lustre_core::{
    BindingModel, LayoutError, Material, MaterialBindingConfig, MaterialBindingTable,
    MaterialTextureRole, TextureHandle,
};
use lustre_infra::{verify_wgsl, ShaderReflection};

lustre_core::binding_table! {
    /// The PBR table with an emissive map inserted after the normal map.
    pub struct EmissiveMaterialTable {
        roles enum EmissiveRole;
        textures {
            base_color_texture => BaseColor,
            normal_texture => Normal,
            emissive_texture => Emissive,
            roughness_texture => Roughness,
            metallic_texture => Metallic,
            ao_texture => AmbientOcclusion,
            opacity_texture => Opacity,
        }
        constants material: Material,
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config(model: BindingModel, base_slot: u32) -> MaterialBindingConfig {
    MaterialBindingConfig {
        base_slot,
        binding_model: model,
        ..MaterialBindingConfig::default()
    }
}

fn populated_table() -> MaterialBindingTable {
    let material = Material {
        base_color: [0.8, 0.1, 0.2],
        roughness: 0.35,
        metallic: 0.9,
        opacity: 0.5,
        ..Material::default()
    };
    MaterialTextureRole::ALL
        .iter()
        .fold(BindingTableBuilder::new(material), |builder, role| {
            builder.texture(*role, TextureHandle::new(100 + role.offset()))
        })
        .try_build()
        .unwrap()
}

#[test]
fn generated_declarations_verify_in_both_models() {
    init_logger();
    for model in [BindingModel::Discrete, BindingModel::ArgumentBuffer] {
        for base in [0, 3] {
            let config = config(model, base);
            let wgsl = material_bindings::<MaterialBindingTable>(&config).unwrap();
            verify_wgsl::<MaterialBindingTable>(&wgsl, &config).unwrap();
        }
    }
}

#[test]
fn host_bytes_read_back_through_device_offsets() {
    init_logger();
    let config = config(BindingModel::ArgumentBuffer, 0);
    let wgsl = material_bindings::<MaterialBindingTable>(&config).unwrap();
    let reflection = ShaderReflection::from_wgsl(&wgsl).unwrap();
    let record = reflection.struct_named("MaterialBindingTable").unwrap();
    let constants = reflection.struct_named("Material").unwrap();

    let table = populated_table();
    let bytes = bytemuck::bytes_of(&table);
    assert_eq!(bytes.len() as u32, record.size);

    for role in MaterialTextureRole::ALL {
        assert_eq!(
            record.read_u32(bytes, role.field_name()),
            Some(table.texture(*role).index())
        );
    }

    let material_bytes = record.slice(bytes, "material").unwrap();
    assert_relative_eq!(constants.read_f32(material_bytes, "roughness").unwrap(), 0.35);
    assert_relative_eq!(constants.read_f32(material_bytes, "metallic").unwrap(), 0.9);
    assert_relative_eq!(constants.read_f32(material_bytes, "opacity").unwrap(), 0.5);
    assert_relative_eq!(constants.read_f32(material_bytes, "base_color").unwrap(), 0.8);
}

#[test]
fn distinct_handles_read_back_distinct() {
    let config = config(BindingModel::ArgumentBuffer, 0);
    let wgsl = material_bindings::<MaterialBindingTable>(&config).unwrap();
    let record = ShaderReflection::from_wgsl(&wgsl)
        .unwrap()
        .struct_named("MaterialBindingTable")
        .unwrap();

    let table = populated_table();
    let bytes = bytemuck::bytes_of(&table);
    let read: Vec<u32> = MaterialTextureRole::ALL
        .iter()
        .filter_map(|role| record.read_u32(bytes, role.field_name()))
        .collect();
    assert_eq!(read, vec![100, 101, 102, 103, 104, 105]);
}

#[test]
fn placeholder_occupies_its_slot_on_the_device() {
    let config = config(BindingModel::ArgumentBuffer, 0);
    let wgsl = material_bindings::<MaterialBindingTable>(&config).unwrap();
    let record = ShaderReflection::from_wgsl(&wgsl)
        .unwrap()
        .struct_named("MaterialBindingTable")
        .unwrap();

    let placeholder = TextureHandle::new(7);
    let table: MaterialBindingTable = BindingTableBuilder::new(Material::default())
        .texture(MaterialTextureRole::BaseColor, TextureHandle::new(1))
        .texture(MaterialTextureRole::Normal, TextureHandle::new(2))
        .texture(MaterialTextureRole::Roughness, TextureHandle::new(3))
        .texture(MaterialTextureRole::Metallic, TextureHandle::new(4))
        .texture(MaterialTextureRole::AmbientOcclusion, TextureHandle::new(5))
        .build_with(&Placeholders::uniform(placeholder));

    let bytes = bytemuck::bytes_of(&table);
    assert_eq!(record.read_u32(bytes, "ao_texture"), Some(5));
    assert_eq!(record.read_u32(bytes, "opacity_texture"), Some(7));
    assert_eq!(record.member("material").map(|m| m.offset), Some(32));
}

#[test]
fn seventh_texture_shifts_the_constants_slot() {
    init_logger();
    assert_eq!(EmissiveMaterialTable::CONSTANTS_OFFSET, 7);
    assert_eq!(EmissiveRole::Opacity.offset(), 6);

    let base = 2;
    let layout = EmissiveMaterialTable::layout(base).unwrap();
    assert_eq!(layout.slot_of("emissive_texture"), Some(BindingSlot(base + 2)));
    assert_eq!(layout.slot_of("opacity_texture"), Some(BindingSlot(base + 6)));
    assert_eq!(layout.constants_slot(), Some(BindingSlot(base + 7)));

    let discrete = config(BindingModel::Discrete, base);
    let wgsl = material_bindings::<EmissiveMaterialTable>(&discrete).unwrap();
    assert!(wgsl.contains("@group(1) @binding(9) var<uniform> material: Material;"));
    verify_wgsl::<EmissiveMaterialTable>(&wgsl, &discrete).unwrap();

    let argument = config(BindingModel::ArgumentBuffer, base);
    let wgsl = material_bindings::<EmissiveMaterialTable>(&argument).unwrap();
    let reflection = verify_wgsl::<EmissiveMaterialTable>(&wgsl, &argument).unwrap();
    let record = reflection.struct_named("EmissiveMaterialTable").unwrap();
    assert_eq!(record.member("material").map(|m| m.offset), Some(32));
    assert_eq!(record.size as usize, std::mem::size_of::<EmissiveMaterialTable>());
}

#[test]
fn hand_renumbered_constants_slot_is_rejected() {
    let config = config(BindingModel::Discrete, 0);
    let wgsl = material_bindings::<MaterialBindingTable>(&config)
        .unwrap()
        .replace("@binding(6) var<uniform>", "@binding(7) var<uniform>");
    let err = verify_wgsl::<MaterialBindingTable>(&wgsl, &config).unwrap_err();
    assert_eq!(
        err,
        LayoutError::SlotMismatch {
            field: "material".to_string(),
            expected: (1, 6),
            found: Some((1, 7)),
        }
    );
}

#[test]
fn swapped_record_members_are_rejected() {
    let config = config(BindingModel::ArgumentBuffer, 0);
    let wgsl = material_bindings::<MaterialBindingTable>(&config)
        .unwrap()
        .replace(
            "    base_color_texture: u32,\n    normal_texture: u32,\n",
            "    normal_texture: u32,\n    base_color_texture: u32,\n",
        );
    let err = verify_wgsl::<MaterialBindingTable>(&wgsl, &config).unwrap_err();
    assert_eq!(
        err,
        LayoutError::FieldOrder {
            owner: "MaterialBindingTable".to_string(),
            position: 0,
            expected: "base_color_texture".to_string(),
            found: "normal_texture".to_string(),
        }
    );
}

#[test]
fn missing_texture_declaration_is_rejected() {
    let config = config(BindingModel::Discrete, 0);
    let wgsl = material_bindings::<MaterialBindingTable>(&config)
        .unwrap()
        .replace("@group(1) @binding(5) var opacity_texture: texture_2d<f32>;\n", "");
    let err = verify_wgsl::<MaterialBindingTable>(&wgsl, &config).unwrap_err();
    assert_eq!(
        err,
        LayoutError::MissingDeclaration {
            name: "opacity_texture".to_string()
        }
    );
}

#[test]
fn unpacked_constants_are_rejected() {
    let config = config(BindingModel::Discrete, 0);
    let wgsl = material_bindings::<MaterialBindingTable>(&config)
        .unwrap()
        .replace("    base_color: vec3<f32>,\n", "    base_color: vec4<f32>,\n");
    let err = verify_wgsl::<MaterialBindingTable>(&wgsl, &config).unwrap_err();
    assert_eq!(
        err,
        LayoutError::FieldOffset {
            field: "Material.shininess".to_string(),
            host: 12,
            device: 16,
        }
    );
}

#[test]
fn widened_constants_member_is_rejected() {
    let config = config(BindingModel::ArgumentBuffer, 0);
    let wgsl = material_bindings::<MaterialBindingTable>(&config)
        .unwrap()
        .replace("    opacity: f32,\n", "    opacity: vec2<f32>,\n");
    let err = verify_wgsl::<MaterialBindingTable>(&wgsl, &config).unwrap_err();
    assert_eq!(
        err,
        LayoutError::FieldSize {
            field: "Material.opacity".to_string(),
            host: 4,
            device: 8,
        }
    );
}

#[test]
fn integer_constants_member_is_rejected() {
    let config = config(BindingModel::Discrete, 0);
    let wgsl = material_bindings::<MaterialBindingTable>(&config)
        .unwrap()
        .replace("    metallic: f32,\n", "    metallic: u32,\n");
    let err = verify_wgsl::<MaterialBindingTable>(&wgsl, &config).unwrap_err();
    assert_eq!(
        err,
        LayoutError::FieldType {
            field: "Material.metallic".to_string(),
            expected: "f32".to_string(),
            found: "u32".to_string(),
        }
    );
}

#[test]
fn float_handle_member_is_rejected() {
    let config = config(BindingModel::ArgumentBuffer, 0);
    let wgsl = material_bindings::<MaterialBindingTable>(&config)
        .unwrap()
        .replace("    normal_texture: u32,\n", "    normal_texture: f32,\n");
    let err = verify_wgsl::<MaterialBindingTable>(&wgsl, &config).unwrap_err();
    assert_eq!(
        err,
        LayoutError::FieldType {
            field: "MaterialBindingTable.normal_texture".to_string(),
            expected: "u32".to_string(),
            found: "f32".to_string(),
        }
    );
}

#[test]
fn constants_in_wrong_address_space_are_rejected() {
    let config = config(BindingModel::Discrete, 0);
    let wgsl = material_bindings::<MaterialBindingTable>(&config)
        .unwrap()
        .replace("var<uniform> material", "var<storage, read> material");
    let err = verify_wgsl::<MaterialBindingTable>(&wgsl, &config).unwrap_err();
    assert!(matches!(
        err,
        LayoutError::WrongResourceKind { ref field, .. } if field == "material"
    ));
}
