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

//! WGSL source generation for binding tables.
//!
//! The generated text is meant to be prepended to a shader module, so the
//! device declaration is produced from the same field list as the host mirror.

use super::GpuStruct;
use crate::binding::{BindingModel, BindingTable, FieldKind, TextureRole};
use crate::config::MaterialBindingConfig;
use crate::renderer::error::LayoutError;

/// Name of the storage array global in the argument-buffer model.
pub const ARGUMENT_BUFFER_GLOBAL: &str = "material_tables";

/// WGSL type of a texture field in the discrete model.
pub const TEXTURE_2D_TYPE: &str = "texture_2d<f32>";

/// WGSL type of a texture handle inside an argument-buffer record.
pub const HANDLE_TYPE: &str = "u32";

/// The `struct` declaration of a constants record.
pub fn struct_declaration<S: GpuStruct>() -> String {
    let mut out = format!("struct {} {{\n", S::WGSL_NAME);
    for member in S::wgsl_members() {
        out.push_str(&format!("    {}: {},\n", member.name, member.ty));
    }
    out.push_str("}\n");
    out
}

/// The `struct` declaration of one argument-buffer record: a `u32` handle
/// per texture role followed by the constants record.
pub fn argument_record_declaration<T: BindingTable>() -> String {
    let mut out = format!("struct {} {{\n", T::NAME);
    for role in <T::Role as TextureRole>::ALL {
        out.push_str(&format!("    {}: {},\n", role.field_name(), HANDLE_TYPE));
    }
    out.push_str(&format!(
        "    {}: {},\n",
        T::CONSTANTS_FIELD,
        <T::Constants as GpuStruct>::WGSL_NAME
    ));
    out.push_str("}\n");
    out
}

/// Every declaration a shader needs to read table `T` under `config`.
///
/// Discrete model: the constants struct, one `texture_2d<f32>` global per
/// texture slot and a uniform global at the derived constants slot.
/// Argument-buffer model: the constants struct, the record struct and a
/// read-only storage array of records at the base slot.
pub fn material_bindings<T: BindingTable>(
    config: &MaterialBindingConfig,
) -> Result<String, LayoutError> {
    let layout = T::layout(config.base_slot)?;
    let group = config.group;

    let mut out = struct_declaration::<T::Constants>();
    out.push('\n');
    match config.binding_model {
        BindingModel::Discrete => {
            for field in layout.fields() {
                let declaration = match &field.kind {
                    FieldKind::Texture2d => format!("var {}: {}", field.name, TEXTURE_2D_TYPE),
                    FieldKind::Constants { type_name, .. } => {
                        format!("var<uniform> {}: {}", field.name, type_name)
                    }
                };
                out.push_str(&format!(
                    "@group({}) @binding({}) {};\n",
                    group, field.slot, declaration
                ));
            }
        }
        BindingModel::ArgumentBuffer => {
            out.push_str(&argument_record_declaration::<T>());
            out.push('\n');
            out.push_str(&format!(
                "@group({}) @binding({}) var<storage, read> {}: array<{}>;\n",
                group,
                layout.base(),
                ARGUMENT_BUFFER_GLOBAL,
                T::NAME
            ));
        }
    }

    log::debug!(
        "Generated {:?} WGSL bindings for {} at group {}",
        config.binding_model,
        T::NAME,
        group
    );
    Ok(out)
}
