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

//! Device-side layout verification.
//!
//! A WGSL module is parsed with `naga` and its binding table declarations are
//! compared with the host mirror: member order, byte offsets, member sizes and
//! types, struct sizes and `@group`/`@binding` attributes. Any difference is a
//! [`LayoutError`].

use naga::{
    AddressSpace, ArraySize, ImageClass, ImageDimension, ScalarKind, StorageAccess, TypeInner,
};

use lustre_core::binding::{BindingModel, BindingTable, FieldKind, HostField, TextureRole};
use lustre_core::shader::wgsl::{ARGUMENT_BUFFER_GLOBAL, HANDLE_TYPE};
use lustre_core::shader::GpuStruct;
use lustre_core::{LayoutError, MaterialBindingConfig};

const UNSUPPORTED_TYPE: &str = "<unsupported>";

/// One member of a reflected struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedMember {
    /// Member name.
    pub name: String,
    /// Byte offset assigned by WGSL layout rules.
    pub offset: u32,
    /// Size in bytes.
    pub size: u32,
    /// Member type in WGSL spelling (`f32`, `vec3<f32>`, a struct name, ...).
    pub ty: String,
}

/// A struct declared in a shader module, with device offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedStruct {
    /// Struct name.
    pub name: String,
    /// Members in declaration order.
    pub members: Vec<ReflectedMember>,
    /// Total size in bytes, including trailing padding.
    pub size: u32,
}

impl ReflectedStruct {
    /// Looks a member up by name.
    pub fn member(&self, name: &str) -> Option<&ReflectedMember> {
        self.members.iter().find(|member| member.name == name)
    }

    /// The bytes of member `name` inside `bytes`, located by device offset.
    pub fn slice<'a>(&self, bytes: &'a [u8], name: &str) -> Option<&'a [u8]> {
        let member = self.member(name)?;
        let start = member.offset as usize;
        bytes.get(start..start + member.size as usize)
    }

    /// Reads member `name` of host-written `bytes` as a `u32`.
    pub fn read_u32(&self, bytes: &[u8], name: &str) -> Option<u32> {
        self.read_word(bytes, name).map(u32::from_ne_bytes)
    }

    /// Reads member `name` of host-written `bytes` as an `f32`.
    pub fn read_f32(&self, bytes: &[u8], name: &str) -> Option<f32> {
        self.read_word(bytes, name).map(f32::from_ne_bytes)
    }

    fn read_word(&self, bytes: &[u8], name: &str) -> Option<[u8; 4]> {
        let start = self.member(name)?.offset as usize;
        bytes.get(start..start + 4)?.try_into().ok()
    }
}

/// What a reflected global holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalKind {
    /// A single-sampled `texture_2d<f32>`.
    Texture2d,
    /// A uniform buffer.
    Uniform {
        /// Name of the uniform's struct type.
        type_name: Option<String>,
    },
    /// A runtime-sized storage array.
    StorageArray {
        /// Whether the shader cannot write the array.
        read_only: bool,
        /// Name of the element struct.
        element: Option<String>,
    },
    /// Anything else.
    Other,
}

/// A module-scope variable declared in a shader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedGlobal {
    /// Variable name.
    pub name: String,
    /// `(group, binding)`, if the variable has a resource binding.
    pub binding: Option<(u32, u32)>,
    /// What the variable holds.
    pub kind: GlobalKind,
}

/// A parsed shader module, queried for binding table declarations.
#[derive(Debug)]
pub struct ShaderReflection {
    module: naga::Module,
}

impl ShaderReflection {
    /// Parses WGSL source.
    pub fn from_wgsl(source: &str) -> Result<Self, LayoutError> {
        let module = naga::front::wgsl::parse_str(source)
            .map_err(|e| LayoutError::ShaderParse(e.emit_to_string(source)))?;
        Ok(Self { module })
    }

    /// The struct declared as `name`.
    pub fn struct_named(&self, name: &str) -> Option<ReflectedStruct> {
        self.module.types.iter().find_map(|(_, ty)| {
            if ty.name.as_deref() != Some(name) {
                return None;
            }
            match &ty.inner {
                TypeInner::Struct { members, span } => Some(ReflectedStruct {
                    name: name.to_string(),
                    members: members
                        .iter()
                        .map(|member| ReflectedMember {
                            name: member.name.clone().unwrap_or_default(),
                            offset: member.offset,
                            size: self.module.types[member.ty]
                                .inner
                                .size(self.module.to_ctx()),
                            ty: self.type_spelling(member.ty),
                        })
                        .collect(),
                    size: *span,
                }),
                _ => None,
            }
        })
    }

    /// The module-scope variable declared as `name`.
    pub fn global(&self, name: &str) -> Option<ReflectedGlobal> {
        self.module.global_variables.iter().find_map(|(_, var)| {
            (var.name.as_deref() == Some(name)).then(|| ReflectedGlobal {
                name: name.to_string(),
                binding: var.binding.as_ref().map(|b| (b.group, b.binding)),
                kind: self.global_kind(var),
            })
        })
    }

    /// Checks the module's declaration of table `T` against the host mirror.
    pub fn verify<T: BindingTable>(
        &self,
        config: &MaterialBindingConfig,
    ) -> Result<(), LayoutError> {
        let constants = self.require_struct(<T::Constants as GpuStruct>::WGSL_NAME)?;
        let member_types: Vec<&str> = <T::Constants as GpuStruct>::wgsl_members()
            .iter()
            .map(|member| member.ty)
            .collect();
        compare_struct(
            &constants,
            &<T::Constants as GpuStruct>::host_fields(),
            &member_types,
            std::mem::size_of::<T::Constants>(),
        )?;

        match config.binding_model {
            BindingModel::Discrete => self.verify_discrete::<T>(config)?,
            BindingModel::ArgumentBuffer => self.verify_argument_buffer::<T>(config)?,
        }
        log::debug!(
            "Device declaration of {} matches the host layout ({:?}, group {}, base slot {})",
            T::NAME,
            config.binding_model,
            config.group,
            config.base_slot
        );
        Ok(())
    }

    fn verify_discrete<T: BindingTable>(
        &self,
        config: &MaterialBindingConfig,
    ) -> Result<(), LayoutError> {
        const CONSTANTS_UNIFORM: &str = "a uniform of the constants struct";

        let layout = T::layout(config.base_slot)?;
        for field in layout.fields() {
            let global = self.require_global(&field.name)?;
            check_binding(&global, (config.group, field.slot.index()))?;

            let (matches, expected) = match (&field.kind, &global.kind) {
                (FieldKind::Texture2d, kind) => {
                    (*kind == GlobalKind::Texture2d, "texture_2d<f32>")
                }
                (
                    FieldKind::Constants { type_name, .. },
                    GlobalKind::Uniform { type_name: found },
                ) => (found.as_deref() == Some(type_name.as_str()), CONSTANTS_UNIFORM),
                (FieldKind::Constants { .. }, _) => (false, CONSTANTS_UNIFORM),
            };
            if !matches {
                return Err(LayoutError::WrongResourceKind {
                    field: field.name.clone(),
                    expected,
                });
            }
        }
        Ok(())
    }

    fn verify_argument_buffer<T: BindingTable>(
        &self,
        config: &MaterialBindingConfig,
    ) -> Result<(), LayoutError> {
        let global = self.require_global(ARGUMENT_BUFFER_GLOBAL)?;
        check_binding(&global, (config.group, config.base_slot))?;
        let element_matches = matches!(
            &global.kind,
            GlobalKind::StorageArray {
                read_only: true,
                element: Some(element),
            } if element == T::NAME
        );
        if !element_matches {
            return Err(LayoutError::WrongResourceKind {
                field: ARGUMENT_BUFFER_GLOBAL.to_string(),
                expected: "var<storage, read> array of binding table records",
            });
        }

        // Handles first, then the embedded constants record.
        let member_types: Vec<&str> = <T::Role as TextureRole>::ALL
            .iter()
            .map(|_| HANDLE_TYPE)
            .chain(std::iter::once(<T::Constants as GpuStruct>::WGSL_NAME))
            .collect();
        let record = self.require_struct(T::NAME)?;
        compare_struct(
            &record,
            &T::host_fields(),
            &member_types,
            std::mem::size_of::<T>(),
        )
    }

    fn require_struct(&self, name: &str) -> Result<ReflectedStruct, LayoutError> {
        self.struct_named(name)
            .ok_or_else(|| LayoutError::MissingDeclaration {
                name: name.to_string(),
            })
    }

    fn require_global(&self, name: &str) -> Result<ReflectedGlobal, LayoutError> {
        self.global(name).ok_or_else(|| LayoutError::MissingDeclaration {
            name: name.to_string(),
        })
    }

    fn type_spelling(&self, handle: naga::Handle<naga::Type>) -> String {
        let ty = &self.module.types[handle];
        match &ty.inner {
            TypeInner::Scalar(scalar) => scalar_spelling(*scalar).to_string(),
            TypeInner::Vector { size, scalar } => {
                format!("vec{}<{}>", *size as u8, scalar_spelling(*scalar))
            }
            _ => ty
                .name
                .clone()
                .unwrap_or_else(|| UNSUPPORTED_TYPE.to_string()),
        }
    }

    fn global_kind(&self, var: &naga::GlobalVariable) -> GlobalKind {
        let ty = &self.module.types[var.ty];
        match (var.space, &ty.inner) {
            (
                AddressSpace::Handle,
                TypeInner::Image {
                    dim: ImageDimension::D2,
                    arrayed: false,
                    class:
                        ImageClass::Sampled {
                            kind: ScalarKind::Float,
                            multi: false,
                        },
                },
            ) => GlobalKind::Texture2d,
            (AddressSpace::Uniform, _) => GlobalKind::Uniform {
                type_name: ty.name.clone(),
            },
            (
                AddressSpace::Storage { access },
                TypeInner::Array {
                    base,
                    size: ArraySize::Dynamic,
                    ..
                },
            ) => GlobalKind::StorageArray {
                read_only: !access.contains(StorageAccess::STORE),
                element: self.module.types[*base].name.clone(),
            },
            _ => GlobalKind::Other,
        }
    }
}

fn scalar_spelling(scalar: naga::Scalar) -> &'static str {
    match (scalar.kind, scalar.width) {
        (ScalarKind::Float, 4) => "f32",
        (ScalarKind::Float, 2) => "f16",
        (ScalarKind::Uint, 4) => "u32",
        (ScalarKind::Sint, 4) => "i32",
        (ScalarKind::Bool, _) => "bool",
        _ => UNSUPPORTED_TYPE,
    }
}

/// Parses `source` and verifies its declaration of table `T`.
pub fn verify_wgsl<T: BindingTable>(
    source: &str,
    config: &MaterialBindingConfig,
) -> Result<ShaderReflection, LayoutError> {
    let reflection = ShaderReflection::from_wgsl(source)?;
    reflection.verify::<T>(config)?;
    Ok(reflection)
}

fn check_binding(global: &ReflectedGlobal, expected: (u32, u32)) -> Result<(), LayoutError> {
    if global.binding == Some(expected) {
        Ok(())
    } else {
        Err(LayoutError::SlotMismatch {
            field: global.name.clone(),
            expected,
            found: global.binding,
        })
    }
}

/// Compares `device` member by member with `host`, whose WGSL member types
/// are `types` in the same order.
fn compare_struct(
    device: &ReflectedStruct,
    host: &[HostField],
    types: &[&str],
    host_size: usize,
) -> Result<(), LayoutError> {
    for (position, (field, ty)) in host.iter().zip(types).enumerate() {
        let member = device
            .members
            .get(position)
            .ok_or_else(|| LayoutError::MissingDeclaration {
                name: format!("{}.{}", device.name, field.name),
            })?;
        if member.name != field.name {
            return Err(LayoutError::FieldOrder {
                owner: device.name.clone(),
                position,
                expected: field.name.to_string(),
                found: member.name.clone(),
            });
        }
        if member.offset != field.offset {
            return Err(LayoutError::FieldOffset {
                field: format!("{}.{}", device.name, field.name),
                host: field.offset,
                device: member.offset,
            });
        }
        if member.size != field.size {
            return Err(LayoutError::FieldSize {
                field: format!("{}.{}", device.name, field.name),
                host: field.size,
                device: member.size,
            });
        }
        if member.ty != *ty {
            return Err(LayoutError::FieldType {
                field: format!("{}.{}", device.name, field.name),
                expected: ty.to_string(),
                found: member.ty.clone(),
            });
        }
    }
    if let Some(extra) = device.members.get(host.len()) {
        return Err(LayoutError::FieldOrder {
            owner: device.name.clone(),
            position: host.len(),
            expected: "<end of struct>".to_string(),
            found: extra.name.clone(),
        });
    }
    if device.size as usize != host_size {
        return Err(LayoutError::StructSize {
            name: device.name.clone(),
            host: host_size as u32,
            device: device.size,
        });
    }
    Ok(())
}
