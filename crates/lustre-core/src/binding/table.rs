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

//! Host-side binding table mirrors and the macro that declares them.

use std::fmt;

use super::layout::BindingTableLayout;
use crate::renderer::api::texture::TextureHandle;
use crate::renderer::error::LayoutError;
use crate::shader::GpuStruct;

/// Texture handles packed per 16-byte block of a host record.
const HANDLES_PER_BLOCK: u32 = (16 / std::mem::size_of::<TextureHandle>()) as u32;

/// Number of `u32` padding words after `texture_count` handles so the
/// constants record that follows starts on a 16-byte boundary, where WGSL
/// places a struct containing `vec3`/`vec4` members.
pub const fn handle_block_padding(texture_count: u32) -> usize {
    ((HANDLES_PER_BLOCK - texture_count % HANDLES_PER_BLOCK) % HANDLES_PER_BLOCK) as usize
}

/// Where a named field lives inside a host struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostField {
    /// Field name, identical to the device-side member name.
    pub name: &'static str,
    /// Byte offset from the start of the struct.
    pub offset: u32,
    /// Size in bytes.
    pub size: u32,
}

impl HostField {
    /// Records a field from `offset_of!` / `size_of` results.
    pub const fn new(name: &'static str, offset: usize, size: usize) -> Self {
        Self {
            name,
            offset: offset as u32,
            size: size as u32,
        }
    }
}

/// One texture role of a binding table. Implemented by the role enum that
/// [`binding_table!`](crate::binding_table) generates.
pub trait TextureRole: Copy + Eq + fmt::Debug + 'static {
    /// Every role, in slot order.
    const ALL: &'static [Self];

    /// Slot of this role relative to the table's base slot.
    fn offset(self) -> u32;

    /// Name of the host field and device member holding this role.
    fn field_name(self) -> &'static str;
}

/// A `#[repr(C)]` host-side mirror of a binding table.
///
/// The mirror is plain old data: writing it byte-for-byte into GPU-visible
/// memory yields the record the shading stage reads. It holds texture handles
/// by value and owns none of the textures.
pub trait BindingTable: bytemuck::Pod + fmt::Debug + PartialEq {
    /// The texture roles, one per texture field.
    type Role: TextureRole;
    /// The embedded constants record.
    type Constants: GpuStruct;

    /// Struct name shared by the host type and the device declaration.
    const NAME: &'static str;
    /// Name of the constants field.
    const CONSTANTS_FIELD: &'static str;
    /// Slot of the constants record relative to the base: last texture + 1.
    const CONSTANTS_OFFSET: u32;

    /// The handle bound for `role`.
    fn texture(&self, role: Self::Role) -> TextureHandle;

    /// Binds `handle` for `role`.
    fn set_texture(&mut self, role: Self::Role, handle: TextureHandle);

    /// The embedded constants record.
    fn constants(&self) -> &Self::Constants;

    /// Replaces the embedded constants record.
    fn set_constants(&mut self, constants: Self::Constants);

    /// Byte offset and size of every named field, in declaration order.
    /// Padding is not listed.
    fn host_fields() -> Vec<HostField>;

    /// All bound handles, in slot order.
    fn textures(&self) -> Vec<TextureHandle> {
        <Self::Role as TextureRole>::ALL
            .iter()
            .map(|role| self.texture(*role))
            .collect()
    }

    /// The runtime layout of this table with its first field at `base`.
    fn layout(base: u32) -> Result<BindingTableLayout, LayoutError> {
        <Self::Role as TextureRole>::ALL
            .iter()
            .fold(
                BindingTableLayout::builder(base).with_label(Self::NAME),
                |builder, role| builder.texture(role.field_name()),
            )
            .constants(
                Self::CONSTANTS_FIELD,
                <Self::Constants as GpuStruct>::WGSL_NAME,
                std::mem::size_of::<Self::Constants>() as u32,
            )
            .with_record_size(std::mem::size_of::<Self>() as u32)
            .build()
    }
}

/// Declares a binding table from a single ordered field list.
///
/// The invocation generates:
/// - a `#[repr(u32)]` role enum whose implicit discriminants are the slot
///   offsets of the texture fields,
/// - the `#[repr(C)]` host mirror, with `u32` padding after the handles so the
///   constants record starts on a 16-byte boundary,
/// - a [`BindingTable`] impl whose constants slot is the last role's offset
///   plus one,
/// - compile-time checks that the constants slot equals the texture count and
///   that the record size is a multiple of 16 bytes.
///
/// Adding, removing or reordering a texture line is the only edit needed to
/// change the table; every slot downstream follows.
///
/// The invoking crate must depend on `bytemuck` (for the `Pod` derive).
///
/// ```
/// use lustre_core::binding::BindingTable;
/// use lustre_core::material::Material;
///
/// lustre_core::binding_table! {
///     /// A two-texture decal table.
///     pub struct DecalTable {
///         roles enum DecalRole;
///         textures {
///             albedo_texture => Albedo,
///             mask_texture => Mask,
///         }
///         constants material: Material,
///     }
/// }
///
/// assert_eq!(DecalRole::Mask.offset(), 1);
/// assert_eq!(DecalTable::CONSTANTS_OFFSET, 2);
/// ```
#[macro_export]
macro_rules! binding_table {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(#[$role_meta:meta])*
            roles enum $role:ident;
            textures {
                $( $(#[$tmeta:meta])* $field:ident => $variant:ident ),+ $(,)?
            }
            $(#[$cmeta:meta])*
            constants $cfield:ident: $cty:ty $(,)?
        }
    ) => {
        $(#[$role_meta])*
        #[repr(u32)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $role {
            $( $(#[$tmeta])* $variant, )+
        }

        impl $role {
            /// Every role, in slot order.
            pub const ROLES: &'static [$role] = &[$( $role::$variant, )+];
            /// Number of texture roles.
            pub const COUNT: u32 = Self::ROLES.len() as u32;
            /// The role declared last.
            pub const LAST: $role = Self::ROLES[Self::ROLES.len() - 1];
            /// Field names, in slot order.
            pub const FIELD_NAMES: &'static [&'static str] = &[$( stringify!($field), )+];

            /// Slot of this role relative to the table's base slot.
            pub const fn offset(self) -> u32 {
                self as u32
            }
        }

        impl $crate::binding::TextureRole for $role {
            const ALL: &'static [Self] = $role::ROLES;

            fn offset(self) -> u32 {
                self as u32
            }

            fn field_name(self) -> &'static str {
                $role::FIELD_NAMES[self as usize]
            }
        }

        $(#[$meta])*
        #[repr(C)]
        #[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
        $vis struct $name {
            $( $(#[$tmeta])* pub $field: $crate::renderer::api::texture::TextureHandle, )+
            /// Pads the handle block to a 16-byte boundary.
            pub _padding: [u32; $crate::binding::handle_block_padding($role::COUNT)],
            $(#[$cmeta])*
            pub $cfield: $cty,
        }

        impl $crate::binding::BindingTable for $name {
            type Role = $role;
            type Constants = $cty;

            const NAME: &'static str = stringify!($name);
            const CONSTANTS_FIELD: &'static str = stringify!($cfield);
            const CONSTANTS_OFFSET: u32 = $role::LAST.offset() + 1;

            fn texture(&self, role: $role) -> $crate::renderer::api::texture::TextureHandle {
                match role {
                    $( $role::$variant => self.$field, )+
                }
            }

            fn set_texture(
                &mut self,
                role: $role,
                handle: $crate::renderer::api::texture::TextureHandle,
            ) {
                match role {
                    $( $role::$variant => self.$field = handle, )+
                }
            }

            fn constants(&self) -> &$cty {
                &self.$cfield
            }

            fn set_constants(&mut self, constants: $cty) {
                self.$cfield = constants;
            }

            fn host_fields() -> ::std::vec::Vec<$crate::binding::HostField> {
                ::std::vec![
                    $(
                        $crate::binding::HostField::new(
                            stringify!($field),
                            ::core::mem::offset_of!($name, $field),
                            ::core::mem::size_of::<$crate::renderer::api::texture::TextureHandle>(),
                        ),
                    )+
                    $crate::binding::HostField::new(
                        stringify!($cfield),
                        ::core::mem::offset_of!($name, $cfield),
                        ::core::mem::size_of::<$cty>(),
                    ),
                ]
            }
        }

        const _: () = {
            assert!(
                <$name as $crate::binding::BindingTable>::CONSTANTS_OFFSET == $role::COUNT,
                "constants slot must directly follow the last texture slot"
            );
            assert!(
                ::core::mem::size_of::<$name>() % 16 == 0,
                "binding table record size must be a multiple of 16 bytes"
            );
        };
    };
}
