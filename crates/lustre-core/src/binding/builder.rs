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

//! Populating a binding table so that no slot is left unbound.

use std::marker::PhantomData;

use super::table::{BindingTable, TextureRole};
use crate::renderer::api::texture::TextureHandle;
use crate::renderer::error::BindingError;

/// Default handles, one per texture role, supplied by the resource manager.
///
/// A role without a real texture is bound to its placeholder (typically a 1x1
/// image whose texel is neutral for that role); the slot itself is never
/// removed.
#[derive(Debug, Clone)]
pub struct Placeholders<T: BindingTable> {
    handles: Vec<TextureHandle>,
    _table: PhantomData<fn() -> T>,
}

impl<T: BindingTable> Placeholders<T> {
    /// Uses the same placeholder for every role.
    pub fn uniform(handle: TextureHandle) -> Self {
        Self {
            handles: vec![handle; <T::Role as TextureRole>::ALL.len()],
            _table: PhantomData,
        }
    }

    /// Overrides the placeholder for one role.
    pub fn with(mut self, role: T::Role, handle: TextureHandle) -> Self {
        self.handles[role.offset() as usize] = handle;
        self
    }

    /// The placeholder for `role`.
    pub fn get(&self, role: T::Role) -> TextureHandle {
        self.handles[role.offset() as usize]
    }
}

/// Fills a binding table role by role.
///
/// ```
/// use lustre_core::binding::{BindingTable, BindingTableBuilder, Placeholders};
/// use lustre_core::material::{Material, MaterialBindingTable, MaterialTextureRole};
/// use lustre_core::TextureHandle;
///
/// let white = TextureHandle::new(0);
/// let table: MaterialBindingTable = BindingTableBuilder::new(Material::default())
///     .texture(MaterialTextureRole::BaseColor, TextureHandle::new(10))
///     .build_with(&Placeholders::uniform(white));
///
/// assert_eq!(table.texture(MaterialTextureRole::BaseColor), TextureHandle::new(10));
/// assert_eq!(table.texture(MaterialTextureRole::Opacity), white);
/// ```
#[derive(Debug, Clone)]
pub struct BindingTableBuilder<T: BindingTable> {
    textures: Vec<Option<TextureHandle>>,
    constants: T::Constants,
}

impl<T: BindingTable> BindingTableBuilder<T> {
    /// Starts a table around a populated constants record.
    pub fn new(constants: T::Constants) -> Self {
        Self {
            textures: vec![None; <T::Role as TextureRole>::ALL.len()],
            constants,
        }
    }

    /// Binds `handle` for `role`, replacing any previous handle.
    pub fn texture(mut self, role: T::Role, handle: TextureHandle) -> Self {
        self.textures[role.offset() as usize] = Some(handle);
        self
    }

    /// Replaces the constants record.
    pub fn constants(mut self, constants: T::Constants) -> Self {
        self.constants = constants;
        self
    }

    /// Builds the table, failing on the first role left unbound.
    pub fn try_build(self) -> Result<T, BindingError> {
        let mut table = <T as bytemuck::Zeroable>::zeroed();
        for role in <T::Role as TextureRole>::ALL {
            let handle = self.textures[role.offset() as usize].ok_or(
                BindingError::UnboundTexture {
                    field: role.field_name(),
                },
            )?;
            table.set_texture(*role, handle);
        }
        table.set_constants(self.constants);
        Ok(table)
    }

    /// Builds the table, binding each unset role to its placeholder.
    pub fn build_with(self, placeholders: &Placeholders<T>) -> T {
        let mut table = <T as bytemuck::Zeroable>::zeroed();
        for role in <T::Role as TextureRole>::ALL {
            let handle = match self.textures[role.offset() as usize] {
                Some(handle) => handle,
                None => {
                    let placeholder = placeholders.get(*role);
                    log::debug!(
                        "{}: no texture for '{}', binding placeholder {}",
                        T::NAME,
                        role.field_name(),
                        placeholder
                    );
                    placeholder
                }
            };
            table.set_texture(*role, handle);
        }
        table.set_constants(self.constants);
        table
    }
}
