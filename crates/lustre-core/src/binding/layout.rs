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

//! Runtime description of a binding table's fields and slots.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::slot::{BindingSlot, SlotAllocator};
use crate::renderer::api::bind_group::BindGroupLayoutEntry;
use crate::renderer::api::util::flags::ShaderStageFlags;
use crate::renderer::error::LayoutError;

/// How a binding table is presented to the shading stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingModel {
    /// Every field is its own binding: textures at `base + i`, the constants
    /// record as a uniform buffer at the derived slot.
    #[default]
    Discrete,
    /// The whole table is one record in a storage buffer bound at the base
    /// slot. Texture fields hold handles; slots are member ids in the record.
    ArgumentBuffer,
}

/// What a field of a binding table holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A 2D image handle.
    Texture2d,
    /// The embedded constants record.
    Constants {
        /// Device-side struct name of the record.
        type_name: String,
        /// Size of the record in bytes.
        size: u32,
    },
}

/// One field of a binding table and the slot it occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    /// Field name, shared by the host struct and the device declaration.
    pub name: String,
    /// What the field holds.
    pub kind: FieldKind,
    /// The slot the field is bound at.
    pub slot: BindingSlot,
}

impl FieldLayout {
    /// Whether the field is a texture.
    pub fn is_texture(&self) -> bool {
        matches!(self.kind, FieldKind::Texture2d)
    }
}

/// The ordered fields of a binding table with their slots.
///
/// A validated layout always has at least one texture field, followed by
/// exactly one constants field; slots run from the base without gaps, so the
/// constants slot is `last texture slot + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingTableLayout {
    label: Option<String>,
    base: BindingSlot,
    fields: Vec<FieldLayout>,
    record_size: Option<u32>,
}

impl BindingTableLayout {
    /// Starts a layout whose first field is bound at `base`.
    pub fn builder(base: u32) -> BindingTableLayoutBuilder {
        BindingTableLayoutBuilder {
            label: None,
            slots: SlotAllocator::new(base),
            fields: Vec::new(),
            record_size: None,
            overflow: None,
        }
    }

    /// Assembles a layout from fields whose slots were recorded elsewhere
    /// (a serialized pipeline description, a reflected shader, ...).
    ///
    /// Unlike the builder, the slots are taken as given and checked.
    pub fn from_fields(
        label: Option<String>,
        base: u32,
        fields: Vec<FieldLayout>,
    ) -> Result<Self, LayoutError> {
        let layout = Self {
            label,
            base: BindingSlot(base),
            fields,
            record_size: None,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Checks the structural rules and the slot derivation rule.
    pub fn validate(&self) -> Result<(), LayoutError> {
        check_structure(&self.fields)?;

        let mut expected = Some(self.base);
        let mut seen_texture = false;
        for field in &self.fields {
            let Some(slot) = expected else {
                return Err(LayoutError::SlotOverflow {
                    field: field.name.clone(),
                });
            };
            if field.slot != slot {
                return Err(match &field.kind {
                    FieldKind::Constants { .. } if seen_texture => {
                        LayoutError::DerivedSlotMismatch {
                            expected: slot,
                            found: field.slot,
                        }
                    }
                    _ => LayoutError::NonContiguousSlot {
                        field: field.name.clone(),
                        expected: slot,
                        found: field.slot,
                    },
                });
            }
            seen_texture |= field.is_texture();
            expected = slot.next();
        }
        Ok(())
    }

    /// Debug label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Slot of the first field.
    pub fn base(&self) -> BindingSlot {
        self.base
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[FieldLayout] {
        &self.fields
    }

    /// Looks a field up by name.
    pub fn field(&self, name: &str) -> Result<&FieldLayout, LayoutError> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .ok_or_else(|| LayoutError::UnknownField {
                name: name.to_string(),
            })
    }

    /// Slot of the named field.
    pub fn slot_of(&self, name: &str) -> Option<BindingSlot> {
        self.field(name).ok().map(|field| field.slot)
    }

    /// The texture fields, in slot order.
    pub fn texture_fields(&self) -> impl Iterator<Item = &FieldLayout> + '_ {
        self.fields.iter().filter(|field| field.is_texture())
    }

    /// Number of texture fields.
    pub fn texture_count(&self) -> u32 {
        self.texture_fields().count() as u32
    }

    /// The constants field, which a validated layout places last.
    pub fn constants_field(&self) -> Option<&FieldLayout> {
        self.fields
            .last()
            .filter(|field| matches!(field.kind, FieldKind::Constants { .. }))
    }

    /// Slot of the constants record.
    pub fn constants_slot(&self) -> Option<BindingSlot> {
        self.constants_field().map(|field| field.slot)
    }

    /// Byte size of one host record, when the layout was built from a host type.
    pub fn record_size(&self) -> Option<u32> {
        self.record_size
    }

    /// The backend-agnostic bind group layout entries for this table.
    pub fn bind_group_layout_entries(
        &self,
        model: BindingModel,
        visibility: ShaderStageFlags,
    ) -> Vec<BindGroupLayoutEntry> {
        match model {
            BindingModel::Discrete => self
                .fields
                .iter()
                .map(|field| match &field.kind {
                    FieldKind::Texture2d => {
                        BindGroupLayoutEntry::texture_2d(field.slot.index(), visibility)
                    }
                    FieldKind::Constants { size, .. } => BindGroupLayoutEntry::uniform(
                        field.slot.index(),
                        visibility,
                        u64::from(*size),
                    ),
                })
                .collect(),
            BindingModel::ArgumentBuffer => vec![BindGroupLayoutEntry::storage_read_only(
                self.base.index(),
                visibility,
                u64::from(self.record_size.unwrap_or(0)),
            )],
        }
    }
}

/// Builds a [`BindingTableLayout`], assigning slots in declaration order.
#[derive(Debug, Clone)]
pub struct BindingTableLayoutBuilder {
    label: Option<String>,
    slots: SlotAllocator,
    fields: Vec<FieldLayout>,
    record_size: Option<u32>,
    // First field that found no slot left.
    overflow: Option<String>,
}

impl BindingTableLayoutBuilder {
    /// Appends a 2D texture field on the next slot.
    pub fn texture(mut self, name: impl Into<String>) -> Self {
        self.push(name.into(), FieldKind::Texture2d);
        self
    }

    /// Appends the constants record on the next slot.
    pub fn constants(
        mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        size: u32,
    ) -> Self {
        let kind = FieldKind::Constants {
            type_name: type_name.into(),
            size,
        };
        self.push(name.into(), kind);
        self
    }

    /// Sets a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Records the byte size of one host record (argument-buffer element).
    pub fn with_record_size(mut self, size: u32) -> Self {
        self.record_size = Some(size);
        self
    }

    /// Finishes the layout.
    ///
    /// Fails with [`LayoutError::SlotOverflow`] when the base slot leaves no
    /// room for every field.
    pub fn build(self) -> Result<BindingTableLayout, LayoutError> {
        if let Some(field) = self.overflow {
            return Err(LayoutError::SlotOverflow { field });
        }
        let layout = BindingTableLayout {
            label: self.label,
            base: self.slots.base(),
            fields: self.fields,
            record_size: self.record_size,
        };
        layout.validate()?;
        if let Some(constants_slot) = layout.constants_slot() {
            log::debug!(
                "Built binding table layout '{}': {} textures at slots {}..{}, \
                 constants at slot {}",
                layout.label().unwrap_or("unnamed"),
                layout.texture_count(),
                layout.base(),
                constants_slot,
                constants_slot,
            );
        }
        Ok(layout)
    }

    fn push(&mut self, name: String, kind: FieldKind) {
        match self.slots.allocate() {
            Some(slot) => self.fields.push(FieldLayout { name, kind, slot }),
            None => {
                self.overflow.get_or_insert(name);
            }
        }
    }
}

fn check_structure(fields: &[FieldLayout]) -> Result<(), LayoutError> {
    let mut names = HashSet::new();
    let mut constants_seen = false;
    for field in fields {
        if !names.insert(field.name.as_str()) {
            return Err(LayoutError::DuplicateField {
                name: field.name.clone(),
            });
        }
        if constants_seen {
            return Err(LayoutError::ConstantsNotLast {
                field: field.name.clone(),
            });
        }
        if let FieldKind::Constants { size, .. } = &field.kind {
            if *size == 0 {
                return Err(LayoutError::ZeroSizedConstants {
                    name: field.name.clone(),
                });
            }
            constants_seen = true;
        }
    }

    if !fields.iter().any(FieldLayout::is_texture) {
        return Err(LayoutError::EmptyTextureBlock);
    }
    if !constants_seen {
        return Err(LayoutError::MissingConstants);
    }
    Ok(())
}
