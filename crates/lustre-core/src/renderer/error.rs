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

//! Errors raised while describing, verifying or populating binding tables.
//!
//! None of these happen while a shader reads a table. They are
//! construction-time contract violations, reported so development builds can
//! fail fast before anything is bound.

use std::fmt;

use crate::binding::{BindingModel, BindingSlot};
use crate::renderer::api::texture::TextureHandle;

/// The layout of a binding table is malformed, or the host and device views of it disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The table declares no texture fields.
    EmptyTextureBlock,
    /// The table declares no constants record.
    MissingConstants,
    /// A field was declared after the constants record.
    ConstantsNotLast {
        /// The field that follows the constants record.
        field: String,
    },
    /// Two fields share a name.
    DuplicateField {
        /// The repeated name.
        name: String,
    },
    /// The constants record has a size of zero bytes.
    ZeroSizedConstants {
        /// The name of the constants field.
        name: String,
    },
    /// A field does not sit on the slot that follows its predecessor.
    NonContiguousSlot {
        /// The offending field.
        field: String,
        /// The slot implied by declaration order.
        expected: BindingSlot,
        /// The slot actually recorded.
        found: BindingSlot,
    },
    /// The constants slot is not one past the last texture slot.
    DerivedSlotMismatch {
        /// `last texture slot + 1`.
        expected: BindingSlot,
        /// The slot actually recorded.
        found: BindingSlot,
    },
    /// A field would be bound past the last representable slot.
    SlotOverflow {
        /// The first field without a slot.
        field: String,
    },
    /// A field name was looked up that the layout does not declare.
    UnknownField {
        /// The requested name.
        name: String,
    },
    /// The device-side shader source could not be parsed.
    ShaderParse(String),
    /// The device-side shader lacks a declaration the layout requires.
    MissingDeclaration {
        /// Name of the missing struct, member or global.
        name: String,
    },
    /// A device struct member is not the one the host declares at that position.
    FieldOrder {
        /// The struct being compared.
        owner: String,
        /// Zero-based member position.
        position: usize,
        /// Host field name at that position.
        expected: String,
        /// Device member name at that position.
        found: String,
    },
    /// A field starts at a different byte offset on host and device.
    FieldOffset {
        /// The offending field.
        field: String,
        /// Host byte offset.
        host: u32,
        /// Device byte offset.
        device: u32,
    },
    /// A field spans a different number of bytes on host and device.
    FieldSize {
        /// The offending field.
        field: String,
        /// Host size in bytes.
        host: u32,
        /// Device size in bytes.
        device: u32,
    },
    /// A field has a different WGSL type on the device than the host declares.
    FieldType {
        /// The offending field.
        field: String,
        /// Type declared by the host, in WGSL spelling.
        expected: String,
        /// Type found on the device, in WGSL spelling.
        found: String,
    },
    /// A struct has a different total size on host and device.
    StructSize {
        /// The struct being compared.
        name: String,
        /// Host size in bytes.
        host: u32,
        /// Device size in bytes.
        device: u32,
    },
    /// A device global is bound at a different `(group, binding)` than the layout assigns.
    SlotMismatch {
        /// The offending field.
        field: String,
        /// `(group, binding)` derived from the layout.
        expected: (u32, u32),
        /// `(group, binding)` found in the shader, if any.
        found: Option<(u32, u32)>,
    },
    /// A device global has the wrong kind of resource for its field.
    WrongResourceKind {
        /// The offending field.
        field: String,
        /// What the layout requires, in WGSL spelling.
        expected: &'static str,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutError::EmptyTextureBlock => write!(f, "Binding table declares no texture fields"),
            LayoutError::MissingConstants => {
                write!(f, "Binding table declares no constants record")
            }
            LayoutError::ConstantsNotLast { field } => {
                write!(f, "Field '{field}' is declared after the constants record")
            }
            LayoutError::DuplicateField { name } => {
                write!(f, "Field '{name}' is declared more than once")
            }
            LayoutError::ZeroSizedConstants { name } => {
                write!(f, "Constants record '{name}' has a size of zero bytes")
            }
            LayoutError::NonContiguousSlot {
                field,
                expected,
                found,
            } => write!(
                f,
                "Field '{field}' is bound at slot {found}, expected slot {expected}"
            ),
            LayoutError::DerivedSlotMismatch { expected, found } => write!(
                f,
                "Constants record is bound at slot {found}, \
                 expected one past the last texture ({expected})"
            ),
            LayoutError::SlotOverflow { field } => {
                write!(f, "Field '{field}' would be bound past slot {}", u32::MAX)
            }
            LayoutError::UnknownField { name } => {
                write!(f, "Layout declares no field named '{name}'")
            }
            LayoutError::ShaderParse(details) => {
                write!(f, "Failed to parse device-side declaration: {details}")
            }
            LayoutError::MissingDeclaration { name } => {
                write!(f, "Device-side declaration '{name}' not found")
            }
            LayoutError::FieldOrder {
                owner,
                position,
                expected,
                found,
            } => write!(
                f,
                "Member {position} of '{owner}' is '{found}' on the device, \
                 '{expected}' on the host"
            ),
            LayoutError::FieldOffset {
                field,
                host,
                device,
            } => write!(
                f,
                "Field '{field}' is at byte {device} on the device, byte {host} on the host"
            ),
            LayoutError::FieldSize {
                field,
                host,
                device,
            } => write!(
                f,
                "Field '{field}' is {device} bytes on the device, {host} bytes on the host"
            ),
            LayoutError::FieldType {
                field,
                expected,
                found,
            } => write!(
                f,
                "Field '{field}' is '{found}' on the device, '{expected}' on the host"
            ),
            LayoutError::StructSize { name, host, device } => write!(
                f,
                "Struct '{name}' is {device} bytes on the device, {host} bytes on the host"
            ),
            LayoutError::SlotMismatch {
                field,
                expected,
                found,
            } => match found {
                Some((group, binding)) => write!(
                    f,
                    "Field '{field}' is bound at @group({group}) @binding({binding}), \
                     expected @group({}) @binding({})",
                    expected.0, expected.1
                ),
                None => write!(
                    f,
                    "Field '{field}' has no binding, expected @group({}) @binding({})",
                    expected.0, expected.1
                ),
            },
            LayoutError::WrongResourceKind { field, expected } => {
                write!(f, "Field '{field}' must be declared as {expected}")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// A binding table could not be populated or handed to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// A texture role was never given a handle and no placeholder was supplied.
    UnboundTexture {
        /// The field left unbound.
        field: &'static str,
    },
    /// A handle does not resolve to a texture in the pool.
    UnknownTexture {
        /// The field holding the handle.
        field: String,
        /// The unresolved handle.
        handle: TextureHandle,
    },
    /// A table index is past the end of a table array.
    TableIndexOutOfRange {
        /// The requested index.
        index: u32,
        /// Number of tables in the array.
        len: usize,
    },
    /// More tables were uploaded than the GPU allocation holds.
    CapacityExceeded {
        /// Tables to upload.
        required: usize,
        /// Tables the allocation holds.
        capacity: usize,
    },
    /// An argument buffer was requested with room for no tables.
    ZeroCapacity,
    /// An operation needs a bind group layout built for another binding model.
    WrongBindingModel {
        /// The model the operation needs.
        expected: BindingModel,
        /// The model the layout was built for.
        found: BindingModel,
    },
    /// Tables of a different type were uploaded into an argument buffer.
    StrideMismatch {
        /// Stride the buffer was created for.
        expected: usize,
        /// Stride of the uploaded tables.
        found: usize,
    },
    /// The table's layout is malformed.
    Layout(LayoutError),
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::UnboundTexture { field } => {
                write!(f, "Texture field '{field}' has no handle and no placeholder")
            }
            BindingError::UnknownTexture { field, handle } => {
                write!(f, "Texture field '{field}' refers to unknown {handle}")
            }
            BindingError::TableIndexOutOfRange { index, len } => {
                write!(f, "Table index {index} is out of range for {len} tables")
            }
            BindingError::CapacityExceeded { required, capacity } => write!(
                f,
                "{required} tables do not fit in an argument buffer of {capacity}"
            ),
            BindingError::ZeroCapacity => {
                write!(f, "Argument buffer capacity must be at least one table")
            }
            BindingError::WrongBindingModel { expected, found } => write!(
                f,
                "Operation requires the {expected:?} binding model, layout uses {found:?}"
            ),
            BindingError::StrideMismatch { expected, found } => write!(
                f,
                "Argument buffer stride is {expected} bytes, tables are {found} bytes"
            ),
            BindingError::Layout(err) => write!(f, "Binding table layout error: {err}"),
        }
    }
}

impl std::error::Error for BindingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BindingError::Layout(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LayoutError> for BindingError {
    fn from(err: LayoutError) -> Self {
        BindingError::Layout(err)
    }
}
