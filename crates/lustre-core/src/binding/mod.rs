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

//! Binding tables: slot enumeration, layout description and host-side mirrors.
//!
//! There is exactly one place where a table's fields are listed: a
//! [`binding_table!`](crate::binding_table) invocation. Everything else (the
//! role enum, the `#[repr(C)]` host struct, the slot numbers, the runtime
//! [`BindingTableLayout`] and the WGSL declaration) is derived from that list,
//! so the host and device sides cannot drift apart by hand-renumbering.

mod array;
mod builder;
mod layout;
mod slot;
mod table;

pub use array::{BindingTableArray, TableIndex};
pub use builder::{BindingTableBuilder, Placeholders};
pub use layout::{
    BindingModel, BindingTableLayout, BindingTableLayoutBuilder, FieldKind, FieldLayout,
};
pub use slot::{BindingSlot, SlotAllocator};
pub use table::{handle_block_padding, BindingTable, HostField, TextureRole};
