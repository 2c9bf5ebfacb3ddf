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

//! Device-side declarations of host records.

pub mod wgsl;

use std::fmt;

use crate::binding::HostField;

/// One member of a WGSL struct declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WgslMember {
    /// Member name, identical to the host field name.
    pub name: &'static str,
    /// WGSL type of the member.
    pub ty: &'static str,
}

impl WgslMember {
    /// A member named `name` of WGSL type `ty`.
    pub const fn new(name: &'static str, ty: &'static str) -> Self {
        Self { name, ty }
    }
}

/// A plain-old-data record with a matching WGSL struct.
///
/// The member list must name the host fields in declaration order, leaving out
/// host-only padding. Host padding has to reproduce WGSL's alignment rules so
/// [`host_fields`](Self::host_fields) offsets equal the device offsets.
pub trait GpuStruct: bytemuck::Pod + fmt::Debug + PartialEq {
    /// Struct name in WGSL.
    const WGSL_NAME: &'static str;

    /// WGSL members, in declaration order.
    fn wgsl_members() -> &'static [WgslMember];

    /// Byte offset and size of every named host field.
    fn host_fields() -> Vec<HostField>;
}
