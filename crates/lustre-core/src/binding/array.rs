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

//! Contiguous arrays of binding tables for GPU-driven batches.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;

use super::table::BindingTable;
use crate::renderer::api::texture::TextureHandle;
use crate::renderer::error::BindingError;

/// Position of a table in a [`BindingTableArray`]; the index a draw uses to
/// find its material record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableIndex(pub u32);

impl fmt::Display for TableIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table#{}", self.0)
    }
}

/// Tables laid out back to back, ready to be copied into one storage buffer.
///
/// Writes are tracked as a single dirty range of tables so an upload only
/// needs to copy what changed since the last [`take_dirty_range`](Self::take_dirty_range).
#[derive(Debug, Clone)]
pub struct BindingTableArray<T: BindingTable> {
    tables: Vec<T>,
    dirty: Option<Range<usize>>,
}

impl<T: BindingTable> Default for BindingTableArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: BindingTable> BindingTableArray<T> {
    /// An empty array.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            dirty: None,
        }
    }

    /// An empty array with room for `capacity` tables.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tables: Vec::with_capacity(capacity),
            dirty: None,
        }
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the array holds no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Appends a table and returns its index.
    pub fn push(&mut self, table: T) -> TableIndex {
        let index = self.tables.len();
        self.tables.push(table);
        self.mark_dirty(index);
        TableIndex(index as u32)
    }

    /// The table at `index`.
    pub fn get(&self, index: TableIndex) -> Option<&T> {
        self.tables.get(index.0 as usize)
    }

    /// Overwrites the table at `index`.
    pub fn replace(&mut self, index: TableIndex, table: T) -> Result<T, BindingError> {
        let len = self.tables.len();
        let slot = self
            .tables
            .get_mut(index.0 as usize)
            .ok_or(BindingError::TableIndexOutOfRange {
                index: index.0,
                len,
            })?;
        let previous = std::mem::replace(slot, table);
        self.mark_dirty(index.0 as usize);
        Ok(previous)
    }

    /// Byte distance between consecutive tables.
    pub const fn stride() -> usize {
        std::mem::size_of::<T>()
    }

    /// The whole array as GPU-ready bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.tables)
    }

    /// Byte range written since the last call, clearing the dirty state.
    pub fn take_dirty_range(&mut self) -> Option<Range<usize>> {
        self.dirty
            .take()
            .map(|tables| tables.start * Self::stride()..tables.end * Self::stride())
    }

    /// Every distinct handle the tables reference, sorted.
    ///
    /// These are the textures that must be resident before a draw reads any
    /// of the tables.
    pub fn referenced_textures(&self) -> Vec<TextureHandle> {
        self.tables
            .iter()
            .flat_map(|table| table.textures())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Iterates over the tables with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (TableIndex, &T)> + '_ {
        self.tables
            .iter()
            .enumerate()
            .map(|(i, table)| (TableIndex(i as u32), table))
    }

    fn mark_dirty(&mut self, index: usize) {
        self.dirty = Some(match self.dirty.take() {
            Some(range) => range.start.min(index)..range.end.max(index + 1),
            None => index..index + 1,
        });
    }
}
