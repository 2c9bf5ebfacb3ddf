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

//! Non-owning references to textures held by an external pool.

use std::fmt;

/// An opaque, non-owning handle to a 2D texture.
///
/// The handle is an index into a texture pool owned by the resource manager.
/// A binding table stores handles by value and never extends the lifetime of
/// the texture behind them: the pool must outlive every table that refers to
/// it. Handles are laid out as a single `u32` so they can be written into
/// GPU-visible memory unchanged.
#[repr(transparent)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, bytemuck::Pod, bytemuck::Zeroable,
)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    /// Wraps a pool index.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The pool index this handle refers to.
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "texture#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_is_one_gpu_word() {
        assert_eq!(std::mem::size_of::<TextureHandle>(), 4);
        assert_eq!(bytemuck::bytes_of(&TextureHandle::new(7)), &7u32.to_ne_bytes());
    }

    #[test]
    fn handle_display() {
        assert_eq!(TextureHandle::new(12).to_string(), "texture#12");
    }
}
