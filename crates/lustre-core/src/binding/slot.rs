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

use std::fmt;

/// A binding point within a binding table.
///
/// In the discrete binding model this is the `@binding(n)` index of the
/// resource; in the argument-buffer model it is the member id within one
/// table record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingSlot(pub u32);

impl BindingSlot {
    /// The raw slot index.
    pub const fn index(self) -> u32 {
        self.0
    }

    /// The slot immediately after this one, or `None` past `u32::MAX`.
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(index) => Some(Self(index)),
            None => None,
        }
    }
}

impl fmt::Display for BindingSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out consecutive slots starting at a base index.
///
/// Slots are never chosen by the caller: each call to
/// [`allocate`](Self::allocate) returns the slot after the previous one, until
/// the slot range is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAllocator {
    base: BindingSlot,
    next: Option<BindingSlot>,
}

impl SlotAllocator {
    /// Starts allocating at `base`.
    pub const fn new(base: u32) -> Self {
        Self {
            base: BindingSlot(base),
            next: Some(BindingSlot(base)),
        }
    }

    /// Claims the next slot, or `None` once the slot range is exhausted.
    pub fn allocate(&mut self) -> Option<BindingSlot> {
        let slot = self.next?;
        self.next = slot.next();
        Some(slot)
    }

    /// The slot the next [`allocate`](Self::allocate) call will return.
    pub const fn peek(&self) -> Option<BindingSlot> {
        self.next
    }

    /// The first slot handed out.
    pub const fn base(&self) -> BindingSlot {
        self.base
    }
}
