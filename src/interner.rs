// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Deduplicating string pool backed by a single UTF-8 buffer.

use std::collections::HashMap;

/// A `(byte_offset, byte_length)` handle into [`StringInterner::buffer`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StringSlice {
    pub byte_start: u32,
    pub byte_len: u32,
}

impl StringSlice {
    pub const EMPTY: Self = Self { byte_start: 0, byte_len: 0 };

    pub fn resolve(self, buffer: &str) -> &str {
        let start = self.byte_start as usize;
        &buffer[start..start + self.byte_len as usize]
    }
}

#[derive(Debug, Clone)]
pub struct StringInterner {
    buffer: String,
    slices: HashMap<String, StringSlice>,
    // Insertion order, so that the pool can be emitted deterministically.
    order: Vec<String>,
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl StringInterner {
    /// Creates an interner with the empty string registered at `(0, 0)`.
    pub fn new() -> Self {
        let mut slices = HashMap::new();
        slices.insert(String::new(), StringSlice::EMPTY);
        Self { buffer: String::new(), slices, order: vec![String::new()] }
    }

    pub fn intern(&mut self, s: &str) -> StringSlice {
        if let Some(&slice) = self.slices.get(s) {
            return slice;
        }

        let slice = StringSlice { byte_start: self.buffer.len() as u32, byte_len: s.len() as u32 };
        self.buffer.push_str(s);
        self.slices.insert(s.to_string(), slice);
        self.order.push(s.to_string());
        slice
    }

    pub fn get(&self, s: &str) -> Option<StringSlice> {
        self.slices.get(s).copied()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// The distinct strings in the order they were first interned,
    /// starting with the empty string.
    pub fn strings(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        // The empty string is always present.
        false
    }
}
