// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Splits per-codepoint, variable-length sequences into a shared values
//! buffer and a sorted `(codepoint, offset, count)` lookup table.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupEntry {
    pub codepoint: u32,
    /// Index of the first value in [`LookupTables::values`].
    pub offset: u32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTables<T> {
    /// Sorted by codepoint.
    pub lookup: Vec<LookupEntry>,
    pub values: Vec<T>,
}

impl<T: Clone> LookupTables<T> {
    pub fn build(map: &BTreeMap<u32, Vec<T>>) -> Self {
        Self::build_with(map, |_, _| {})
    }

    /// Like [`LookupTables::build`], but lets the caller reorder each
    /// codepoint's sequence before it is appended.
    pub fn build_with<F>(map: &BTreeMap<u32, Vec<T>>, mut resort: F) -> Self
    where
        F: FnMut(u32, &mut [T]),
    {
        let mut lookup = Vec::with_capacity(map.len());
        let mut values = Vec::with_capacity(map.values().map(Vec::len).sum());

        for (&codepoint, sequence) in map {
            let offset = values.len();
            values.extend_from_slice(sequence);
            resort(codepoint, &mut values[offset..]);
            lookup.push(LookupEntry {
                codepoint,
                offset: offset as u32,
                count: sequence.len() as u32,
            });
        }

        Self { lookup, values }
    }
}

impl<T> LookupTables<T> {
    pub fn get(&self, codepoint: u32) -> Option<&[T]> {
        let idx = self.lookup.binary_search_by_key(&codepoint, |e| e.codepoint).ok()?;
        let entry = &self.lookup[idx];
        let start = entry.offset as usize;
        Some(&self.values[start..start + entry.count as usize])
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}
