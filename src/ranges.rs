// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Range compression: turning sets of codepoints into sorted, maximal,
//! inclusive ranges.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::apperr;

/// Codepoints grouped by the property value they carry.
pub type Groups<V> = BTreeMap<V, Vec<u32>>;

/// A closed interval `[from, to]` tagged with a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueRange<V> {
    pub from: u32,
    pub to: u32,
    pub value: V,
}

impl<V> ValueRange<V> {
    pub fn new(from: u32, to: u32, value: V) -> Self {
        debug_assert!(from <= to);
        Self { from, to, value }
    }

    pub fn contains(&self, cp: u32) -> bool {
        self.from <= cp && cp <= self.to
    }

    pub fn codepoints(&self) -> RangeInclusive<u32> {
        self.from..=self.to
    }
}

/// Merges unique codepoints into maximal ascending ranges.
///
/// # Panics
///
/// Panics if a codepoint occurs twice. Every caller groups codepoints so
/// that this can't happen, and a duplicate means that grouping is broken.
pub fn compress(codepoints: impl IntoIterator<Item = u32>) -> Vec<RangeInclusive<u32>> {
    let mut codepoints: Vec<u32> = codepoints.into_iter().collect();
    codepoints.sort_unstable();

    let mut ranges = Vec::new();
    let mut iter = codepoints.into_iter();
    let Some(first) = iter.next() else {
        return ranges;
    };

    let mut start = first;
    let mut end = first;
    for cp in iter {
        assert!(cp > end, "duplicate codepoint U+{cp:04X} in range compression");
        if cp == end + 1 {
            end = cp;
        } else {
            ranges.push(start..=end);
            start = cp;
            end = cp;
        }
    }
    ranges.push(start..=end);
    ranges
}

/// Compresses every group on its own and merges the results into one table
/// sorted by `from`.
///
/// Groups must be disjoint. If two groups claim the same codepoint the
/// resulting ranges overlap and [`apperr::Error::OverlappingRanges`] is
/// returned instead of picking a winner.
pub fn compress_by_value<V, I>(
    groups: impl IntoIterator<Item = (V, I)>,
) -> apperr::Result<Vec<ValueRange<V>>>
where
    V: Clone,
    I: IntoIterator<Item = u32>,
{
    let mut table = Vec::new();
    for (value, codepoints) in groups {
        for range in compress(codepoints) {
            table.push(ValueRange::new(*range.start(), *range.end(), value.clone()));
        }
    }

    table.sort_by_key(|r| r.from);

    for pair in table.windows(2) {
        if pair[0].to >= pair[1].from {
            return Err(apperr::Error::OverlappingRanges {
                first: (pair[0].from, pair[0].to),
                second: (pair[1].from, pair[1].to),
            });
        }
    }

    Ok(table)
}

/// The inverse of [`compress`].
pub fn expand<'a>(ranges: &'a [RangeInclusive<u32>]) -> impl Iterator<Item = u32> + 'a {
    ranges.iter().flat_map(|r| r.clone())
}

/// The inverse of [`compress_by_value`], yielding `(codepoint, value)`.
pub fn expand_values<V>(table: &[ValueRange<V>]) -> impl Iterator<Item = (u32, &V)> {
    table.iter().flat_map(|r| r.codepoints().map(move |cp| (cp, &r.value)))
}

/// Checks the invariants every compiled table must hold: ascending,
/// non-overlapping, and no two touching ranges with the same value.
pub fn is_well_formed<V: PartialEq>(table: &[ValueRange<V>]) -> bool {
    table.iter().all(|r| r.from <= r.to)
        && table.windows(2).all(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            a.to < b.from && !(a.to + 1 == b.from && a.value == b.value)
        })
}

/// Binary search for the value covering `cp`.
pub fn lookup<V>(table: &[ValueRange<V>], cp: u32) -> Option<&V> {
    table
        .binary_search_by(|r| {
            if r.to < cp {
                std::cmp::Ordering::Less
            } else if r.from > cp {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .ok()
        .map(|idx| &table[idx].value)
}
