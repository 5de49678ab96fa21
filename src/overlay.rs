// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Default values for codepoints that `UnicodeData.txt` doesn't list.

use std::ops::RangeInclusive;

use crate::ranges::Groups;

/// Bidi_Class defaults for unassigned codepoints, as documented in the header
/// of `extracted/DerivedBidiClass.txt`. Everything not listed defaults to `L`,
/// which the consumer of the tables handles on its own.
pub const BIDI_CLASS_DEFAULTS: &[(RangeInclusive<u32>, &str)] = &[
    // Arabic, Syriac, Arabic_Supplement, Thaana
    (0x0600..=0x07BF, "AL"),
    // Arabic Extended-A
    (0x08A0..=0x08FF, "AL"),
    // Arabic_Presentation_Forms_A
    (0xFB50..=0xFDCF, "AL"),
    (0xFDF0..=0xFDFF, "AL"),
    // Arabic_Presentation_Forms_B
    (0xFE70..=0xFEFF, "AL"),
    // Arabic Mathematical Alphabetic Symbols
    (0x1EE00..=0x1EEFF, "AL"),
    // Hebrew
    (0x0590..=0x05FF, "R"),
    // NKo
    (0x07C0..=0x089F, "R"),
    (0xFB1D..=0xFB4F, "R"),
    // Cypriot_Syllabary, Phoenician, Lydian, Meroitic, Kharoshthi, ...
    (0x10800..=0x10FFF, "R"),
    (0x1E800..=0x1EDFF, "R"),
    (0x1EF00..=0x1EFFF, "R"),
    // Currency Symbols
    (0x20A0..=0x20CF, "ET"),
];

/// Adds `value` to `groups` for every codepoint in the default ranges for
/// which `is_explicit` returns false. Explicit values always win, even when
/// a default range would assign something else.
pub fn apply_defaults<V, F>(
    groups: &mut Groups<V>,
    defaults: &[(RangeInclusive<u32>, V)],
    mut is_explicit: F,
) -> usize
where
    V: Ord + Clone,
    F: FnMut(u32) -> bool,
{
    let mut added = 0;
    for (range, value) in defaults {
        let mut synthetic: Vec<u32> = range.clone().filter(|&cp| !is_explicit(cp)).collect();
        if synthetic.is_empty() {
            continue;
        }
        added += synthetic.len();
        groups.entry(value.clone()).or_default().append(&mut synthetic);
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranges::{compress_by_value, lookup};

    #[test]
    fn test_defaults_fill_only_gaps() {
        let mut groups: Groups<&str> = Groups::new();
        groups.insert("NSM", vec![0x0591]);
        groups.insert("R", vec![0x05D0]);

        let added =
            apply_defaults(&mut groups, BIDI_CLASS_DEFAULTS, |cp| cp == 0x0591 || cp == 0x05D0);

        let table = compress_by_value(groups).unwrap();
        assert_eq!(lookup(&table, 0x0590), Some(&"R"));
        assert_eq!(lookup(&table, 0x0591), Some(&"NSM"));
        assert_eq!(lookup(&table, 0x05D0), Some(&"R"));
        assert_eq!(lookup(&table, 0x0600), Some(&"AL"));
        assert_eq!(lookup(&table, 0x20AF), Some(&"ET"));
        assert_eq!(lookup(&table, 0x0041), None);

        let total: usize = BIDI_CLASS_DEFAULTS.iter().map(|(r, _)| r.clone().count()).sum();
        assert_eq!(added, total - 2);
    }

    #[test]
    fn test_default_ranges_are_disjoint() {
        let mut ranges: Vec<_> = BIDI_CLASS_DEFAULTS.iter().map(|(r, _)| r.clone()).collect();
        ranges.sort_by_key(|r| *r.start());
        for pair in ranges.windows(2) {
            assert!(pair[0].end() < pair[1].start());
        }
    }
}
