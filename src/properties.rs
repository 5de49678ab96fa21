// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Per-property extraction: group codepoints by value, then compress.

use std::fmt;
use std::ops::RangeInclusive;
use std::path::Path;

use crate::apperr;
use crate::overlay::{self, BIDI_CLASS_DEFAULTS};
use crate::ranges::{self, Groups, ValueRange};
use crate::source::{self, is_surrogate};
use crate::unicode_data::UnicodeData;

/// The Unicode version in which a codepoint was first assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Age {
    pub major: u8,
    pub minor: u8,
}

impl Age {
    fn parse(s: &str) -> Option<Self> {
        let (major, minor) = s.trim().split_once('.')?;
        Some(Self { major: major.parse().ok()?, minor: minor.parse().ok()? })
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

pub fn load_age(path: &Path) -> apperr::Result<Vec<ValueRange<Age>>> {
    let text = source::read(path)?;
    parse_age(&text)
}

/// Parses `DerivedAge.txt` (`codepoint-or-range ; major.minor`).
pub fn parse_age(text: &str) -> apperr::Result<Vec<ValueRange<Age>>> {
    let mut groups = Groups::new();

    for (_, line) in source::data_lines(text) {
        let mut fields = line.split(';');
        let (Some(range), Some(value)) = (fields.next(), fields.next()) else {
            continue;
        };
        let (Some(range), Some(age)) = (source::parse_range(range), Age::parse(value)) else {
            continue;
        };
        groups
            .entry(age)
            .or_insert_with(Vec::new)
            .extend(range.filter(|&cp| !is_surrogate(cp)));
    }

    let table = ranges::compress_by_value(groups)?;
    tracing::debug!(ranges = table.len(), "compiled Age");
    Ok(table)
}

/// Bidi_Class from `UnicodeData.txt`, with the documented defaults for
/// unlisted codepoints overlaid.
pub fn bidi_class(data: &UnicodeData) -> apperr::Result<Vec<ValueRange<String>>> {
    let mut groups: Groups<String> = Groups::new();
    for (cp, record) in data {
        groups.entry(record.bidi_class.clone()).or_default().push(cp);
    }

    let defaults: Vec<(RangeInclusive<u32>, String)> =
        BIDI_CLASS_DEFAULTS.iter().map(|(r, v)| (r.clone(), v.to_string())).collect();
    let added = overlay::apply_defaults(&mut groups, &defaults, |cp| data.contains(cp));

    let table = ranges::compress_by_value(groups)?;
    tracing::debug!(ranges = table.len(), defaults = added, "compiled Bidi_Class");
    Ok(table)
}

pub fn general_category(data: &UnicodeData) -> apperr::Result<Vec<ValueRange<String>>> {
    let mut groups: Groups<String> = Groups::new();
    for (cp, record) in data {
        groups.entry(record.general_category.clone()).or_default().push(cp);
    }

    let table = ranges::compress_by_value(groups)?;
    tracing::debug!(ranges = table.len(), "compiled General_Category");
    Ok(table)
}

/// The grouping categories (e.g. `L`, `LC`) a General_Category value belongs to.
/// See table 12 of UAX #44.
pub fn expanded_categories(gc: &str) -> &'static [&'static str] {
    match gc {
        "Lu" | "Ll" | "Lt" => &["LC", "L"],
        "Lm" | "Lo" => &["L"],
        "Mn" | "Mc" | "Me" => &["M"],
        "Nd" | "Nl" | "No" => &["N"],
        "Pc" | "Pd" | "Ps" | "Pe" | "Pi" | "Pf" | "Po" => &["P"],
        "Sm" | "Sc" | "Sk" | "So" => &["S"],
        "Zs" | "Zl" | "Zp" => &["Z"],
        "Cc" | "Cf" | "Cs" | "Co" | "Cn" => &["C"],
        _ => &[],
    }
}

/// All codepoints with General_Category=Mark.
pub fn general_category_mark(data: &UnicodeData) -> Vec<RangeInclusive<u32>> {
    let marks = data
        .iter()
        .filter(|(_, record)| {
            record.general_category == "M"
                || expanded_categories(&record.general_category).contains(&"M")
        })
        .map(|(cp, _)| cp);
    ranges::compress(marks)
}

/// Canonical_Combining_Class. Class 0 is the implicit default and is omitted.
pub fn canonical_combining_class(data: &UnicodeData) -> apperr::Result<Vec<ValueRange<u8>>> {
    let mut groups: Groups<u8> = Groups::new();
    for (cp, record) in data {
        match record.combining_class() {
            Some(0) => {}
            Some(ccc) => groups.entry(ccc).or_default().push(cp),
            None => tracing::debug!(cp, field = %record.combining_class, "skipping invalid ccc"),
        }
    }

    let table = ranges::compress_by_value(groups)?;
    tracing::debug!(ranges = table.len(), "compiled Canonical_Combining_Class");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranges::{is_well_formed, lookup};
    use crate::unicode_data::tests::SAMPLE;

    #[test]
    fn test_parse_age() {
        let text = "\
# DerivedAge.txt
0000..001F    ; 1.1 #  [32] <control-0000>..<control-001F>
0020..007E    ; 1.1 #  [95] SPACE..TILDE
0080          ; 1.1
0220          ; 3.2 #       LATIN CAPITAL LETTER N WITH LONG RIGHT LEG
D800..DFFF    ; 2.0 # [2048] <surrogate-D800>..<surrogate-DFFF>
1F600         ; 6.1
garbage line
";
        let table = parse_age(text).unwrap();
        let v11 = Age { major: 1, minor: 1 };
        assert_eq!(table, vec![
            ValueRange::new(0x00, 0x7E, v11),
            ValueRange::new(0x80, 0x80, v11),
            ValueRange::new(0x220, 0x220, Age { major: 3, minor: 2 }),
            ValueRange::new(0x1F600, 0x1F600, Age { major: 6, minor: 1 }),
        ]);
        assert!(table.iter().all(|r| !is_surrogate(r.from)));
        assert!(is_well_formed(&table));
    }

    #[test]
    fn test_bidi_class_overlay() {
        let data = UnicodeData::parse(SAMPLE);
        let table = bidi_class(&data).unwrap();
        assert!(is_well_formed(&table));
        // Unassigned codepoint in the Hebrew block takes the default.
        assert_eq!(lookup(&table, 0x0590).map(String::as_str), Some("R"));
        // Explicit values are never replaced by the default.
        assert_eq!(lookup(&table, 0x0591).map(String::as_str), Some("NSM"));
        assert_eq!(lookup(&table, 0x00A0).map(String::as_str), Some("CS"));
        assert_eq!(lookup(&table, 0x0041).map(String::as_str), Some("L"));
        assert_eq!(lookup(&table, 0x20A0).map(String::as_str), Some("ET"));
        // Not listed and not in a default range.
        assert_eq!(lookup(&table, 0x0100), None);
    }

    #[test]
    fn test_general_category() {
        let data = UnicodeData::parse(SAMPLE);
        let table = general_category(&data).unwrap();
        assert!(is_well_formed(&table));
        assert_eq!(table[0], ValueRange::new(0x41, 0x43, "Lu".to_string()));
        assert_eq!(table[1], ValueRange::new(0x45, 0x45, "Lu".to_string()));
        assert_eq!(lookup(&table, 0x61).map(String::as_str), Some("Ll"));
        assert_eq!(lookup(&table, 0x2460).map(String::as_str), Some("No"));
    }

    #[test]
    fn test_general_category_mark() {
        let data = UnicodeData::parse(SAMPLE);
        let marks = general_category_mark(&data);
        assert_eq!(marks, vec![
            0x300..=0x301,
            0x304..=0x304,
            0x308..=0x308,
            0x340..=0x340,
            0x344..=0x344,
            0x591..=0x591,
            0x5C1..=0x5C1,
        ]);
    }

    #[test]
    fn test_canonical_combining_class() {
        let data = UnicodeData::parse(SAMPLE);
        let table = canonical_combining_class(&data).unwrap();
        assert!(is_well_formed(&table));
        assert_eq!(lookup(&table, 0x300), Some(&230));
        assert_eq!(lookup(&table, 0x591), Some(&220));
        assert_eq!(lookup(&table, 0x5C1), Some(&24));
        assert_eq!(lookup(&table, 0x41), None);
    }
}
