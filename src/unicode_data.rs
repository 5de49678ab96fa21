// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Loader for `UnicodeData.txt`.
//!
//! Every record has exactly 15 `;`-separated fields. Lines with any other
//! field count are not records and are skipped. Large blocks of assigned
//! characters (CJK ideographs, Hangul syllables, private use planes, ...)
//! are encoded as a pair of records whose names end in `, First>` and
//! `, Last>`. Those are expanded here so that every codepoint owns its record.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::path::Path;

use crate::apperr;
use crate::source::{self, is_surrogate};

pub const FIELD_COUNT: usize = 15;

const RANGE_FIRST_MARKER: &str = ", First>";

/// All fields of one `UnicodeData.txt` record, except the codepoint itself.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CodepointRecord {
    pub name: String,
    pub general_category: String,
    pub combining_class: String,
    pub bidi_class: String,
    pub decomposition: String,
    pub decimal_digit: String,
    pub digit: String,
    pub numeric: String,
    pub bidi_mirrored: String,
    pub unicode_1_name: String,
    pub iso_comment: String,
    pub uppercase: String,
    pub lowercase: String,
    pub titlecase: String,
}

impl CodepointRecord {
    fn from_fields(fields: &[&str]) -> Self {
        debug_assert_eq!(fields.len(), FIELD_COUNT);
        Self {
            name: fields[1].to_string(),
            general_category: fields[2].to_string(),
            combining_class: fields[3].to_string(),
            bidi_class: fields[4].to_string(),
            decomposition: fields[5].to_string(),
            decimal_digit: fields[6].to_string(),
            digit: fields[7].to_string(),
            numeric: fields[8].to_string(),
            bidi_mirrored: fields[9].to_string(),
            unicode_1_name: fields[10].to_string(),
            iso_comment: fields[11].to_string(),
            uppercase: fields[12].to_string(),
            lowercase: fields[13].to_string(),
            titlecase: fields[14].to_string(),
        }
    }

    /// The canonical combining class, or `None` if the field is not a number.
    pub fn combining_class(&self) -> Option<u8> {
        self.combining_class.trim().parse().ok()
    }

    pub fn opens_range(&self) -> bool {
        self.name.ends_with(RANGE_FIRST_MARKER)
    }
}

/// Codepoint to record mapping. Iteration is in ascending codepoint order.
#[derive(Debug, Default, Clone)]
pub struct UnicodeData {
    records: BTreeMap<u32, CodepointRecord>,
}

impl UnicodeData {
    pub fn load(path: &Path) -> apperr::Result<Self> {
        let text = source::read(path)?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let mut records = BTreeMap::new();
        let mut range_start: Option<(u32, CodepointRecord)> = None;
        let mut skipped = 0usize;

        for line in text.lines() {
            let fields: Vec<&str> = line.split(';').collect();
            if fields.len() != FIELD_COUNT {
                skipped += 1;
                continue;
            }
            let Some(cp) = source::parse_hex(fields[0]) else {
                skipped += 1;
                continue;
            };
            if is_surrogate(cp) {
                continue;
            }

            let record = CodepointRecord::from_fields(&fields);

            if let Some((start, first)) = range_start.take() {
                // The record following a `First>` entry closes the range.
                // If it is the matching `Last>` entry it becomes a copy of the
                // opening record as well.
                let closes = record.name.ends_with(", Last>");
                let end = if closes { cp } else { cp.saturating_sub(1) };
                for i in start..=end {
                    if !is_surrogate(i) {
                        records.insert(i, first.clone());
                    }
                }
                if closes {
                    continue;
                }
            }

            if record.opens_range() {
                range_start = Some((cp, record));
                continue;
            }

            records.insert(cp, record);
        }

        // A trailing `First>` without a successor still owns its own codepoint.
        if let Some((start, first)) = range_start {
            records.insert(start, first);
        }

        tracing::debug!(records = records.len(), skipped, "parsed UnicodeData.txt");
        Self { records }
    }

    pub fn get(&self, cp: u32) -> Option<&CodepointRecord> {
        self.records.get(&cp)
    }

    pub fn contains(&self, cp: u32) -> bool {
        self.records.contains_key(&cp)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter(self.records.iter())
    }
}

pub struct Iter<'a>(btree_map::Iter<'a, u32, CodepointRecord>);

impl<'a> Iterator for Iter<'a> {
    type Item = (u32, &'a CodepointRecord);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(&cp, record)| (cp, record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> IntoIterator for &'a UnicodeData {
    type Item = (u32, &'a CodepointRecord);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A handful of real `UnicodeData.txt` lines, shared with other test modules.
    pub(crate) const SAMPLE: &str = "\
0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;
0042;LATIN CAPITAL LETTER B;Lu;0;L;;;;;N;;;;0062;
0043;LATIN CAPITAL LETTER C;Lu;0;L;;;;;N;;;;0063;
0061;LATIN SMALL LETTER A;Ll;0;L;;;;;N;;;0041;;0041
00A0;NO-BREAK SPACE;Zs;0;CS;<noBreak> 0020;;;;N;NON-BREAKING SPACE;;;;
00C0;LATIN CAPITAL LETTER A WITH GRAVE;Lu;0;L;0041 0300;;;;N;LATIN CAPITAL LETTER A GRAVE;;;00E0;
00C1;LATIN CAPITAL LETTER A WITH ACUTE;Lu;0;L;0041 0301;;;;N;LATIN CAPITAL LETTER A ACUTE;;;00E1;
0300;COMBINING GRAVE ACCENT;Mn;230;NSM;;;;;N;NON-SPACING GRAVE;;;;
0301;COMBINING ACUTE ACCENT;Mn;230;NSM;;;;;N;NON-SPACING ACUTE;;;;
0340;COMBINING GRAVE TONE MARK;Mn;230;NSM;0300;;;;N;NON-SPACING GRAVE TONE MARK;;;;
0344;COMBINING GREEK DIALYTIKA TONOS;Mn;230;NSM;0308 0301;;;;N;GREEK NON-SPACING DIAERESIS TONOS;;;;
0308;COMBINING DIAERESIS;Mn;230;NSM;;;;;N;NON-SPACING DIAERESIS;;;;
0591;HEBREW ACCENT ETNAHTA;Mn;220;NSM;;;;;N;;;;;
05D0;HEBREW LETTER ALEF;Lo;0;R;;;;;N;;;;;
1E14;LATIN CAPITAL LETTER E WITH MACRON AND GRAVE;Lu;0;L;0112 0300;;;;N;;;;1E15;
0112;LATIN CAPITAL LETTER E WITH MACRON;Lu;0;L;0045 0304;;;;N;LATIN CAPITAL LETTER E MACRON;;;0113;
0045;LATIN CAPITAL LETTER E;Lu;0;L;;;;;N;;;;0065;
0304;COMBINING MACRON;Mn;230;NSM;;;;;N;NON-SPACING MACRON;;;;
2126;OHM SIGN;Lu;0;L;03A9;;;;N;OHM;;;03C9;
03A9;GREEK CAPITAL LETTER OMEGA;Lu;0;L;;;;;N;;;;03C9;
FB1D;HEBREW LETTER YOD WITH HIRIQ;Lo;0;R;05D9 05B4;;;;N;;;;;
FB2A;HEBREW LETTER SHIN WITH SHIN DOT;Lo;0;R;05E9 05C1;;;;N;;;;;
05E9;HEBREW LETTER SHIN;Lo;0;R;;;;;N;;;;;
05C1;HEBREW POINT SHIN DOT;Mn;24;NSM;;;;;N;;;;;
FB01;LATIN SMALL LIGATURE FI;Ll;0;L;<compat> 0066 0069;;;;N;;;;;
2460;CIRCLED DIGIT ONE;No;0;ON;<circle> 0031;;1;1;N;;;;;
D800;<Non Private Use High Surrogate, First>;Cs;0;L;;;;;N;;;;;
DB7F;<Non Private Use High Surrogate, Last>;Cs;0;L;;;;;N;;;;;
";

    #[test]
    fn test_parse_basic_records() {
        let data = UnicodeData::parse(SAMPLE);
        let a = data.get(0x41).unwrap();
        assert_eq!(a.name, "LATIN CAPITAL LETTER A");
        assert_eq!(a.general_category, "Lu");
        assert_eq!(a.combining_class(), Some(0));
        assert_eq!(a.lowercase, "0061");
        assert_eq!(data.get(0x300).unwrap().combining_class(), Some(230));
        assert_eq!(data.get(0xC0).unwrap().decomposition, "0041 0300");
    }

    #[test]
    fn test_skip_short_and_malformed_lines() {
        let text = "\
0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;
# a comment line
0042;TOO SHORT;Lu;0;L
zzzz;NOT HEX;Lu;0;L;;;;;N;;;;;

0043;LATIN CAPITAL LETTER C;Lu;0;L;;;;;N;;;;0063;
";
        let data = UnicodeData::parse(text);
        assert_eq!(data.len(), 2);
        assert!(data.contains(0x41));
        assert!(!data.contains(0x42));
        assert!(data.contains(0x43));
    }

    #[test]
    fn test_surrogates_are_dropped() {
        let data = UnicodeData::parse(SAMPLE);
        assert!(!data.contains(0xD800));
        assert!(!data.contains(0xD900));
        assert!(!data.contains(0xDB7F));
        assert!(data.iter().all(|(cp, _)| !is_surrogate(cp)));
    }

    #[test]
    fn test_range_record_expansion() {
        let text = "\
0FFF;BEFORE;Lo;0;L;;;;;N;;;;;
1000;<Foo, First>;Lo;0;L;;;;;N;;;;;
1002;<Foo, Last>;Lo;0;L;;;;;N;;;;;
1003;AFTER;Lo;0;R;;;;;N;;;;;
";
        let data = UnicodeData::parse(text);
        let first = data.get(0x1000).unwrap();
        assert_eq!(first.name, "<Foo, First>");
        assert_eq!(data.get(0x1001), Some(first));
        assert_eq!(data.get(0x1002), Some(first));
        assert_eq!(data.get(0x1003).unwrap().name, "AFTER");
        assert_eq!(data.get(0x0FFF).unwrap().name, "BEFORE");
        assert_eq!(data.len(), 5);
    }

    #[test]
    fn test_iteration_is_ascending() {
        let data = UnicodeData::parse(SAMPLE);
        let cps: Vec<u32> = data.iter().map(|(cp, _)| cp).collect();
        let mut sorted = cps.clone();
        sorted.sort_unstable();
        assert_eq!(cps, sorted);
    }
}
