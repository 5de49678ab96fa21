// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Decomposition mappings and the canonical composition pairs derived from them.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::Path;

use crate::apperr;
use crate::ranges::{self, Groups, ValueRange};
use crate::source;
use crate::unicode_data::UnicodeData;

pub const FULL_COMPOSITION_EXCLUSION: &str = "Full_Composition_Exclusion";

/// Codepoint to decomposition sequence.
pub type DecompositionMapping = BTreeMap<u32, Vec<u32>>;

/// First codepoint to its `(second, composed)` pairs, in decomposition order.
pub type CompositionMapping = BTreeMap<u32, Vec<(u32, u32)>>;

/// The codepoints of one binary property from `DerivedNormalizationProps.txt`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NormalizationProperty {
    ranges: Vec<RangeInclusive<u32>>,
}

impl NormalizationProperty {
    pub fn load(path: &Path, property: &str) -> apperr::Result<Self> {
        let text = source::read(path)?;
        Ok(Self::parse(&text, property))
    }

    /// Keeps only the lines naming `property`. Both single codepoints and
    /// `XXXX..YYYY` ranges are accepted.
    pub fn parse(text: &str, property: &str) -> Self {
        let mut codepoints = Vec::new();
        for (_, line) in source::data_lines(text) {
            let mut fields = line.split(';').map(str::trim);
            let (Some(range), Some(name)) = (fields.next(), fields.next()) else {
                continue;
            };
            if name != property {
                continue;
            }
            if let Some(range) = source::parse_range(range) {
                codepoints.extend(range);
            }
        }

        let ranges = ranges::compress(codepoints);
        tracing::debug!(property, ranges = ranges.len(), "parsed normalization property");
        Self { ranges }
    }

    pub fn contains(&self, cp: u32) -> bool {
        self.ranges
            .binary_search_by(|r| {
                if *r.end() < cp {
                    std::cmp::Ordering::Less
                } else if *r.start() > cp {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    pub fn ranges(&self) -> &[RangeInclusive<u32>] {
        &self.ranges
    }
}

/// Everything derived from the decomposition field of `UnicodeData.txt`.
#[derive(Debug, Default, Clone)]
pub struct NormalFormInfo {
    pub canonical_decomposition: DecompositionMapping,
    pub compatibility_decomposition: DecompositionMapping,
    /// Decomposition_Type for the compatibility mappings, e.g. `Compat`, `Font`, `Nobreak`.
    pub compatibility_decomposition_type: Vec<ValueRange<String>>,
}

pub fn normal_form_info(data: &UnicodeData) -> apperr::Result<NormalFormInfo> {
    let mut canonical_decomposition = DecompositionMapping::new();
    let mut compatibility_decomposition = DecompositionMapping::new();
    let mut types: Groups<String> = Groups::new();

    for (cp, record) in data {
        let mut tokens = record.decomposition.split_whitespace().peekable();
        let Some(&first) = tokens.peek() else {
            continue;
        };

        let tag = first.strip_prefix('<').and_then(|t| t.strip_suffix('>'));
        if tag.is_some() {
            tokens.next();
        }

        let Some(sequence) = tokens.map(source::parse_hex).collect::<Option<Vec<u32>>>() else {
            tracing::warn!(cp, field = %record.decomposition, "skipping invalid decomposition");
            continue;
        };

        match tag {
            Some(tag) => {
                types.entry(title_case(tag)).or_default().push(cp);
                compatibility_decomposition.insert(cp, sequence);
            }
            None => {
                canonical_decomposition.insert(cp, sequence);
            }
        }
    }

    let compatibility_decomposition_type = ranges::compress_by_value(types)?;
    tracing::debug!(
        canonical = canonical_decomposition.len(),
        compatibility = compatibility_decomposition.len(),
        type_ranges = compatibility_decomposition_type.len(),
        "compiled decompositions"
    );

    Ok(NormalFormInfo {
        canonical_decomposition,
        compatibility_decomposition,
        compatibility_decomposition_type,
    })
}

/// Inverts the two-element canonical decompositions that aren't excluded
/// from composition.
pub fn canonical_composition(
    canonical: &DecompositionMapping,
    exclusions: &NormalizationProperty,
) -> CompositionMapping {
    let mut mapping = CompositionMapping::new();

    for (&composed, decomposition) in canonical {
        if exclusions.contains(composed) {
            continue;
        }
        if let &[first, second] = decomposition.as_slice() {
            mapping.entry(first).or_default().push((second, composed));
        }
    }

    tracing::debug!(firsts = mapping.len(), "compiled canonical composition");
    mapping
}

/// `noBreak` -> `Nobreak`, `compat` -> `Compat`.
fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranges::{is_well_formed, lookup};
    use crate::unicode_data::tests::SAMPLE;

    const PROPS: &str = "\
# DerivedNormalizationProps.txt
0340..0341    ; Full_Composition_Exclusion # Mn   [2] COMBINING GRAVE TONE MARK..COMBINING ACUTE TONE MARK
0344          ; Full_Composition_Exclusion # Mn       COMBINING GREEK DIALYTIKA TONOS
FB1D          ; Full_Composition_Exclusion # Lo       HEBREW LETTER YOD WITH HIRIQ
FB2A..FB36    ; Full_Composition_Exclusion # Lo  [13] HEBREW LETTER SHIN WITH SHIN DOT..HEBREW LETTER ZAYIN WITH DAGESH
2126          ; Full_Composition_Exclusion # L&       OHM SIGN
00C1          ; NFD_QC; N # Lu       LATIN CAPITAL LETTER A WITH ACUTE
037A          ; FC_NFKC; 0020 03B9 # Lm       GREEK YPOGEGRAMMENI
";

    #[test]
    fn test_normalization_property() {
        let excl = NormalizationProperty::parse(PROPS, FULL_COMPOSITION_EXCLUSION);
        assert_eq!(excl.ranges(), &[
            0x340..=0x341,
            0x344..=0x344,
            0x2126..=0x2126,
            0xFB1D..=0xFB1D,
            0xFB2A..=0xFB36
        ]);
        assert!(excl.contains(0x340));
        assert!(excl.contains(0xFB30));
        assert!(!excl.contains(0xC1));
        assert!(!excl.contains(0x342));

        let qc = NormalizationProperty::parse(PROPS, "NFD_QC");
        assert_eq!(qc.ranges(), &[0xC1..=0xC1]);
    }

    #[test]
    fn test_decompositions() {
        let data = UnicodeData::parse(SAMPLE);
        let info = normal_form_info(&data).unwrap();

        assert_eq!(info.canonical_decomposition.get(&0xC0), Some(&vec![0x41, 0x300]));
        assert_eq!(info.canonical_decomposition.get(&0x2126), Some(&vec![0x3A9]));
        assert_eq!(info.canonical_decomposition.get(&0xA0), None);
        assert_eq!(info.compatibility_decomposition.get(&0xA0), Some(&vec![0x20]));
        assert_eq!(info.compatibility_decomposition.get(&0xFB01), Some(&vec![0x66, 0x69]));
        assert_eq!(info.compatibility_decomposition.get(&0xC0), None);

        let types = &info.compatibility_decomposition_type;
        assert!(is_well_formed(types));
        assert_eq!(lookup(types, 0xA0).map(String::as_str), Some("Nobreak"));
        assert_eq!(lookup(types, 0xFB01).map(String::as_str), Some("Compat"));
        assert_eq!(lookup(types, 0x2460).map(String::as_str), Some("Circle"));
        assert_eq!(lookup(types, 0xC0), None);
    }

    #[test]
    fn test_canonical_composition() {
        let data = UnicodeData::parse(SAMPLE);
        let info = normal_form_info(&data).unwrap();
        let excl = NormalizationProperty::parse(PROPS, FULL_COMPOSITION_EXCLUSION);
        let mapping = canonical_composition(&info.canonical_decomposition, &excl);

        assert_eq!(mapping.get(&0x41), Some(&vec![(0x300, 0xC0), (0x301, 0xC1)]));
        assert_eq!(mapping.get(&0x112), Some(&vec![(0x300, 0x1E14)]));
        assert_eq!(mapping.get(&0x45), Some(&vec![(0x304, 0x112)]));
        // Excluded, and singletons never compose.
        assert_eq!(mapping.get(&0x308), None);
        assert_eq!(mapping.get(&0x5D9), None);
        assert_eq!(mapping.get(&0x5E9), None);
        assert_eq!(mapping.get(&0x3A9), None);

        for (&first, pairs) in &mapping {
            for &(second, composed) in pairs {
                assert_eq!(info.canonical_decomposition[&composed], vec![first, second]);
                assert!(!excl.contains(composed));
            }
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("noBreak"), "Nobreak");
        assert_eq!(title_case("compat"), "Compat");
        assert_eq!(title_case(""), "");
    }
}
