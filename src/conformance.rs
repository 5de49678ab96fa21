// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Round-trip validation of the compiled normalization tables against
//! `NormalizationTest.txt`. Nothing here ends up in the emitted tables.

use std::fmt;
use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::lookup::LookupTables;
use crate::normal::DecompositionMapping;
use crate::ranges::{self, ValueRange};
use crate::{apperr, source};

const FILE_NAME: &str = "NormalizationTest.txt";

/// Precomposed Hangul syllables. They aren't in the decomposition tables;
/// their (de)composition is arithmetic.
pub const HANGUL_SYLLABLES: RangeInclusive<u32> = 0xAC00..=0xD7A3;

const HANGUL_S_BASE: u32 = 0xAC00;
const HANGUL_L_BASE: u32 = 0x1100;
const HANGUL_V_BASE: u32 = 0x1161;
const HANGUL_T_BASE: u32 = 0x11A7;
const HANGUL_L_COUNT: u32 = 19;
const HANGUL_V_COUNT: u32 = 21;
const HANGUL_T_COUNT: u32 = 28;
const HANGUL_N_COUNT: u32 = HANGUL_V_COUNT * HANGUL_T_COUNT;

static DATUM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?);(.*?);(.*?);(.*?);(.*?);\s+#.*$").expect("valid datum pattern")
});

/// One test line: the source and its four normalization forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationTest {
    pub source: Vec<u32>,
    pub nfc: Vec<u32>,
    pub nfd: Vec<u32>,
    pub nfkc: Vec<u32>,
    pub nfkd: Vec<u32>,
}

#[derive(Debug, Default, Clone)]
pub struct NormalizationTests {
    pub entries: Vec<NormalizationTest>,
}

impl NormalizationTests {
    pub fn load(path: &Path) -> apperr::Result<Self> {
        let text = source::read(path)?;
        Self::parse(&text)
    }

    /// Lines starting with `#` are comments and lines starting with `@` are
    /// part headers. Every other non-blank line must be a test datum.
    /// Data containing surrogate codepoints is dropped.
    pub fn parse(text: &str) -> apperr::Result<Self> {
        let mut entries = Vec::new();

        for (i, line) in text.lines().enumerate() {
            if line.trim().is_empty() || line.starts_with('#') || line.starts_with('@') {
                continue;
            }

            let invalid = || apperr::Error::invalid_field(FILE_NAME, i + 1, line);
            let captures = DATUM_PATTERN.captures(line).ok_or_else(invalid)?;

            let mut columns = Vec::with_capacity(5);
            for idx in 1..=5 {
                columns.push(source::parse_codepoints(&captures[idx]).ok_or_else(invalid)?);
            }
            if columns.iter().flatten().any(|&cp| source::is_surrogate(cp)) {
                continue;
            }

            let mut columns = columns.into_iter();
            let mut next = || columns.next().unwrap_or_default();
            entries.push(NormalizationTest {
                source: next(),
                nfc: next(),
                nfd: next(),
                nfkc: next(),
                nfkd: next(),
            });
        }

        tracing::debug!(entries = entries.len(), "parsed NormalizationTest.txt");
        Ok(Self { entries })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Nfc,
    Nfd,
    Nfkc,
    Nfkd,
}

impl Form {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nfc => "NFC",
            Self::Nfd => "NFD",
            Self::Nfkc => "NFKC",
            Self::Nfkd => "NFKD",
        }
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four normalization forms, driven by the compiled tables.
pub struct Normalizer<'a> {
    pub canonical: &'a DecompositionMapping,
    pub compatibility: &'a DecompositionMapping,
    pub combining_class: &'a [ValueRange<u8>],
    /// `first -> (second, composed)` pairs, each run sorted by `second`.
    pub composition: &'a LookupTables<(u32, u32)>,
}

impl Normalizer<'_> {
    pub fn normalize(&self, form: Form, input: &[u32]) -> Vec<u32> {
        match form {
            Form::Nfc => self.nfc(input),
            Form::Nfd => self.nfd(input),
            Form::Nfkc => self.nfkc(input),
            Form::Nfkd => self.nfkd(input),
        }
    }

    pub fn nfd(&self, input: &[u32]) -> Vec<u32> {
        self.decompose(input, false)
    }

    pub fn nfkd(&self, input: &[u32]) -> Vec<u32> {
        self.decompose(input, true)
    }

    pub fn nfc(&self, input: &[u32]) -> Vec<u32> {
        self.compose(self.nfd(input))
    }

    pub fn nfkc(&self, input: &[u32]) -> Vec<u32> {
        self.compose(self.nfkd(input))
    }

    fn decompose(&self, input: &[u32], compat: bool) -> Vec<u32> {
        let mut out = Vec::with_capacity(input.len());
        for &cp in input {
            self.decompose_into(cp, compat, &mut out);
        }
        self.reorder(&mut out);
        out
    }

    fn decompose_into(&self, cp: u32, compat: bool, out: &mut Vec<u32>) {
        if HANGUL_SYLLABLES.contains(&cp) {
            let s = cp - HANGUL_S_BASE;
            out.push(HANGUL_L_BASE + s / HANGUL_N_COUNT);
            out.push(HANGUL_V_BASE + (s % HANGUL_N_COUNT) / HANGUL_T_COUNT);
            if s % HANGUL_T_COUNT != 0 {
                out.push(HANGUL_T_BASE + s % HANGUL_T_COUNT);
            }
            return;
        }

        let mapping = if compat { self.compatibility.get(&cp) } else { None };
        match mapping.or_else(|| self.canonical.get(&cp)) {
            Some(sequence) => {
                for &c in sequence {
                    self.decompose_into(c, compat, out);
                }
            }
            None => out.push(cp),
        }
    }

    fn ccc(&self, cp: u32) -> u8 {
        ranges::lookup(self.combining_class, cp).copied().unwrap_or(0)
    }

    /// Canonical ordering: every run of non-starters is stably sorted by
    /// combining class.
    fn reorder(&self, seq: &mut [u32]) {
        let mut start = 0;
        while start < seq.len() {
            if self.ccc(seq[start]) == 0 {
                start += 1;
                continue;
            }
            let mut end = start + 1;
            while end < seq.len() && self.ccc(seq[end]) != 0 {
                end += 1;
            }
            seq[start..end].sort_by_key(|&cp| self.ccc(cp));
            start = end;
        }
    }

    fn compose_pair(&self, first: u32, second: u32) -> Option<u32> {
        let l = first.wrapping_sub(HANGUL_L_BASE);
        let v = second.wrapping_sub(HANGUL_V_BASE);
        if l < HANGUL_L_COUNT && v < HANGUL_V_COUNT {
            return Some(HANGUL_S_BASE + (l * HANGUL_V_COUNT + v) * HANGUL_T_COUNT);
        }

        // LV syllable + trailing consonant.
        let t = second.wrapping_sub(HANGUL_T_BASE);
        if HANGUL_SYLLABLES.contains(&first)
            && (first - HANGUL_S_BASE) % HANGUL_T_COUNT == 0
            && (1..HANGUL_T_COUNT).contains(&t)
        {
            return Some(first + t);
        }

        let pairs = self.composition.get(first)?;
        let idx = pairs.binary_search_by_key(&second, |&(b, _)| b).ok()?;
        Some(pairs[idx].1)
    }

    /// Canonical composition of a canonically ordered sequence. A character
    /// combines with the last starter unless a character in between has a
    /// combining class greater than or equal to its own.
    fn compose(&self, decomposed: Vec<u32>) -> Vec<u32> {
        let mut out: Vec<u32> = Vec::with_capacity(decomposed.len());
        let mut starter: Option<usize> = None;
        // Combining class of the last character kept after the starter.
        let mut last_ccc: Option<u8> = None;

        for cp in decomposed {
            let ccc = self.ccc(cp);
            if let Some(idx) = starter {
                let blocked = last_ccc.is_some_and(|last| last >= ccc);
                if !blocked {
                    if let Some(composed) = self.compose_pair(out[idx], cp) {
                        out[idx] = composed;
                        continue;
                    }
                }
            }

            if ccc == 0 {
                starter = Some(out.len());
                last_ccc = None;
            } else {
                last_ccc = Some(ccc);
            }
            out.push(cp);
        }

        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// The source column of the failing test line.
    pub source: Vec<u32>,
    pub form: Form,
    /// The column that was normalized.
    pub input: Vec<u32>,
    pub expected: Vec<u32>,
    pub actual: Vec<u32>,
}

/// Checks every test line against the conformance invariants:
///
/// ```text
/// NFC:  c2 == toNFC(c1) == toNFC(c2) == toNFC(c3),   c4 == toNFC(c4) == toNFC(c5)
/// NFD:  c3 == toNFD(c1) == toNFD(c2) == toNFD(c3),   c5 == toNFD(c4) == toNFD(c5)
/// NFKC: c4 == toNFKC(c1) == ... == toNFKC(c5)
/// NFKD: c5 == toNFKD(c1) == ... == toNFKD(c5)
/// ```
///
/// At most one mismatch is reported per line and form, for the first input
/// column that fails. Returns the failures in file order.
pub fn validate(tests: &NormalizationTests, normalizer: &Normalizer<'_>) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();

    for test in &tests.entries {
        let all = [&test.source, &test.nfc, &test.nfd, &test.nfkc, &test.nfkd];
        let checks = [
            (Form::Nfc, &all[..3], &test.nfc),
            (Form::Nfc, &all[3..], &test.nfkc),
            (Form::Nfd, &all[..3], &test.nfd),
            (Form::Nfd, &all[3..], &test.nfkd),
            (Form::Nfkc, &all[..], &test.nfkc),
            (Form::Nfkd, &all[..], &test.nfkd),
        ];

        for (form, inputs, expected) in checks {
            for input in inputs {
                let actual = normalizer.normalize(form, input);
                if actual != *expected {
                    mismatches.push(Mismatch {
                        source: test.source.clone(),
                        form,
                        input: input.to_vec(),
                        expected: expected.clone(),
                        actual,
                    });
                    break;
                }
            }
        }
    }

    tracing::debug!(
        checked = tests.entries.len(),
        mismatches = mismatches.len(),
        "validated normalization forms"
    );
    mismatches
}
