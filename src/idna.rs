// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Compiles `IdnaMappingTable.txt` (UTS #46) into status ranges whose
//! replacement strings live in a shared [`StringInterner`] pool.

use std::fmt;
use std::path::Path;

use crate::apperr;
use crate::interner::{StringInterner, StringSlice};
use crate::source;

const FILE_NAME: &str = "IdnaMappingTable.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdnaStatus {
    Valid,
    Ignored,
    Mapped,
    Deviation,
    Disallowed,
    DisallowedStd3Valid,
    DisallowedStd3Mapped,
}

impl IdnaStatus {
    fn parse(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "valid" => Self::Valid,
            "ignored" => Self::Ignored,
            "mapped" => Self::Mapped,
            "deviation" => Self::Deviation,
            "disallowed" => Self::Disallowed,
            "disallowed_STD3_valid" => Self::DisallowedStd3Valid,
            "disallowed_STD3_mapped" => Self::DisallowedStd3Mapped,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "Valid",
            Self::Ignored => "Ignored",
            Self::Mapped => "Mapped",
            Self::Deviation => "Deviation",
            Self::Disallowed => "Disallowed",
            Self::DisallowedStd3Valid => "DisallowedStd3Valid",
            Self::DisallowedStd3Mapped => "DisallowedStd3Mapped",
        }
    }
}

impl fmt::Display for IdnaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdnaRange {
    pub from: u32,
    pub to: u32,
    pub status: IdnaStatus,
    /// The replacement text. Deviations without one map to the empty slice.
    pub mapping: Option<StringSlice>,
}

#[derive(Debug, Clone)]
pub struct IdnaMapping {
    pub ranges: Vec<IdnaRange>,
    pub strings: StringInterner,
}

impl IdnaMapping {
    pub fn load(path: &Path) -> apperr::Result<Self> {
        let text = source::read(path)?;
        let mut strings = StringInterner::new();
        let ranges = parse(&text, &mut strings)?;
        Ok(Self { ranges, strings })
    }

    pub fn lookup(&self, cp: u32) -> Option<&IdnaRange> {
        let idx = self.ranges.partition_point(|r| r.to < cp);
        self.ranges.get(idx).filter(|r| r.from <= cp)
    }
}

/// Parses the mapping table, interning every replacement string into `strings`.
pub fn parse(text: &str, strings: &mut StringInterner) -> apperr::Result<Vec<IdnaRange>> {
    let mut ranges = Vec::new();

    for (line_number, line) in source::data_lines(text) {
        let fields: Vec<&str> = line.split(';').map(str::trim).collect();
        if fields.len() < 2 {
            continue;
        }
        if fields[0] == "D800..DFFF" {
            continue;
        }
        let Some(range) = source::parse_range(fields[0]) else {
            continue;
        };

        let status = IdnaStatus::parse(fields[1])
            .ok_or_else(|| apperr::Error::UnknownIdnaStatus { status: fields[1].to_string() })?;

        let replacement = fields.get(2).copied().filter(|s| !s.is_empty());
        let mapping = match replacement {
            Some(field) => {
                let text = source::parse_codepoints(field)
                    .as_deref()
                    .and_then(source::codepoints_to_string)
                    .ok_or_else(|| apperr::Error::invalid_field(FILE_NAME, line_number, field))?;
                Some(strings.intern(&text))
            }
            None if status == IdnaStatus::Deviation => Some(strings.intern("")),
            None => None,
        };

        ranges.push(IdnaRange { from: *range.start(), to: *range.end(), status, mapping });
    }

    ranges.sort_by_key(|r| r.from);
    tracing::debug!(ranges = ranges.len(), strings = strings.len(), "compiled IDNA mapping");
    Ok(ranges)
}
