// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared helpers for reading the `;`-separated UCD text formats.

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use crate::apperr;

/// The UTF-16 surrogate block. These can never appear in decoded text.
pub const SURROGATES: RangeInclusive<u32> = 0xD800..=0xDFFF;

pub const MAX_CODEPOINT: u32 = 0x10FFFF;

pub fn is_surrogate(cp: u32) -> bool {
    SURROGATES.contains(&cp)
}

pub fn read(path: &Path) -> apperr::Result<String> {
    let text = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read data file");
    Ok(text)
}

/// Yields `(line_number, content)` for every line that still has content
/// after its `#` comment is removed. Line numbers are 1-based.
pub fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines().enumerate().filter_map(|(i, line)| {
        let line = match line.find('#') {
            Some(idx) => &line[..idx],
            None => line,
        };
        let line = line.trim();
        if line.is_empty() { None } else { Some((i + 1, line)) }
    })
}

pub fn parse_hex(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    u32::from_str_radix(s, 16).ok().filter(|&cp| cp <= MAX_CODEPOINT)
}

/// Parses either `XXXX` or `XXXX..YYYY`.
pub fn parse_range(s: &str) -> Option<RangeInclusive<u32>> {
    let s = s.trim();
    match s.split_once("..") {
        Some((first, last)) => {
            let first = parse_hex(first)?;
            let last = parse_hex(last)?;
            if first > last {
                return None;
            }
            Some(first..=last)
        }
        None => parse_hex(s).map(|cp| cp..=cp),
    }
}

/// Parses a whitespace separated list of hexadecimal codepoints.
pub fn parse_codepoints(s: &str) -> Option<Vec<u32>> {
    s.split_whitespace().map(parse_hex).collect()
}

/// Decodes a codepoint sequence into a string. `None` if any element
/// is not a scalar value.
pub fn codepoints_to_string(cps: &[u32]) -> Option<String> {
    cps.iter().map(|&cp| char::from_u32(cp)).collect()
}
