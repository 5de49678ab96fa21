// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::{apperr, source};

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"for Version (\d+)\.(\d+)\.(\d+) of").expect("valid version pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnicodeVersion {
    pub major: u16,
    pub minor: u16,
    pub micro: u16,
}

impl UnicodeVersion {
    /// Reads the version from a UCD or IDNA `ReadMe.txt`.
    /// A missing version is fatal: the tables couldn't be labelled.
    pub fn load(path: &Path) -> apperr::Result<Self> {
        let text = source::read(path)?;
        Self::parse(&text).ok_or_else(|| apperr::Error::MissingVersion { path: path.to_path_buf() })
    }

    pub fn parse(text: &str) -> Option<Self> {
        let captures = VERSION_PATTERN.captures(text)?;
        Some(Self {
            major: captures[1].parse().ok()?,
            minor: captures[2].parse().ok()?,
            micro: captures[3].parse().ok()?,
        })
    }
}

impl fmt::Display for UnicodeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_readme() {
        let readme = "\
# Unicode Character Database
# This directory contains the final data files
# for Version 15.1.0 of the Unicode Standard.
";
        let version = UnicodeVersion::parse(readme).unwrap();
        assert_eq!(version, UnicodeVersion { major: 15, minor: 1, micro: 0 });
        assert_eq!(version.to_string(), "15.1.0");
    }

    #[test]
    fn test_missing_version() {
        assert_eq!(UnicodeVersion::parse("for Version 15.1 of the standard"), None);
        assert_eq!(UnicodeVersion::parse(""), None);
    }

    #[test]
    fn test_load_missing_version_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ReadMe.txt");
        std::fs::write(&path, "nothing to see here\n").unwrap();

        match UnicodeVersion::load(&path) {
            Err(apperr::Error::MissingVersion { path: p }) => assert_eq!(p, path),
            other => panic!("expected MissingVersion, got {other:?}"),
        }
    }
}
