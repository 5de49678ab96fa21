// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::path::PathBuf;
use std::{fmt, io, result};

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    /// `ReadMe.txt` carries no "for Version X.Y.Z of" line.
    MissingVersion { path: PathBuf },
    /// Two value groups produced ranges covering the same codepoint.
    OverlappingRanges { first: (u32, u32), second: (u32, u32) },
    UnknownIdnaStatus { status: String },
    /// A line matched the record shape but one of its fields did not parse.
    InvalidField { file: &'static str, line: usize, field: String },
}

impl Error {
    pub fn invalid_field(file: &'static str, line: usize, field: &str) -> Self {
        Error::InvalidField { file, line, field: field.to_string() }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "{err}"),
            Error::MissingVersion { path } => {
                write!(f, "no Unicode version found in {}", path.display())
            }
            Error::OverlappingRanges { first, second } => write!(
                f,
                "overlapping ranges U+{:04X}..U+{:04X} and U+{:04X}..U+{:04X}",
                first.0, first.1, second.0, second.1
            ),
            Error::UnknownIdnaStatus { status } => {
                write!(f, "unknown IDNA mapping status {status:?}")
            }
            Error::InvalidField { file, line, field } => {
                write!(f, "{file}:{line}: invalid field {field:?}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
