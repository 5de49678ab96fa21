// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Where the data files live and what to generate.

use std::fmt;
use std::path::{Path, PathBuf};

pub const README: &str = "ReadMe.txt";
pub const UNICODE_DATA: &str = "UnicodeData.txt";
pub const DERIVED_AGE: &str = "DerivedAge.txt";
pub const DERIVED_NORMALIZATION_PROPS: &str = "DerivedNormalizationProps.txt";
pub const NORMALIZATION_TEST: &str = "NormalizationTest.txt";
pub const IDNA_MAPPING_TABLE: &str = "IdnaMappingTable.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Component {
    Ucd,
    Idna,
}

impl Component {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ucd" => Some(Self::Ucd),
            "idna" => Some(Self::Idna),
            _ => None,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ucd => "ucd",
            Self::Idna => "idna",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub ucd_dir: PathBuf,
    pub idna_dir: PathBuf,
    pub out_dir: PathBuf,
    pub components: Vec<Component>,
    /// Validate the decomposition tables against `NormalizationTest.txt`.
    pub check: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ucd_dir: PathBuf::from("data/ucd"),
            idna_dir: PathBuf::from("data/idna"),
            out_dir: PathBuf::from("tables"),
            components: Vec::new(),
            check: false,
        }
    }
}

impl Config {
    pub fn ucd_file(&self, name: &str) -> PathBuf {
        self.ucd_dir.join(name)
    }

    /// Test data sits in a `test` subdirectory of the UCD directory.
    pub fn ucd_test_file(&self, name: &str) -> PathBuf {
        self.ucd_dir.join("test").join(name)
    }

    pub fn idna_file(&self, name: &str) -> PathBuf {
        self.idna_dir.join(name)
    }

    pub fn out_component_dir(&self, component: &str) -> PathBuf {
        self.out_dir.join(component)
    }

    pub fn wants(&self, component: Component) -> bool {
        self.components.contains(&component)
    }

    pub fn with_data_root(root: &Path) -> Self {
        Self { ucd_dir: root.join("ucd"), idna_dir: root.join("idna"), ..Self::default() }
    }
}
