// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The pipeline driver. Every derived table is computed on first access
//! and shared by reference with everything downstream of it.

use std::cell::OnceCell;
use std::ops::RangeInclusive;

use crate::apperr;
use crate::config::{self, Config};
use crate::conformance::{self, Mismatch, NormalizationTests, Normalizer};
use crate::idna::IdnaMapping;
use crate::lookup::LookupTables;
use crate::normal::{self, CompositionMapping, NormalFormInfo, NormalizationProperty};
use crate::properties::{self, Age};
use crate::ranges::ValueRange;
use crate::unicode_data::UnicodeData;
use crate::version::UnicodeVersion;

fn memoize<T>(
    cell: &OnceCell<T>,
    init: impl FnOnce() -> apperr::Result<T>,
) -> apperr::Result<&T> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = init()?;
    Ok(cell.get_or_init(|| value))
}

#[derive(Default)]
pub struct Compiler {
    config: Config,
    ucd_version: OnceCell<UnicodeVersion>,
    idna_version: OnceCell<UnicodeVersion>,
    unicode_data: OnceCell<UnicodeData>,
    age: OnceCell<Vec<ValueRange<Age>>>,
    bidi_class: OnceCell<Vec<ValueRange<String>>>,
    general_category: OnceCell<Vec<ValueRange<String>>>,
    general_category_mark: OnceCell<Vec<RangeInclusive<u32>>>,
    combining_class: OnceCell<Vec<ValueRange<u8>>>,
    normal_form_info: OnceCell<NormalFormInfo>,
    composition_exclusions: OnceCell<NormalizationProperty>,
    canonical_composition: OnceCell<CompositionMapping>,
    canonical_decomposition_tables: OnceCell<LookupTables<u32>>,
    compatibility_decomposition_tables: OnceCell<LookupTables<u32>>,
    canonical_composition_tables: OnceCell<LookupTables<(u32, u32)>>,
    idna_mapping: OnceCell<IdnaMapping>,
}

impl Compiler {
    pub fn new(config: Config) -> Self {
        Self { config, ..Default::default() }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn ucd_version(&self) -> apperr::Result<&UnicodeVersion> {
        memoize(&self.ucd_version, || UnicodeVersion::load(&self.config.ucd_file(config::README)))
    }

    pub fn idna_version(&self) -> apperr::Result<&UnicodeVersion> {
        memoize(&self.idna_version, || {
            UnicodeVersion::load(&self.config.idna_file(config::README))
        })
    }

    pub fn unicode_data(&self) -> apperr::Result<&UnicodeData> {
        memoize(&self.unicode_data, || {
            UnicodeData::load(&self.config.ucd_file(config::UNICODE_DATA))
        })
    }

    pub fn age(&self) -> apperr::Result<&[ValueRange<Age>]> {
        memoize(&self.age, || properties::load_age(&self.config.ucd_file(config::DERIVED_AGE)))
            .map(Vec::as_slice)
    }

    pub fn bidi_class(&self) -> apperr::Result<&[ValueRange<String>]> {
        memoize(&self.bidi_class, || properties::bidi_class(self.unicode_data()?))
            .map(Vec::as_slice)
    }

    pub fn general_category(&self) -> apperr::Result<&[ValueRange<String>]> {
        memoize(&self.general_category, || properties::general_category(self.unicode_data()?))
            .map(Vec::as_slice)
    }

    pub fn general_category_mark(&self) -> apperr::Result<&[RangeInclusive<u32>]> {
        memoize(&self.general_category_mark, || {
            Ok(properties::general_category_mark(self.unicode_data()?))
        })
        .map(Vec::as_slice)
    }

    pub fn canonical_combining_class(&self) -> apperr::Result<&[ValueRange<u8>]> {
        memoize(&self.combining_class, || {
            properties::canonical_combining_class(self.unicode_data()?)
        })
        .map(Vec::as_slice)
    }

    pub fn normal_form_info(&self) -> apperr::Result<&NormalFormInfo> {
        memoize(&self.normal_form_info, || normal::normal_form_info(self.unicode_data()?))
    }

    pub fn composition_exclusions(&self) -> apperr::Result<&NormalizationProperty> {
        memoize(&self.composition_exclusions, || {
            NormalizationProperty::load(
                &self.config.ucd_file(config::DERIVED_NORMALIZATION_PROPS),
                normal::FULL_COMPOSITION_EXCLUSION,
            )
        })
    }

    pub fn canonical_composition(&self) -> apperr::Result<&CompositionMapping> {
        memoize(&self.canonical_composition, || {
            let info = self.normal_form_info()?;
            let exclusions = self.composition_exclusions()?;
            Ok(normal::canonical_composition(&info.canonical_decomposition, exclusions))
        })
    }

    pub fn canonical_decomposition_tables(&self) -> apperr::Result<&LookupTables<u32>> {
        memoize(&self.canonical_decomposition_tables, || {
            Ok(LookupTables::build(&self.normal_form_info()?.canonical_decomposition))
        })
    }

    pub fn compatibility_decomposition_tables(&self) -> apperr::Result<&LookupTables<u32>> {
        memoize(&self.compatibility_decomposition_tables, || {
            Ok(LookupTables::build(&self.normal_form_info()?.compatibility_decomposition))
        })
    }

    /// Values are `(second, composed)` pairs. Each first codepoint's run is
    /// sorted by `second` so lookups can binary search it.
    pub fn canonical_composition_tables(&self) -> apperr::Result<&LookupTables<(u32, u32)>> {
        memoize(&self.canonical_composition_tables, || {
            let mapping = self.canonical_composition()?;
            Ok(LookupTables::build_with(mapping, |_, pairs| pairs.sort_by_key(|p| p.0)))
        })
    }

    pub fn idna_mapping(&self) -> apperr::Result<&IdnaMapping> {
        memoize(&self.idna_mapping, || {
            IdnaMapping::load(&self.config.idna_file(config::IDNA_MAPPING_TABLE))
        })
    }

    /// Runs the normalization tables against `NormalizationTest.txt`.
    pub fn check_normalization(&self) -> apperr::Result<Vec<Mismatch>> {
        let tests =
            NormalizationTests::load(&self.config.ucd_test_file(config::NORMALIZATION_TEST))?;
        let info = self.normal_form_info()?;
        let normalizer = Normalizer {
            canonical: &info.canonical_decomposition,
            compatibility: &info.compatibility_decomposition,
            combining_class: self.canonical_combining_class()?,
            composition: self.canonical_composition_tables()?,
        };
        Ok(conformance::validate(&tests, &normalizer))
    }
}
