// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Compiles the Unicode Character Database and the UTS #46 IDNA mapping
//! table into compact, sorted lookup tables.

pub mod apperr;
pub mod compiler;
pub mod config;
pub mod conformance;
pub mod emit;
pub mod idna;
pub mod interner;
pub mod lookup;
pub mod normal;
pub mod overlay;
pub mod properties;
pub mod ranges;
pub mod source;
pub mod unicode_data;
pub mod version;
