// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Writes the compiled tables as Rust expression fragments (`.rsv`),
//! meant to be pulled into a crate with `include!`.
//!
//! Every fragment is a single expression preceded by a comment naming the
//! Unicode version it was generated from. The output contains nothing that
//! varies between runs, so regenerating unchanged data yields identical files.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use indoc::writedoc;

use crate::apperr;
use crate::compiler::Compiler;
use crate::config::{Component, Config};
use crate::idna::IdnaRange;
use crate::lookup::LookupTables;
use crate::ranges::ValueRange;
use crate::version::UnicodeVersion;

pub const CORE_DIR: &str = "core";
pub const AGE_DIR: &str = "age";
pub const BIDI_DIR: &str = "bidi";
pub const CATEGORY_DIR: &str = "category";
pub const NORMAL_DIR: &str = "normal";
pub const IDNA_DIR: &str = "idna";

/// Formats a codepoint as a `char` literal, e.g. `'\u{1E14}'`.
pub fn char_literal(cp: u32) -> String {
    format!("'\\u{{{cp:X}}}'")
}

fn header(buf: &mut String, version: &UnicodeVersion) {
    _ = writeln!(buf, "// Generated by ucd-tables from Unicode {version}. Do not edit.");
}

/// Renders `rows` as a slice expression, one row per line.
fn render_table<T>(
    version: &UnicodeVersion,
    rows: impl IntoIterator<Item = T>,
    mut row: impl FnMut(&mut String, T),
) -> String {
    let mut buf = String::new();
    _ = writedoc!(
        buf,
        "
        // Generated by ucd-tables from Unicode {}. Do not edit.
        &[
        ",
        version,
    );
    for r in rows {
        buf.push_str("    ");
        row(&mut buf, r);
        buf.push_str(",\n");
    }
    buf.push_str("]\n");
    buf
}

fn render_ranges<V>(
    version: &UnicodeVersion,
    table: &[ValueRange<V>],
    mut value: impl FnMut(&V) -> String,
) -> String {
    render_table(version, table, |buf, r| {
        _ = write!(buf, "({}, {}, {})", char_literal(r.from), char_literal(r.to), value(&r.value));
    })
}

fn render_version(version: &UnicodeVersion) -> String {
    let mut buf = String::new();
    header(&mut buf, version);
    _ = writeln!(
        buf,
        "UnicodeVersion {{ major: {}, minor: {}, micro: {} }}",
        version.major, version.minor, version.micro,
    );
    buf
}

/// Renders the `(char, offset, count)` table and its values array.
fn render_lookup<T>(
    version: &UnicodeVersion,
    tables: &LookupTables<T>,
    mut value: impl FnMut(&T) -> String,
) -> (String, String) {
    let lookup = render_table(version, &tables.lookup, |buf, e| {
        _ = write!(buf, "({}, {}, {})", char_literal(e.codepoint), e.offset, e.count);
    });
    let values = render_table(version, &tables.values, |buf, v| buf.push_str(&value(v)));
    (lookup, values)
}

fn render_idna_map(version: &UnicodeVersion, ranges: &[IdnaRange]) -> String {
    render_table(version, ranges, |buf, r| {
        _ = write!(
            buf,
            "Range {{ from: {}, to: {}, mapping: {}",
            char_literal(r.from),
            char_literal(r.to),
            r.status,
        );
        if let Some(slice) = r.mapping {
            _ = write!(
                buf,
                "(StringTableSlice {{ byte_start: {}, byte_len: {} }})",
                slice.byte_start, slice.byte_len,
            );
        }
        buf.push_str(" }");
    })
}

fn render_string_pool(version: &UnicodeVersion, buffer: &str) -> String {
    let mut buf = String::new();
    header(&mut buf, version);
    // Debug formatting produces a valid Rust string literal.
    _ = writeln!(buf, "{buffer:?}");
    buf
}

struct Writer {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl Writer {
    fn new(config: &Config, component: &str) -> apperr::Result<Self> {
        let dir = config.out_component_dir(component);
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, written: Vec::new() })
    }

    fn write(&mut self, name: &str, contents: &str) -> apperr::Result<()> {
        let path = self.dir.join(name);
        fs::write(&path, contents)?;
        tracing::info!(path = %path.display(), bytes = contents.len(), "wrote table");
        self.written.push(path);
        Ok(())
    }
}

/// Emits every component selected in the compiler's configuration and
/// returns the paths written, in order.
pub fn emit(compiler: &Compiler) -> apperr::Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if compiler.config().wants(Component::Ucd) {
        written.extend(emit_ucd(compiler)?);
    }
    if compiler.config().wants(Component::Idna) {
        written.extend(emit_idna(compiler)?);
    }
    Ok(written)
}

pub fn emit_ucd(compiler: &Compiler) -> apperr::Result<Vec<PathBuf>> {
    let config = compiler.config();
    let version = compiler.ucd_version()?;
    let version_rsv = render_version(version);
    let mut written = Vec::new();

    let mut core = Writer::new(config, CORE_DIR)?;
    core.write("unicode_version.rsv", &version_rsv)?;
    written.append(&mut core.written);

    let mut age = Writer::new(config, AGE_DIR)?;
    age.write("unicode_version.rsv", &version_rsv)?;
    age.write(
        "age_values.rsv",
        &render_ranges(version, compiler.age()?, |v| {
            format!(
                "Assigned(UnicodeVersion {{ major: {}, minor: {}, micro: 0 }})",
                v.major, v.minor
            )
        }),
    )?;
    written.append(&mut age.written);

    let mut bidi = Writer::new(config, BIDI_DIR)?;
    let bidi_class = compiler.bidi_class()?;
    let mut classes: Vec<&str> = bidi_class.iter().map(|r| r.value.as_str()).collect();
    classes.sort_unstable();
    classes.dedup();
    bidi.write("unicode_version.rsv", &version_rsv)?;
    bidi.write(
        "bidi_class_type.rsv",
        &render_table(version, classes, |buf, class| buf.push_str(class)),
    )?;
    bidi.write("bidi_class_values.rsv", &render_ranges(version, bidi_class, String::clone))?;
    written.append(&mut bidi.written);

    let mut category = Writer::new(config, CATEGORY_DIR)?;
    category.write("unicode_version.rsv", &version_rsv)?;
    category.write(
        "general_category.rsv",
        &render_ranges(version, compiler.general_category()?, String::clone),
    )?;
    written.append(&mut category.written);

    let mut normal = Writer::new(config, NORMAL_DIR)?;
    let info = compiler.normal_form_info()?;
    normal.write("unicode_version.rsv", &version_rsv)?;
    normal.write(
        "general_category_mark.rsv",
        &render_table(version, compiler.general_category_mark()?, |buf, r| {
            _ = write!(buf, "({}, {})", char_literal(*r.start()), char_literal(*r.end()));
        }),
    )?;
    normal.write(
        "canonical_combining_class_values.rsv",
        &render_ranges(version, compiler.canonical_combining_class()?, |ccc| {
            format!("CanonicalCombiningClass({ccc})")
        }),
    )?;
    normal.write(
        "compatibility_decomposition_type_values.rsv",
        &render_ranges(version, &info.compatibility_decomposition_type, String::clone),
    )?;

    let decompositions = [
        ("canonical_decomposition_mapping", compiler.canonical_decomposition_tables()?),
        ("compatibility_decomposition_mapping", compiler.compatibility_decomposition_tables()?),
    ];
    for (name, tables) in decompositions {
        let (lookup, values) = render_lookup(version, tables, |&cp| char_literal(cp));
        normal.write(&format!("{name}_lookup.rsv"), &lookup)?;
        normal.write(&format!("{name}_values.rsv"), &values)?;
    }

    let composition = compiler.canonical_composition_tables()?;
    let (lookup, values) = render_lookup(version, composition, |&(second, composite)| {
        format!("({}, {})", char_literal(second), char_literal(composite))
    });
    normal.write("canonical_composition_mapping_lookup.rsv", &lookup)?;
    normal.write("canonical_composition_mapping_values.rsv", &values)?;
    written.append(&mut normal.written);

    Ok(written)
}

pub fn emit_idna(compiler: &Compiler) -> apperr::Result<Vec<PathBuf>> {
    let version = compiler.idna_version()?;
    let mapping = compiler.idna_mapping()?;

    let mut idna = Writer::new(compiler.config(), IDNA_DIR)?;
    idna.write("unicode_version.rsv", &render_version(version))?;
    idna.write("idna_map.rsv", &render_idna_map(version, &mapping.ranges))?;
    idna.write("idna_map_string.rsv", &render_string_pool(version, mapping.strings.buffer()))?;

    tracing::debug!(
        ranges = mapping.ranges.len(),
        strings = mapping.strings.len(),
        bytes = mapping.strings.buffer().len(),
        "emitted IDNA tables"
    );

    Ok(idna.written)
}
