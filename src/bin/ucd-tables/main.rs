// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::ffi::OsStr;
use std::path::PathBuf;

use anyhow::{Context, bail};
use tracing_subscriber::EnvFilter;
use ucd_tables::compiler::Compiler;
use ucd_tables::config::{Component, Config};
use ucd_tables::emit;

const HELP: &str = "\
Usage: ucd-tables [options...] <ucd|idna>...
  -h, --help            Prints help information
  --ucd-dir=<path>      UCD data directory (default: data/ucd)
  --idna-dir=<path>     IDNA data directory (default: data/idna)
  --out-dir=<path>      Output root for emitted tables (default: tables)
  --check               Validate normalization tables against NormalizationTest.txt

The UCD directory must contain ReadMe.txt, UnicodeData.txt, DerivedAge.txt,
DerivedNormalizationProps.txt and test/NormalizationTest.txt. Download them at:
  https://www.unicode.org/Public/UCD/latest/ucd/
The IDNA directory must contain ReadMe.txt and IdnaMappingTable.txt:
  https://www.unicode.org/Public/idna/latest/
";

fn path_arg(s: &OsStr) -> Result<PathBuf, &'static str> {
    Ok(s.into())
}

fn parse_args() -> anyhow::Result<Option<Config>> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        eprint!("{HELP}");
        return Ok(None);
    }

    let mut config = Config::default();
    if let Some(dir) = args.opt_value_from_os_str("--ucd-dir", path_arg)? {
        config.ucd_dir = dir;
    }
    if let Some(dir) = args.opt_value_from_os_str("--idna-dir", path_arg)? {
        config.idna_dir = dir;
    }
    if let Some(dir) = args.opt_value_from_os_str("--out-dir", path_arg)? {
        config.out_dir = dir;
    }
    config.check = args.contains("--check");

    for arg in args.finish() {
        let Some(component) = arg.to_str().and_then(Component::parse) else {
            bail!("unrecognized argument: {:?}", arg);
        };
        if !config.components.contains(&component) {
            config.components.push(component);
        }
    }
    if config.components.is_empty() && !config.check {
        bail!("no components given, see --help");
    }

    Ok(Some(config))
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(config) = parse_args()? else {
        return Ok(());
    };
    let compiler = Compiler::new(config);

    let written = emit::emit(&compiler).with_context(|| {
        format!("failed to compile tables into {}", compiler.config().out_dir.display())
    })?;
    tracing::info!(files = written.len(), "done");

    if compiler.config().check {
        let mismatches =
            compiler.check_normalization().context("failed to validate normalization tables")?;
        for m in &mismatches {
            tracing::error!(
                source = %format!("{:04X?}", m.source),
                form = %m.form,
                input = %format!("{:04X?}", m.input),
                expected = %format!("{:04X?}", m.expected),
                actual = %format!("{:04X?}", m.actual),
                "normalization mismatch"
            );
        }
        if !mismatches.is_empty() {
            bail!("{} normalization mismatches", mismatches.len());
        }
        tracing::info!("normalization tables match NormalizationTest.txt");
    }

    Ok(())
}
