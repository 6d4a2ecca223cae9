//! unpak - Inspect structures stored in legacy Unreal package archives
//!
//! This tool opens a package file, seeks to an offset, decodes one or more
//! values of a registered structure type and prints them as indented
//! property dumps.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;
use unpak_core::archive::DEFAULT_FORMAT_VERSION;
use unpak_core::reflect::registry;
use unpak_core::{decode_value, Archive, ArchiveConfig, DumpConfig, PropertyDumper};

/// Inspect structures stored in legacy Unreal package archives
#[derive(Parser, Debug)]
#[command(name = "unpak")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Package file to read
    #[arg(short, long, required_unless_present = "list_types")]
    file: Option<PathBuf>,

    /// Registered structure or class to decode (e.g. FVector, FBox)
    #[arg(short = 't', long = "type", required_unless_present = "list_types")]
    type_name: Option<String>,

    /// Byte offset of the first value (decimal or 0x-prefixed hex)
    #[arg(short, long, default_value = "0", value_parser = parse_offset)]
    offset: u64,

    /// Number of consecutive values to decode
    #[arg(short = 'n', long, default_value = "1")]
    count: usize,

    /// Package format version
    #[arg(long, default_value_t = DEFAULT_FORMAT_VERSION)]
    format_version: i32,

    /// Licensee (per-game) version
    #[arg(long, default_value = "0")]
    licensee_version: i32,

    /// Refuse to read past this offset (0 = no limit)
    #[arg(long, default_value = "0", value_parser = parse_offset)]
    stopper: u64,

    /// List the registered structure and class names, then exit
    #[arg(long)]
    list_types: bool,

    /// Prefix each property with its declaration index
    #[arg(long)]
    show_prop_index: bool,

    /// Prefix each property with its type
    #[arg(long)]
    show_prop_type: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(long, value_enum, default_value = "dump")]
    format: OutputFormat,
}

/// Output format for decoded values
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Full property dump
    Dump,
    /// One line per value: offset, size and field count
    Summary,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    inspect(&cli, &mut stdout.lock())
}

/// Runs the command described by `cli`, writing results to `out`
fn inspect(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let registry = registry::read();

    if cli.list_types {
        for name in registry.class_names() {
            writeln!(out, "{}", name)?;
        }
        return Ok(());
    }

    let file = cli.file.as_deref().context("--file is required")?;
    let type_name = cli.type_name.as_deref().context("--type is required")?;

    let ty = match registry.find_struct_type(type_name)? {
        Some(ty) => ty,
        None => registry
            .find_class_type(type_name, true)?
            .with_context(|| format!("No registered structure or class named '{}'", type_name))?,
    };
    debug!("Decoding {} as {}", type_name, ty.name);

    let config = ArchiveConfig::new()
        .format_version(cli.format_version)
        .licensee_version(cli.licensee_version)
        .stopper(cli.stopper);
    let mut ar = Archive::open(file, config)
        .with_context(|| format!("Failed to open package: {}", file.display()))?;
    ar.seek(cli.offset)
        .with_context(|| format!("Failed to seek to offset {}", cli.offset))?;

    let dump_config = DumpConfig::new()
        .show_prop_index(cli.show_prop_index)
        .show_prop_type(cli.show_prop_type);
    let dumper = PropertyDumper::new(&registry).with_config(dump_config);

    for i in 0..cli.count {
        let start = ar.position();
        let value = decode_value(&mut ar, &registry, &ty).with_context(|| {
            format!("Failed to decode {}[{}] at offset 0x{:x}", ty.name, i, start)
        })?;

        match cli.format {
            OutputFormat::Dump => {
                write!(out, "{}[{}] @ 0x{:x} =", ty.name, i, start)?;
                out.write_all(dumper.dump(&ty, &value)?.as_bytes())?;
            }
            OutputFormat::Summary => {
                writeln!(
                    out,
                    "{}[{}] @ 0x{:x}: {} bytes, {} fields",
                    ty.name,
                    i,
                    start,
                    ar.position() - start,
                    value.len()
                )?;
            }
        }
    }

    info!(
        "Decoded {} x {} ({} bytes)",
        cli.count,
        ty.name,
        ar.position() - cli.offset
    );
    Ok(())
}

/// Parses a decimal or `0x`-prefixed hexadecimal offset
fn parse_offset(s: &str) -> std::result::Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid offset '{}': {}", s, e))
}
