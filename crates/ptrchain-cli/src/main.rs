mod hex_utils;
mod prompter;
mod scan;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use ptrchain_core::WordWidth;
use ptrchain_core::report::DEFAULT_MODULE_NAME;
use tracing_subscriber::EnvFilter;

use crate::hex_utils::parse_offset;
use crate::scan::ScanOptions;

#[derive(Parser, Debug)]
#[command(name = "ptrchain")]
#[command(about = "Pointer chain scanner", version)]
struct Args {
    /// Memory snapshot to search (JSON)
    #[arg(short, long, env = "PTRCHAIN_SNAPSHOT")]
    snapshot: PathBuf,

    /// Target package name (prompted if absent and not in the snapshot)
    #[arg(short, long, env = "PTRCHAIN_PACKAGE")]
    package: Option<String>,

    /// Chain depth, root included (prompted if absent)
    #[arg(short, long, env = "PTRCHAIN_DEPTH")]
    depth: Option<u32>,

    /// Maximum offset, decimal or 0x hex (prompted if absent)
    #[arg(short = 'o', long, env = "PTRCHAIN_MAX_OFFSET", value_parser = parse_offset)]
    max_offset: Option<u64>,

    /// Word width for range lookups (32 or 64)
    #[arg(short, long, default_value_t = WordWidth::Qword)]
    width: WordWidth,

    /// Seed from an exact-value search instead of the snapshot's seed list
    #[arg(long)]
    seed_value: Option<u64>,

    /// Word width for the seed search
    #[arg(long, default_value_t = WordWidth::Dword)]
    seed_width: WordWidth,

    /// Module name used in root labels
    #[arg(long, default_value = DEFAULT_MODULE_NAME)]
    module: String,

    /// Module load address used in root labels
    #[arg(long, default_value = "0x10000000", value_parser = parse_offset)]
    module_base: u64,

    /// Stop expanding after this many range lookups
    #[arg(long, env = "PTRCHAIN_MAX_LOOKUPS")]
    max_lookups: Option<u64>,

    /// Abort the whole run on the first unreadable node
    #[arg(long)]
    fail_fast: bool,

    /// Also write the chains as a JSON tree
    #[arg(long)]
    json: Option<PathBuf>,
}

impl From<Args> for ScanOptions {
    fn from(args: Args) -> Self {
        ScanOptions {
            snapshot: args.snapshot,
            package: args.package,
            depth: args.depth,
            max_offset: args.max_offset,
            width: args.width,
            seed_value: args.seed_value,
            seed_width: args.seed_width,
            module: args.module,
            module_base: args.module_base,
            max_lookups: args.max_lookups,
            fail_fast: args.fail_fast,
            json: args.json,
        }
    }
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ptrchain=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    scan::run_stdio(&args.into())
}
