//! Scan command: oracle -> builder -> report.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use ptrchain_core::{
    ChainBuilder, ChainDocument, FailurePolicy, ModuleLabel, RunReport, SearchConfig,
    SnapshotOracle, WordWidth,
};
use tracing::{info, warn};

use crate::prompter::CliPrompter;

/// Everything the scan needs, as given on the command line
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub snapshot: PathBuf,
    pub package: Option<String>,
    pub depth: Option<u32>,
    pub max_offset: Option<u64>,
    pub width: WordWidth,
    pub seed_value: Option<u64>,
    pub seed_width: WordWidth,
    pub module: String,
    pub module_base: u64,
    pub max_lookups: Option<u64>,
    pub fail_fast: bool,
    pub json: Option<PathBuf>,
}

/// Run a scan, prompting for any missing run parameter
pub fn run<R: BufRead, W: Write, O: Write>(
    opts: &ScanOptions,
    prompter: &mut CliPrompter<R, W>,
    out: &mut O,
) -> Result<()> {
    let mut oracle = SnapshotOracle::load(&opts.snapshot)?;
    if let Some(value) = opts.seed_value {
        info!("Seeding from exact {}-bit search for {}", opts.seed_width, value);
        oracle = oracle.with_seed_search(value, opts.seed_width);
    }

    let package = match opts.package.clone().or_else(|| oracle.package().map(str::to_string)) {
        Some(p) => p,
        None => prompter.prompt_text("Enter package name: ")?,
    };
    let depth = match opts.depth {
        Some(d) => d,
        None => prompter.prompt_depth("Enter chain depth (e.g., 3): ")?,
    };
    let max_offset = match opts.max_offset {
        Some(o) => o,
        None => prompter.prompt_offset("Enter max offset (e.g., 256): ")?,
    };

    let mut builder = SearchConfig::builder()
        .depth(depth)
        .max_offset(max_offset)
        .word_width(opts.width)
        .failure_policy(if opts.fail_fast {
            FailurePolicy::AbortRun
        } else {
            FailurePolicy::SkipSubtree
        });
    if let Some(limit) = opts.max_lookups {
        builder = builder.max_lookups(limit);
    }
    let config = builder.build()?;

    info!(
        "Scanning {} (depth {}, max offset 0x{:X}, {}-bit)",
        package, config.depth, config.max_offset, config.word_width
    );

    let start = Instant::now();
    let mut chain_builder = ChainBuilder::new(&oracle, &config);
    let chains = chain_builder.run()?;
    let elapsed = start.elapsed();
    let stats = chain_builder.into_stats();

    let label = ModuleLabel::new(opts.module.clone(), opts.module_base);
    let report = RunReport {
        chains: &chains,
        config: &config,
        elapsed,
        label: &label,
    };
    report.write_to(out)?;

    if !stats.failures.is_empty() {
        warn!("{} node(s) dropped due to errors", stats.failures.len());
    }
    if stats.truncated {
        warn!("Results truncated by the range lookup ceiling");
    }

    if let Some(path) = &opts.json {
        let doc = ChainDocument::new(
            Some(package),
            &config,
            elapsed.as_secs_f64(),
            &stats,
            &chains,
            &label,
        );
        doc.save(path)?;
    }

    Ok(())
}

/// Run against the process's stdin/stdout
pub fn run_stdio(opts: &ScanOptions) -> Result<()> {
    let mut prompter = CliPrompter::stdio();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(opts, &mut prompter, &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    const SNAPSHOT: &str = r#"{
      "seeds": [ { "address": 268439552, "value": "500" } ],
      "memory": [ { "address": 516, "value": "7" } ]
    }"#;

    fn options(dir: &tempfile::TempDir) -> ScanOptions {
        let snapshot = dir.path().join("snapshot.json");
        fs::write(&snapshot, SNAPSHOT).unwrap();
        ScanOptions {
            snapshot,
            package: None,
            depth: None,
            max_offset: None,
            width: WordWidth::Qword,
            seed_value: None,
            seed_width: WordWidth::Dword,
            module: "libil2cpp.so".to_string(),
            module_base: 0x1000_0000,
            max_lookups: None,
            fail_fast: false,
            json: None,
        }
    }

    fn scan(opts: &ScanOptions, input: &str) -> (String, String) {
        let mut prompter = CliPrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let mut out = Vec::new();
        run(opts, &mut prompter, &mut out).unwrap();
        let (_, prompts) = prompter.into_parts();
        (
            String::from_utf8(prompts).unwrap(),
            String::from_utf8(out).unwrap(),
        )
    }

    #[test]
    fn test_prompts_for_missing_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(&dir);

        let (prompts, report) = scan(&opts, "com.example.game\n2\n16\n");

        assert_eq!(
            prompts,
            "Enter package name: Enter chain depth (e.g., 3): Enter max offset (e.g., 256): "
        );
        assert!(report.contains("(2, 16):\n\n"));
        assert!(report.contains(
            "1: libil2cpp.so + 0x00001000 [0x10001000] -> 0x000001F4 + 0x00000010 = 7\n"
        ));
    }

    #[test]
    fn test_zero_depth_answer_is_asked_again() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(&dir);
        opts.package = Some("pkg".to_string());
        opts.max_offset = Some(16);

        let (prompts, report) = scan(&opts, "0\n1\n");

        assert_eq!(
            prompts,
            "Enter chain depth (e.g., 3): Enter chain depth (e.g., 3): "
        );
        assert!(report.contains("(1, 16):\n\n"));
    }

    #[test]
    fn test_no_prompts_when_all_given() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(&dir);
        opts.package = Some("pkg".to_string());
        opts.depth = Some(1);
        opts.max_offset = Some(16);

        let (prompts, report) = scan(&opts, "");

        assert!(prompts.is_empty());
        assert!(report.starts_with("Found 1 chains in "));
        assert!(report.contains("[0x10001000] = 500\n"));
    }

    #[test]
    fn test_json_export_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(&dir);
        opts.package = Some("pkg".to_string());
        opts.depth = Some(2);
        opts.max_offset = Some(16);
        opts.json = Some(dir.path().join("chains.json"));

        scan(&opts, "");

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("chains.json")).unwrap())
                .unwrap();
        assert_eq!(json["package"], "pkg");
        assert_eq!(json["chains"][0]["root"]["children"][0]["value_dec"], 7);
    }

    #[test]
    fn test_missing_snapshot_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(&dir);
        opts.snapshot = dir.path().join("missing.json");

        let mut prompter = CliPrompter::new(Cursor::new(Vec::<u8>::new()), Vec::<u8>::new());
        let mut out: Vec<u8> = Vec::new();
        assert!(run(&opts, &mut prompter, &mut out).is_err());
        assert!(out.is_empty());
    }
}
