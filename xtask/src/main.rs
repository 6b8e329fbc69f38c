use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "donelist workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the loom model tests (`--cfg loom`, release mode)
    Loom {
        /// Only run tests whose name contains this string
        filter: Option<String>,

        /// Bound on preemptions explored per execution
        #[arg(long, default_value_t = 3)]
        max_preemptions: usize,
    },
    /// Run the criterion benchmarks and summarize them
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
}

const BENCH: &str = "completion_list_benchmark";

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Loom {
            filter,
            max_preemptions,
        } => run_loom(filter.as_deref(), max_preemptions)?,
        Commands::Bench { quick, report_only } => {
            if !report_only {
                run_benchmarks(quick)?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn run_loom(filter: Option<&str>, max_preemptions: usize) -> Result<()> {
    println!("Running loom models (max preemptions: {max_preemptions})...");
    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.args(["test", "--release", "--test", "loom_completion_list"])
        .env("RUSTFLAGS", "--cfg loom")
        .env("LOOM_MAX_PREEMPTIONS", max_preemptions.to_string());
    if let Some(filter) = filter {
        cmd.arg(filter);
    }

    let status = cmd.status().context("failed to launch cargo test")?;
    if !status.success() {
        bail!("loom models failed");
    }
    println!("Loom models passed in {:.2?}", start.elapsed());
    Ok(())
}

fn run_benchmarks(quick: bool) -> Result<()> {
    println!("Compiling benchmarks...");
    let status = Command::new("cargo")
        .args(["build", "--bench", BENCH, "--release"])
        .status()?;
    if !status.success() {
        bail!("Failed to compile benchmarks");
    }

    let start = Instant::now();
    let mut cmd = Command::new("cargo");
    cmd.args(["bench", "--bench", BENCH, "--"]);
    if quick {
        cmd.args(["--measurement-time", "0.1", "--noplot", "--sample-size", "10"]);
    }

    let status = cmd.status().context("Failed to run benchmarks")?;
    if !status.success() {
        bail!("Benchmarks failed");
    }
    println!("Finished benchmarks in {:.2?}", start.elapsed());
    Ok(())
}

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");
    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    // group -> (variant -> mean ns)
    let mut results: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    collect_results(criterion_dir, &mut results)?;

    let report_path = Path::new("benchmark_results/report.md");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(report_path)?;

    writeln!(file, "# Completion List Benchmark Report")?;
    for (group, variants) in &results {
        writeln!(file, "\n## {group}\n")?;
        writeln!(file, "| Benchmark | Mean |")?;
        writeln!(file, "|---|---|")?;
        for (variant, mean_ns) in variants {
            writeln!(file, "| {variant} | {} |", format_ns(*mean_ns))?;
        }
    }

    println!("Report written to {}", report_path.display());
    Ok(())
}

fn format_ns(ns: f64) -> String {
    if ns > 1_000_000.0 {
        format!("{:.2} ms", ns / 1_000_000.0)
    } else if ns > 1_000.0 {
        format!("{:.2} µs", ns / 1_000.0)
    } else {
        format!("{ns:.0} ns")
    }
}

/// Walks `target/criterion` for `new/estimates.json` files.
///
/// Layout is `<group>/<function>[/<parameter>]/new/estimates.json`.
fn collect_results(dir: &Path, results: &mut BTreeMap<String, BTreeMap<String, f64>>) -> Result<()> {
    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if path.file_name().and_then(|s| s.to_str()) != Some("report") {
                collect_results(&path, results)?;
            }
            continue;
        }
        if path.file_name().and_then(|s| s.to_str()) != Some("estimates.json") {
            continue;
        }
        let Some(run_dir) = path.parent() else { continue };
        if run_dir.file_name().and_then(|s| s.to_str()) != Some("new") {
            continue;
        }
        let Some(bench_dir) = run_dir.parent() else { continue };

        let Ok(relative) = bench_dir.strip_prefix("target/criterion") else {
            continue;
        };
        let mut parts = relative.iter().filter_map(|p| p.to_str());
        let Some(group) = parts.next() else { continue };
        let variant = parts.collect::<Vec<_>>().join("/");

        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let json: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        if let Some(mean) = json
            .get("mean")
            .and_then(|m| m.get("point_estimate"))
            .and_then(serde_json::Value::as_f64)
        {
            results
                .entry(group.to_string())
                .or_default()
                .insert(variant, mean);
        }
    }
    Ok(())
}
