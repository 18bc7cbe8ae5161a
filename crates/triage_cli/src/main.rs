//! screen-triage: sort captured screenshots into error pages, loading
//! screens, real UI, and unknown.
//!
//! ```text
//! screen-triage [OPTIONS] <PATHS>...
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use triage_core::{
    Category, ImageReport, Outcome, ScanOptions, Summary, Thresholds, analyze_batch_with_progress,
    export_csv, export_json, is_supported_image, scan_folder_with,
};

/// Classify screenshots from pixel statistics alone.
#[derive(Parser, Debug)]
#[command(name = "screen-triage", version = env!("SCREEN_TRIAGE_VERSION"))]
struct Cli {
    /// Image files or directories containing screenshots.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Descend into subdirectories.
    #[arg(short, long)]
    recursive: bool,

    /// TOML file overriding classifier thresholds.
    #[arg(long)]
    thresholds: Option<PathBuf>,

    /// Write per-image results as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write summary and per-image results as JSON.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Exit with status 1 if any screenshot is an error page, a loading
    /// screen, or could not be read.
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("screen-triage: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let thresholds = match &cli.thresholds {
        Some(path) => Thresholds::from_toml_file(path)?,
        None => Thresholds::default(),
    };

    let opts = ScanOptions {
        recursive: cli.recursive,
    };
    let files = collect_inputs(&cli.paths, opts)?;
    if files.is_empty() {
        anyhow::bail!("no screenshots found");
    }
    tracing::info!("Analyzing {} screenshots", files.len());

    let start = Instant::now();
    let reports = analyze_batch_with_progress(&files, &thresholds, |done, total| {
        tracing::debug!("{done}/{total}");
    });
    let summary = Summary::from_reports(&reports);
    tracing::info!("Done in {:.1?}", start.elapsed());

    let stdout = io::stdout();
    render_report(&mut stdout.lock(), &reports, &summary)?;

    if let Some(path) = &cli.csv {
        export_csv(&reports, path)
            .with_context(|| format!("cannot write CSV report {}", path.display()))?;
        tracing::info!("CSV written to {}", path.display());
    }
    if let Some(path) = &cli.json {
        export_json(&reports, path)
            .with_context(|| format!("cannot write JSON report {}", path.display()))?;
        tracing::info!("JSON written to {}", path.display());
    }

    if cli.strict && summary.flagged() > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Expand directories into the images they contain; keep explicit files as given.
fn collect_inputs(paths: &[PathBuf], opts: ScanOptions) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            files.extend(scan_folder_with(path, opts)?);
        } else {
            if !is_supported_image(path) {
                tracing::warn!("{} has no known image extension", path.display());
            }
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn render_report(
    out: &mut impl Write,
    reports: &[ImageReport],
    summary: &Summary,
) -> io::Result<()> {
    for report in reports {
        if let Outcome::Classified { category, stats } = &report.outcome {
            writeln!(
                out,
                "{:<10} {}  colors={} brightness={:.1} variance={:.1} common={:.3}",
                category.as_str(),
                report.file.display(),
                stats.unique_colors,
                stats.mean_brightness,
                stats.variance,
                stats.common_ratio
            )?;
        }
    }

    let failures: Vec<&ImageReport> = reports.iter().filter(|r| r.is_failure()).collect();
    if !failures.is_empty() {
        writeln!(out)?;
        writeln!(out, "Failed to analyze {} file(s):", failures.len())?;
        for report in failures {
            if let Outcome::Failed { message } = &report.outcome {
                writeln!(out, "  {}: {message}", report.file.display())?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "Total: {}", summary.total())?;
    for category in Category::ALL {
        writeln!(out, "  {:<10} {}", category.as_str(), summary.count(category))?;
    }
    writeln!(out, "  {:<10} {}", "Failed", summary.failed)?;
    writeln!(out, "Flagged: {}", summary.flagged())?;
    Ok(())
}
