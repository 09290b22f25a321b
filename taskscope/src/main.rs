//! # taskscope - Main Entry Point
//!
//! Supports three operational modes:
//! - **Sequential** (default): measure each probe, write the JSON report
//! - **Concurrent** (`--concurrent`): run all probes at once, print timings
//! - **Replay** (`--replay report.json`): print a saved report

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use taskscope::analysis::{run_concurrent, SequentialAnalyzer};
use taskscope::cli::Args;
use taskscope::export::{load_report, save_report, TraceEventExporter};
use taskscope::report::{console, AnalysisReport, RUNTIME_VERSION};
use taskscope::telemetry::{CountingAllocator, RuntimeTelemetry};
use taskscope_probes::{CatalogError, ProbeCatalog};

#[global_allocator]
static ALLOC: CountingAllocator = CountingAllocator::new();

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<CatalogError>().is_some() {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

/// Standard catalog, optionally extended with the leaking probe and narrowed
/// to the names given on the command line.
fn build_catalog(args: &Args) -> Result<ProbeCatalog> {
    let mut catalog = ProbeCatalog::standard();
    if args.with_leak {
        catalog.register(ProbeCatalog::leaky_probe())?;
    }
    if args.probes.is_empty() {
        Ok(catalog)
    } else {
        Ok(catalog.select(&args.probes)?)
    }
}

fn export_trace(exporter: &TraceEventExporter, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    exporter.export(BufWriter::new(file)).context("Failed to export trace")?;
    info!("exported {} trace events to {}", exporter.event_count(), path.display());
    Ok(())
}

fn replay(path: &Path) -> Result<()> {
    let report = load_report(path)?;
    println!(
        "report: {} ({} probes, {} on {}/{})",
        path.display(),
        report.total_probes,
        report.runtime_version,
        report.os,
        report.arch
    );
    println!("recorded: {}", report.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
    console::print_report(&report);
    Ok(())
}

#[tokio::main]
async fn run() -> Result<()> {
    let args = Args::parse();
    let quiet = args.quiet;

    if let Some(ref path) = args.replay {
        return replay(path);
    }

    let catalog = build_catalog(&args)?;

    if args.list {
        for name in catalog.names() {
            println!("{name}");
        }
        return Ok(());
    }

    if !quiet {
        println!("taskscope v{}", env!("CARGO_PKG_VERSION"));
        println!("runtime: {RUNTIME_VERSION}");
        println!("probes: {}", catalog.len());
    }

    if args.concurrent {
        let timings = run_concurrent(&catalog, args.probe_timeout()).await;
        console::print_timings(&timings);

        if let Some(ref path) = args.trace {
            let mut exporter = TraceEventExporter::new();
            for timing in &timings {
                exporter.add_timing(timing);
            }
            export_trace(&exporter, path)?;
            if !quiet {
                println!("trace: {}", path.display());
            }
        }
        return Ok(());
    }

    let telemetry = RuntimeTelemetry::new();
    if !telemetry.tracks_heap() {
        warn!("heap accounting inactive; memory deltas will read zero");
    }

    let analyzer = SequentialAnalyzer::new(telemetry, args.analyzer_config());
    let results = analyzer
        .run_with_progress(&catalog, |result| {
            if !quiet {
                println!("{}", console::progress_line(result));
            }
        })
        .await;

    let report = AnalysisReport::build(results);

    let saved = save_report(&report, &args.output)
        .with_context(|| format!("report not saved to {}", args.output.display()));
    let traced = args
        .trace
        .as_ref()
        .map(|path| export_trace(&TraceEventExporter::from_results(&report.results), path).map(|()| path))
        .transpose();

    // Printed whether or not the artifacts could be written.
    console::print_report(&report);

    match (saved, traced) {
        (Err(save_err), Err(trace_err)) => {
            warn!("{trace_err:#}");
            Err(save_err)
        }
        (saved, traced) => {
            saved?;
            if let Some(path) = traced? {
                if !quiet {
                    println!("trace: {}", path.display());
                }
            }
            println!("\nsaved: {}", args.output.display());
            Ok(())
        }
    }
}
