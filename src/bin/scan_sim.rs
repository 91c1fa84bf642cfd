//! Scan Session Simulation
//!
//! Generates synthetic scan-session telemetry for exercising scanwatch.
//! Simulates various field conditions including:
//! - Healthy sessions (all metrics within target)
//! - Degraded capture (slow camera-to-detection latency)
//! - Slow lookups (overloaded asset database)
//! - Overloaded devices (every phase past its threshold)
//!
//! # Usage
//! ```bash
//! ./scan-sim --scenario degraded --scans 200 --seed 42
//! ./scan-sim --scenario healthy --format json
//! ```

use anyhow::Result;
use clap::{Parser, ValueEnum};
use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use serde_json::json;

use scanwatch::monitor::{autotune, bottlenecks, grading, stats};
use scanwatch::{PerfMonitor, ScanMode, ScanSession, ScanSource, ScanwatchConfig};

// ============================================================================
// Session Constants
// ============================================================================

/// Simulated wall-clock spent per scan attempt beyond its measured phases (ms)
const INTER_SCAN_GAP_MS: f64 = 150.0;
/// Barcode pool size; smaller pools produce more batch duplicates
const BARCODE_POOL: u64 = 64;
/// First 9-digit cylinder barcode in the synthetic pool
const BARCODE_BASE: u64 = 100_000_001;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "scan-sim")]
#[command(about = "Synthetic scan-session telemetry generator for scanwatch")]
#[command(version = "1.0")]
struct Args {
    /// Field condition to simulate
    #[arg(long, value_enum, default_value = "healthy")]
    scenario: Scenario,

    /// Number of scan attempts to simulate (1-10000)
    #[arg(short, long, default_value = "100", value_parser = clap::value_parser!(u32).range(1..=10_000))]
    scans: u32,

    /// Frame-rate goal the session starts with (1-60)
    #[arg(short, long, default_value = "15", value_parser = clap::value_parser!(u32).range(1..=60))]
    target_fps: u32,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,
}

// ============================================================================
// Scenarios
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// All metrics within target
    Healthy,
    /// Capture and processing latency past the warning bands
    Degraded,
    /// Asset-database lookups dominate the scan time
    SlowLookup,
    /// Every phase past its threshold, frame rate collapsed
    Overloaded,
}

impl Scenario {
    fn name(self) -> &'static str {
        match self {
            Scenario::Healthy => "Healthy Session (all metrics within target)",
            Scenario::Degraded => "Degraded Capture (slow camera-to-detection)",
            Scenario::SlowLookup => "Slow Lookups (overloaded asset database)",
            Scenario::Overloaded => "Overloaded Device (every phase past threshold)",
        }
    }

    /// Phase-timing distributions and the fraction of the frame-rate goal
    /// the simulated device actually achieves.
    fn profile(self) -> Result<ScenarioProfile> {
        let (scan, processing, lookup, fps_factor) = match self {
            Scenario::Healthy => ((60.0, 10.0), (40.0, 8.0), (15.0, 4.0), 1.0),
            Scenario::Degraded => ((150.0, 20.0), (120.0, 20.0), (35.0, 8.0), 0.7),
            Scenario::SlowLookup => ((70.0, 10.0), (50.0, 10.0), (120.0, 25.0), 0.9),
            Scenario::Overloaded => ((280.0, 40.0), (450.0, 60.0), (130.0, 30.0), 0.4),
        };
        Ok(ScenarioProfile {
            scan_time: Normal::new(scan.0, scan.1)?,
            processing_time: Normal::new(processing.0, processing.1)?,
            lookup_time: Normal::new(lookup.0, lookup.1)?,
            fps_factor,
        })
    }
}

struct ScenarioProfile {
    scan_time: Normal<f64>,
    processing_time: Normal<f64>,
    lookup_time: Normal<f64>,
    fps_factor: f64,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let profile = args.scenario.profile()?;

    let mut rng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    tracing::info!(scenario = args.scenario.name(), scans = args.scans, "simulation start");

    let config = ScanwatchConfig::load();
    let mut monitor = PerfMonitor::new(args.target_fps, config.monitor.history_size);

    let mut session = ScanSession::new(scanwatch::config::SessionConfig {
        mode: ScanMode::Batch,
        ..config.session.clone()
    });
    session.start_batch();

    // Simulated clocks. Phase timings are synthetic, so session rates are
    // computed against this clock rather than the monitor's wall clock.
    let mut sim_elapsed_ms = 0.0;
    let mut sim_frames = 0.0;
    let mut suppressed: u32 = 0;

    for i in 0..args.scans {
        let scan_ms = profile.scan_time.sample(&mut rng).max(0.0);
        let processing_ms = profile.processing_time.sample(&mut rng).max(0.0);
        let lookup_ms = profile.lookup_time.sample(&mut rng).max(0.0);

        let token = monitor.record_scan_time(scan_ms);
        monitor.record_processing_time_for(token, processing_ms);
        monitor.record_lookup_time_for(token, lookup_ms);

        let scan_wall_ms = scan_ms + processing_ms + lookup_ms + INTER_SCAN_GAP_MS;
        sim_elapsed_ms += scan_wall_ms;
        sim_frames += scan_wall_ms / 1000.0 * f64::from(args.target_fps) * profile.fps_factor;

        // Duplicate-heavy pool so batch suppression has something to do
        let barcode = BARCODE_BASE + u64::from(i) % BARCODE_POOL;
        if session
            .process_scan(&barcode.to_string(), Some("org.iso.Code-128"), ScanSource::Native)
            .is_none()
        {
            suppressed += 1;
        }
    }

    let snapshot = stats::compute_stats(
        &monitor.export_metrics(),
        u64::from(args.scans),
        sim_frames as u64,
        sim_elapsed_ms / 1000.0,
        args.target_fps,
    );
    let issues = bottlenecks::detect_bottlenecks(&snapshot);
    let tuned = autotune::auto_tune(&snapshot, &issues);
    let grade = grading::performance_grade(&snapshot);
    let batch = session.complete_batch();

    match args.format.as_str() {
        "json" => {
            let report = json!({
                "scenario": format!("{:?}", args.scenario).to_lowercase(),
                "stats": snapshot,
                "issues": issues,
                "tuning": tuned,
                "grade": grade,
                "batch": batch,
                "suppressed_reads": suppressed,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => print_text_report(args.scenario, &snapshot, &issues, &tuned, &grade, &batch, suppressed),
    }

    Ok(())
}

// ============================================================================
// Text Report
// ============================================================================

fn print_text_report(
    scenario: Scenario,
    snapshot: &scanwatch::ScanStats,
    issues: &[scanwatch::BottleneckIssue],
    tuned: &scanwatch::TunedSettings,
    grade: &scanwatch::ScanGrade,
    batch: &scanwatch::BatchSummary,
    suppressed: u32,
) {
    let rule = "=".repeat(70);

    println!("{rule}");
    println!("SCAN SESSION REPORT");
    println!("  Scenario: {}", scenario.name());
    println!("{rule}");

    println!("TELEMETRY:");
    println!("  Avg scan time:       {:>8.1} ms", snapshot.avg_scan_time_ms);
    println!("  Avg processing time: {:>8.1} ms", snapshot.avg_processing_time_ms);
    println!("  Avg lookup time:     {:>8.1} ms", snapshot.avg_lookup_time_ms);
    println!("  Avg total time:      {:>8.1} ms", snapshot.avg_total_time_ms);
    println!("  P95 scan time:       {:>8.1} ms", snapshot.p95_scan_time_ms);
    println!("  Fastest / slowest:   {:.1} / {:.1} ms", snapshot.fastest_scan_ms, snapshot.slowest_scan_ms);
    println!("  Scans per second:    {:>8.2}", snapshot.scans_per_second);
    println!(
        "  FPS:                 {:.1} of {} target ({:.0}% efficiency)",
        snapshot.actual_fps, snapshot.target_fps, snapshot.fps_efficiency
    );

    println!();
    if issues.is_empty() {
        println!("BOTTLENECKS: none detected");
    } else {
        println!("BOTTLENECKS:");
        for issue in issues {
            println!("  [{:>6}] {} - {}", issue.severity.to_string().to_uppercase(), issue.kind, issue.description);
            println!("           {}", issue.recommendation);
        }
    }

    println!();
    println!("AUTO-TUNE ({} tier):", tuned.tier);
    println!("  Target FPS:       {}", tuned.target_fps);
    println!("  Downsample:       {:.1}x", tuned.downsample_factor);
    println!("  Cache size:       {}", tuned.cache_size);
    println!("  Workers:          {}", tuned.worker_count);
    println!("  Image processing: {}", if tuned.enable_image_processing { "on" } else { "off" });
    println!("  Frame skipping:   {}", if tuned.skip_similar_frames { "on" } else { "off" });
    for rec in &tuned.recommendations {
        println!("  - {rec}");
    }

    println!();
    println!("BATCH:");
    println!(
        "  {} reads accepted ({} unique), {} duplicate reads suppressed",
        batch.total_scans, batch.unique_barcodes, suppressed
    );

    println!();
    println!("GRADE: {} ({}/100)", grade.grade, grade.score);
    println!("{rule}");
}
