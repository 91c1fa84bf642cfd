//! Pure aggregation over the sample ring and session counters
//!
//! Every computation here guards its divisions: an empty buffer, a zero
//! elapsed time, or an unset FPS target yields 0 for the affected fields.
//! `compute_stats` takes elapsed seconds as a parameter so the monitor can
//! pass its measured wall clock while tests pin a fixed value.

use statrs::statistics::{Data, OrderStatistics};

use crate::types::{ScanSample, ScanStats};

/// Arithmetic mean of a projected field over the samples. 0 when empty.
fn mean_of(samples: &[ScanSample], field: impl Fn(&ScanSample) -> f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(field).sum::<f64>() / samples.len() as f64
}

/// 95th percentile of capture latency over the samples. 0 when empty.
fn p95_scan_time(samples: &[ScanSample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut data = Data::new(samples.iter().map(|s| s.scan_time_ms).collect::<Vec<f64>>());
    data.percentile(95)
}

/// Events per second over the elapsed session time. 0 when elapsed is 0.
pub fn rate_per_second(count: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    count as f64 / elapsed_secs
}

/// Achieved-over-target frame rate as a percentage. 0 when target is 0.
pub fn fps_efficiency(actual_fps: f64, target_fps: u32) -> f64 {
    if target_fps == 0 {
        return 0.0;
    }
    actual_fps / f64::from(target_fps) * 100.0
}

/// Build the aggregate snapshot for the given buffer contents and counters.
pub fn compute_stats(
    samples: &[ScanSample],
    scan_count: u64,
    frame_count: u64,
    elapsed_secs: f64,
    target_fps: u32,
) -> ScanStats {
    let actual_fps = rate_per_second(frame_count, elapsed_secs);

    let (fastest, slowest) = samples.iter().fold((f64::INFINITY, 0.0_f64), |(lo, hi), s| {
        (lo.min(s.scan_time_ms), hi.max(s.scan_time_ms))
    });

    ScanStats {
        avg_scan_time_ms: mean_of(samples, |s| s.scan_time_ms),
        avg_processing_time_ms: mean_of(samples, |s| s.processing_time_ms),
        avg_lookup_time_ms: mean_of(samples, |s| s.lookup_time_ms),
        avg_total_time_ms: mean_of(samples, |s| s.total_time_ms),
        p95_scan_time_ms: p95_scan_time(samples),
        scans_per_second: rate_per_second(scan_count, elapsed_secs),
        target_fps,
        actual_fps,
        fps_efficiency: fps_efficiency(actual_fps, target_fps),
        total_scans: scan_count,
        fastest_scan_ms: if samples.is_empty() { 0.0 } else { fastest },
        slowest_scan_ms: slowest,
    }
}
