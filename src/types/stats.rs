//! Aggregate snapshot of a scanning session's performance

use serde::{Deserialize, Serialize};

/// On-demand aggregate view over the monitor's sample buffer and counters.
///
/// Every field is zero-guarded: an empty buffer, a zero elapsed time, or an
/// unset FPS target yields 0 for the affected fields rather than NaN or
/// infinity. Snapshots are plain data and safe to serialize for session
/// reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScanStats {
    /// Mean capture-to-detection latency over resident samples (ms)
    pub avg_scan_time_ms: f64,
    /// Mean image-enhancement latency over resident samples (ms)
    pub avg_processing_time_ms: f64,
    /// Mean lookup latency over resident samples (ms)
    pub avg_lookup_time_ms: f64,
    /// Mean end-to-end latency over resident samples (ms)
    pub avg_total_time_ms: f64,
    /// 95th percentile capture latency over resident samples (ms)
    pub p95_scan_time_ms: f64,
    /// Completed scans per second of session wall-clock
    pub scans_per_second: f64,
    /// Configured frame-rate goal
    pub target_fps: u32,
    /// Achieved frame rate over session wall-clock
    pub actual_fps: f64,
    /// actual_fps / target_fps as a percentage
    pub fps_efficiency: f64,
    /// All scans recorded this session, including evicted samples
    pub total_scans: u64,
    /// Minimum capture latency over resident samples (ms)
    pub fastest_scan_ms: f64,
    /// Maximum capture latency over resident samples (ms)
    pub slowest_scan_ms: f64,
}
