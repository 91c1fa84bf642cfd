//! Per-scan timing sample and the token handle used to amend it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scan attempt's timing record.
///
/// A sample is created when the capture phase completes
/// (`PerfMonitor::record_scan_time`) and amended in place as the
/// processing and lookup phases report their durations. All durations
/// are milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSample {
    /// Capture-to-detection latency (ms)
    pub scan_time_ms: f64,
    /// Image-enhancement latency (ms, 0 until reported)
    pub processing_time_ms: f64,
    /// Data-store lookup latency (ms, 0 until reported)
    pub lookup_time_ms: f64,
    /// Running sum of the phases reported so far (ms)
    pub total_time_ms: f64,
    /// Instantaneous frame rate at sample creation
    pub frame_rate: f64,
    /// Monotonic sample sequence number within the session
    pub seq: u64,
    /// Wall-clock creation time
    pub timestamp: DateTime<Utc>,
}

impl ScanSample {
    /// Create a sample for a freshly completed capture phase.
    pub fn new(scan_time_ms: f64, frame_rate: f64, seq: u64) -> Self {
        Self {
            scan_time_ms,
            processing_time_ms: 0.0,
            lookup_time_ms: 0.0,
            total_time_ms: scan_time_ms,
            frame_rate,
            seq,
            timestamp: Utc::now(),
        }
    }
}

/// Handle to a specific sample, returned by `record_scan_time`.
///
/// Passing the token back into `record_processing_time_for` /
/// `record_lookup_time_for` removes the "amend the most recent sample"
/// ambiguity when phase completions interleave across scans. Amending a
/// token whose sample has been evicted is a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanToken(pub(crate) u64);

impl ScanToken {
    /// Sequence number of the sample this token names.
    pub fn seq(self) -> u64 {
        self.0
    }
}
