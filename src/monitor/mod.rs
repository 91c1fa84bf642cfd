//! Scan performance monitor
//!
//! Caller-owned telemetry for one scanning session: the embedding client
//! records per-scan phase timings and frame ticks; aggregates, bottleneck
//! classification, auto-tuning, and grading are derived on demand. The
//! monitor is an explicit value with a single owner — construct one per
//! scan session and drop it when the session ends. Nothing here blocks,
//! locks, or performs I/O; the monitor only times the I/O done around it.
//!
//! Recording is fire-and-forget and total: bad inputs are clamped, phase
//! completions without a started scan are silent no-ops, and every query
//! is safe on a freshly constructed monitor.

pub mod autotune;
pub mod bottlenecks;
pub mod grading;
pub mod ring;
pub mod stats;
pub mod thresholds;

use std::time::{Duration, Instant};

use tracing::debug;

use crate::types::{
    BottleneckIssue, ScanGrade, ScanSample, ScanStats, ScanToken, TunedSettings,
};
use ring::SampleRing;

/// Default frame-rate goal for handheld scanning.
pub const DEFAULT_TARGET_FPS: u32 = 15;
/// Default sample-ring capacity.
pub const DEFAULT_CAPACITY: usize = 100;

/// Per-session scan performance monitor.
pub struct PerfMonitor {
    samples: SampleRing,
    target_fps: u32,
    scan_count: u64,
    frame_count: u64,
    next_seq: u64,
    session_start: Instant,
    last_frame: Instant,
}

impl Default for PerfMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_FPS, DEFAULT_CAPACITY)
    }
}

impl PerfMonitor {
    /// Create a monitor with the given frame-rate goal and ring capacity.
    pub fn new(target_fps: u32, capacity: usize) -> Self {
        let now = Instant::now();
        Self {
            samples: SampleRing::new(capacity),
            target_fps,
            scan_count: 0,
            frame_count: 0,
            next_seq: 0,
            session_start: now,
            last_frame: now,
        }
    }

    // ------------------------------------------------------------------
    // Recording
    // ------------------------------------------------------------------

    /// Record a completed capture phase, starting a new sample.
    ///
    /// Returns a token naming the sample so later phase completions can be
    /// attributed to this scan even if another scan starts in between.
    pub fn record_scan_time(&mut self, duration_ms: f64) -> ScanToken {
        let duration_ms = sanitize(duration_ms);
        let seq = self.next_seq;
        self.next_seq += 1;

        self.samples
            .push(ScanSample::new(duration_ms, self.current_fps(), seq));
        self.scan_count += 1;
        ScanToken(seq)
    }

    /// Record the image-enhancement duration for the most recent scan.
    ///
    /// No-op when no scan has started yet.
    pub fn record_processing_time(&mut self, duration_ms: f64) {
        let duration_ms = sanitize(duration_ms);
        if let Some(sample) = self.samples.last_mut() {
            sample.processing_time_ms = duration_ms;
            sample.total_time_ms += duration_ms;
        }
    }

    /// Record the lookup duration for the most recent scan.
    ///
    /// No-op when no scan has started yet.
    pub fn record_lookup_time(&mut self, duration_ms: f64) {
        let duration_ms = sanitize(duration_ms);
        if let Some(sample) = self.samples.last_mut() {
            sample.lookup_time_ms = duration_ms;
            sample.total_time_ms += duration_ms;
        }
    }

    /// Record the image-enhancement duration for a specific scan.
    ///
    /// No-op when the token's sample has been evicted.
    pub fn record_processing_time_for(&mut self, token: ScanToken, duration_ms: f64) {
        let duration_ms = sanitize(duration_ms);
        if let Some(sample) = self.samples.get_mut_by_seq(token.seq()) {
            sample.processing_time_ms = duration_ms;
            sample.total_time_ms += duration_ms;
        }
    }

    /// Record the lookup duration for a specific scan.
    ///
    /// No-op when the token's sample has been evicted.
    pub fn record_lookup_time_for(&mut self, token: ScanToken, duration_ms: f64) {
        let duration_ms = sanitize(duration_ms);
        if let Some(sample) = self.samples.get_mut_by_seq(token.seq()) {
            sample.lookup_time_ms = duration_ms;
            sample.total_time_ms += duration_ms;
        }
    }

    /// Record a processed camera frame. Independent of the sample buffer.
    pub fn record_frame(&mut self) {
        self.frame_count += 1;
        self.last_frame = Instant::now();
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// Aggregate snapshot of the session so far. Never fails, never divides
    /// by zero; a fresh monitor yields all-zero aggregates.
    pub fn stats(&self) -> ScanStats {
        stats::compute_stats(
            &self.samples.to_vec(),
            self.scan_count,
            self.frame_count,
            self.elapsed_secs(),
            self.target_fps,
        )
    }

    /// Classify current aggregates against the fixed thresholds.
    pub fn detect_bottlenecks(&self) -> Vec<BottleneckIssue> {
        bottlenecks::detect_bottlenecks(&self.stats())
    }

    /// Propose revised scan settings for the observed performance.
    pub fn auto_tune(&self) -> TunedSettings {
        let stats = self.stats();
        let issues = bottlenecks::detect_bottlenecks(&stats);
        autotune::auto_tune(&stats, &issues)
    }

    /// Grade the session 0-100 with a letter band.
    pub fn performance_grade(&self) -> ScanGrade {
        grading::performance_grade(&self.stats())
    }

    /// Completed scans per second of session wall-clock.
    pub fn scans_per_second(&self) -> f64 {
        stats::rate_per_second(self.scan_count, self.elapsed_secs())
    }

    /// Full buffer snapshot, oldest first.
    pub fn export_metrics(&self) -> Vec<ScanSample> {
        self.samples.to_vec()
    }

    /// The newest `count` samples, oldest first.
    pub fn recent_metrics(&self, count: usize) -> Vec<ScanSample> {
        self.samples.tail(count)
    }

    /// Wall-clock time since session start (or last reset).
    pub fn uptime(&self) -> Duration {
        self.session_start.elapsed()
    }

    /// Configured frame-rate goal.
    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Update the frame-rate goal (typically after applying auto-tuning).
    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps;
    }

    /// Zero the counters and clear the buffer, restarting the session
    /// clock. The monitor instance itself stays valid.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.samples.clear();
        self.scan_count = 0;
        self.frame_count = 0;
        self.next_seq = 0;
        self.session_start = now;
        self.last_frame = now;
    }

    fn elapsed_secs(&self) -> f64 {
        self.session_start.elapsed().as_secs_f64()
    }

    fn current_fps(&self) -> f64 {
        stats::rate_per_second(self.frame_count, self.elapsed_secs())
    }
}

/// Clamp negative and non-finite durations to zero.
///
/// The recording API is fire-and-forget, so garbage inputs are absorbed
/// here rather than surfaced as errors; one clamp point keeps every
/// downstream aggregate total.
fn sanitize(duration_ms: f64) -> f64 {
    if duration_ms.is_finite() && duration_ms >= 0.0 {
        duration_ms
    } else {
        debug!(value = duration_ms, "clamping invalid scan duration to 0");
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_completion_without_scan_is_a_no_op() {
        let mut monitor = PerfMonitor::default();
        monitor.record_processing_time(120.0);
        monitor.record_lookup_time(40.0);
        assert!(monitor.export_metrics().is_empty());
    }

    #[test]
    fn total_time_is_exact_sum_of_phases() {
        let mut monitor = PerfMonitor::default();
        monitor.record_scan_time(80.0);
        monitor.record_processing_time(120.0);
        monitor.record_lookup_time(40.0);

        let samples = monitor.export_metrics();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].scan_time_ms, 80.0);
        assert_eq!(samples[0].processing_time_ms, 120.0);
        assert_eq!(samples[0].lookup_time_ms, 40.0);
        assert_eq!(samples[0].total_time_ms, 240.0);
    }

    #[test]
    fn convenience_recording_amends_most_recent_scan() {
        let mut monitor = PerfMonitor::default();
        monitor.record_scan_time(10.0);
        monitor.record_scan_time(20.0);
        monitor.record_processing_time(5.0);

        let samples = monitor.export_metrics();
        assert_eq!(samples[0].processing_time_ms, 0.0);
        assert_eq!(samples[1].processing_time_ms, 5.0);
    }

    #[test]
    fn token_recording_targets_the_named_scan() {
        let mut monitor = PerfMonitor::default();
        let first = monitor.record_scan_time(10.0);
        let _second = monitor.record_scan_time(20.0);

        // Lookup for the first scan completes after the second scan started
        monitor.record_lookup_time_for(first, 7.0);

        let samples = monitor.export_metrics();
        assert_eq!(samples[0].lookup_time_ms, 7.0);
        assert_eq!(samples[0].total_time_ms, 17.0);
        assert_eq!(samples[1].lookup_time_ms, 0.0);
    }

    #[test]
    fn token_for_evicted_sample_is_a_no_op() {
        let mut monitor = PerfMonitor::new(15, 2);
        let first = monitor.record_scan_time(10.0);
        monitor.record_scan_time(20.0);
        monitor.record_scan_time(30.0); // evicts the first sample

        monitor.record_processing_time_for(first, 99.0);
        let samples = monitor.export_metrics();
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|s| s.processing_time_ms == 0.0));
    }

    #[test]
    fn buffer_holds_newest_samples_after_overflow() {
        let mut monitor = PerfMonitor::new(15, 100);
        for i in 0..150 {
            monitor.record_scan_time(f64::from(i));
        }
        let samples = monitor.export_metrics();
        assert_eq!(samples.len(), 100);
        assert_eq!(samples[0].scan_time_ms, 50.0);
        assert_eq!(samples[99].scan_time_ms, 149.0);
        assert_eq!(monitor.stats().total_scans, 150);
    }

    #[test]
    fn frame_ticks_do_not_touch_the_buffer() {
        let mut monitor = PerfMonitor::default();
        for _ in 0..10 {
            monitor.record_frame();
        }
        assert!(monitor.export_metrics().is_empty());
        assert_eq!(monitor.stats().total_scans, 0);
    }

    #[test]
    fn fresh_monitor_rates_are_zero_not_nan() {
        let monitor = PerfMonitor::default();
        let sps = monitor.scans_per_second();
        assert_eq!(sps, 0.0);
        assert!(sps.is_finite());

        let stats = monitor.stats();
        assert!(stats.scans_per_second.is_finite());
        assert!(stats.actual_fps.is_finite());
        assert!(stats.fps_efficiency.is_finite());
    }

    #[test]
    fn negative_and_non_finite_durations_are_clamped() {
        let mut monitor = PerfMonitor::default();
        monitor.record_scan_time(-50.0);
        monitor.record_processing_time(f64::NAN);
        monitor.record_lookup_time(f64::INFINITY);

        let samples = monitor.export_metrics();
        assert_eq!(samples[0].scan_time_ms, 0.0);
        assert_eq!(samples[0].processing_time_ms, 0.0);
        assert_eq!(samples[0].lookup_time_ms, 0.0);
        assert_eq!(samples[0].total_time_ms, 0.0);
    }

    #[test]
    fn reset_clears_counters_and_buffer() {
        let mut monitor = PerfMonitor::default();
        monitor.record_scan_time(10.0);
        monitor.record_frame();
        monitor.reset();

        assert!(monitor.export_metrics().is_empty());
        let stats = monitor.stats();
        assert_eq!(stats.total_scans, 0);
        assert_eq!(stats.avg_scan_time_ms, 0.0);
    }

    #[test]
    fn recent_metrics_returns_tail_slice() {
        let mut monitor = PerfMonitor::default();
        for i in 0..10 {
            monitor.record_scan_time(f64::from(i));
        }
        let recent = monitor.recent_metrics(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].scan_time_ms, 7.0);
        assert_eq!(recent[2].scan_time_ms, 9.0);
    }

    #[test]
    fn set_target_fps_feeds_the_snapshot() {
        let mut monitor = PerfMonitor::default();
        monitor.set_target_fps(30);
        assert_eq!(monitor.stats().target_fps, 30);
    }
}
