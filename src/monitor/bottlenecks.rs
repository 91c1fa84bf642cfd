//! Threshold-based bottleneck classification
//!
//! Pure function of an aggregate snapshot. Issues are emitted in a fixed
//! order (scan, processing, lookup, FPS) so downstream consumers and session
//! reports are stable run to run; they are not severity-sorted.

use super::thresholds::scan_thresholds as t;
use crate::types::{BottleneckIssue, BottleneckKind, ScanStats, Severity};

/// Classify the snapshot against the fixed field thresholds.
///
/// A metric inside its threshold emits nothing. The FPS-efficiency severity
/// bands are: high below 50%, medium in [50, 65), low in [65, 80).
pub fn detect_bottlenecks(stats: &ScanStats) -> Vec<BottleneckIssue> {
    let mut issues = Vec::new();

    if stats.avg_scan_time_ms > t::SCAN_TIME_WARNING_MS {
        let severity = if stats.avg_scan_time_ms > t::SCAN_TIME_HIGH_MS {
            Severity::High
        } else {
            Severity::Medium
        };
        issues.push(BottleneckIssue {
            kind: BottleneckKind::SlowScan,
            severity,
            description: format!(
                "Average scan time is {:.0}ms (target: < {:.0}ms)",
                stats.avg_scan_time_ms,
                t::SCAN_TIME_WARNING_MS
            ),
            recommendation: "Consider reducing image processing or enabling frame skipping"
                .to_string(),
            value: stats.avg_scan_time_ms,
            threshold: t::SCAN_TIME_WARNING_MS,
        });
    }

    if stats.avg_processing_time_ms > t::PROCESSING_TIME_WARNING_MS {
        let severity = if stats.avg_processing_time_ms > t::PROCESSING_TIME_HIGH_MS {
            Severity::High
        } else {
            Severity::Medium
        };
        issues.push(BottleneckIssue {
            kind: BottleneckKind::SlowProcessing,
            severity,
            description: format!(
                "Average processing time is {:.0}ms (target: < {:.0}ms)",
                stats.avg_processing_time_ms,
                t::PROCESSING_TIME_WARNING_MS
            ),
            recommendation: "Disable image enhancements or reduce resolution".to_string(),
            value: stats.avg_processing_time_ms,
            threshold: t::PROCESSING_TIME_WARNING_MS,
        });
    }

    if stats.avg_lookup_time_ms > t::LOOKUP_TIME_WARNING_MS {
        let severity = if stats.avg_lookup_time_ms > t::LOOKUP_TIME_HIGH_MS {
            Severity::High
        } else {
            Severity::Medium
        };
        issues.push(BottleneckIssue {
            kind: BottleneckKind::SlowLookup,
            severity,
            description: format!(
                "Average lookup time is {:.0}ms (target: < {:.0}ms)",
                stats.avg_lookup_time_ms,
                t::LOOKUP_TIME_WARNING_MS
            ),
            recommendation: "Increase cache size or preload frequent barcodes".to_string(),
            value: stats.avg_lookup_time_ms,
            threshold: t::LOOKUP_TIME_WARNING_MS,
        });
    }

    if stats.fps_efficiency < t::FPS_EFFICIENCY_WARNING_PERCENT {
        let severity = if stats.fps_efficiency < t::FPS_EFFICIENCY_HIGH_PERCENT {
            Severity::High
        } else if stats.fps_efficiency < t::FPS_EFFICIENCY_MEDIUM_PERCENT {
            Severity::Medium
        } else {
            Severity::Low
        };
        issues.push(BottleneckIssue {
            kind: BottleneckKind::LowFps,
            severity,
            description: format!(
                "FPS efficiency is {:.0}% (target: > {:.0}%)",
                stats.fps_efficiency,
                t::FPS_EFFICIENCY_WARNING_PERCENT
            ),
            recommendation: "Reduce target FPS or optimize frame processing".to_string(),
            value: stats.fps_efficiency,
            threshold: t::FPS_EFFICIENCY_WARNING_PERCENT,
        });
    }

    issues
}
