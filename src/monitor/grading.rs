//! Deduction-based session grading
//!
//! Deterministic, rule-based score: start at 100, deduct per metric past its
//! threshold, clamp, map to a letter band. Each deduction is individually
//! capped so one pathological metric cannot zero the score on its own.

use super::thresholds::{grading as g, scan_thresholds as t};
use crate::types::{LetterGrade, ScanGrade, ScanStats};

/// Grade the snapshot.
///
/// The FPS deduction only applies once the session has observed any
/// activity (a scan or a frame). A freshly constructed monitor reports
/// `fps_efficiency` of 0 purely because nothing has happened yet; grading
/// that as a miss would start every session at C.
pub fn performance_grade(stats: &ScanStats) -> ScanGrade {
    let mut score = 100.0;

    if stats.avg_scan_time_ms > t::SCAN_TIME_WARNING_MS {
        score -= ((stats.avg_scan_time_ms - t::SCAN_TIME_WARNING_MS) / g::SCAN_TIME_MS_PER_POINT)
            .min(g::SCAN_TIME_MAX_DEDUCTION);
    }

    if stats.avg_processing_time_ms > t::PROCESSING_TIME_WARNING_MS {
        score -= ((stats.avg_processing_time_ms - t::PROCESSING_TIME_WARNING_MS)
            / g::PROCESSING_MS_PER_POINT)
            .min(g::PROCESSING_MAX_DEDUCTION);
    }

    if stats.avg_lookup_time_ms > t::LOOKUP_TIME_WARNING_MS {
        score -= ((stats.avg_lookup_time_ms - t::LOOKUP_TIME_WARNING_MS) / g::LOOKUP_MS_PER_POINT)
            .min(g::LOOKUP_MAX_DEDUCTION);
    }

    let session_active = stats.total_scans > 0 || stats.actual_fps > 0.0;
    if session_active && stats.fps_efficiency < t::FPS_EFFICIENCY_WARNING_PERCENT {
        score -= ((t::FPS_EFFICIENCY_WARNING_PERCENT - stats.fps_efficiency)
            / g::FPS_PERCENT_PER_POINT)
            .min(g::FPS_MAX_DEDUCTION);
    }

    let score = score.clamp(0.0, 100.0);

    ScanGrade {
        grade: letter_for(score),
        score: score.round() as u8,
    }
}

/// Map a clamped score to its letter band.
fn letter_for(score: f64) -> LetterGrade {
    if score >= 90.0 {
        LetterGrade::A
    } else if score >= 80.0 {
        LetterGrade::B
    } else if score >= 70.0 {
        LetterGrade::C
    } else if score >= 60.0 {
        LetterGrade::D
    } else {
        LetterGrade::F
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_session_grades_a_100() {
        let grade = performance_grade(&ScanStats::default());
        assert_eq!(grade.score, 100);
        assert_eq!(grade.grade, LetterGrade::A);
    }

    #[test]
    fn scan_time_deduction_is_proportional_and_capped() {
        let stats = ScanStats {
            avg_scan_time_ms: 150.0, // 50 over → 5 points
            fps_efficiency: 100.0,
            total_scans: 10,
            ..ScanStats::default()
        };
        assert_eq!(performance_grade(&stats).score, 95);

        let saturated = ScanStats {
            avg_scan_time_ms: 1000.0, // 900 over → capped at 20
            fps_efficiency: 100.0,
            total_scans: 10,
            ..ScanStats::default()
        };
        assert_eq!(performance_grade(&saturated).score, 80);
    }

    #[test]
    fn fps_deduction_requires_session_activity() {
        // Active session missing its frame-rate target
        let active = ScanStats {
            fps_efficiency: 40.0, // (80-40)/2 = 20 points
            total_scans: 10,
            ..ScanStats::default()
        };
        assert_eq!(performance_grade(&active).score, 80);

        // Same efficiency on a dead-fresh monitor: no deduction
        let fresh = ScanStats::default();
        assert_eq!(performance_grade(&fresh).score, 100);
    }

    #[test]
    fn deductions_accumulate_across_metrics() {
        let stats = ScanStats {
            avg_scan_time_ms: 300.0,       // capped at 20
            avg_processing_time_ms: 600.0, // capped at 20
            avg_lookup_time_ms: 125.0,     // capped at 15
            fps_efficiency: 30.0,          // capped at 25
            total_scans: 10,
            ..ScanStats::default()
        };
        let grade = performance_grade(&stats);
        assert_eq!(grade.score, 20);
        assert_eq!(grade.grade, LetterGrade::F);
    }

    #[test]
    fn letter_band_boundaries() {
        assert_eq!(letter_for(90.0), LetterGrade::A);
        assert_eq!(letter_for(89.9), LetterGrade::B);
        assert_eq!(letter_for(80.0), LetterGrade::B);
        assert_eq!(letter_for(70.0), LetterGrade::C);
        assert_eq!(letter_for(60.0), LetterGrade::D);
        assert_eq!(letter_for(59.9), LetterGrade::F);
    }
}
