//! Auto-tuning: map classified issues and raw aggregates to revised settings
//!
//! The tier decision is priority-gated, first match wins: any high-severity
//! issue forces the aggressive tier, any medium issue the moderate tier, and
//! only a session with clear headroom (efficiency above 120% with end-to-end
//! latency under 80 ms) upscales. Cache and worker adjustments are evaluated
//! independently of the tier so a session can, for example, keep its frame
//! rate and still grow its lookup cache.

use super::thresholds::tuner_thresholds as t;
use crate::types::{BottleneckIssue, ScanStats, Severity, TunedSettings, TuningTier};

/// Compute revised scan settings for the observed session.
///
/// `current_target_fps` is the monitor's configured goal, used as the basis
/// for every frame-rate adjustment. The result always carries the full
/// settings block; fields untouched by the selected tier keep their
/// baseline values.
pub fn auto_tune(stats: &ScanStats, issues: &[BottleneckIssue]) -> TunedSettings {
    let current = stats.target_fps;
    let mut recommendations = Vec::new();

    let mut target_fps = current;
    let mut downsample_factor = 1.0;
    let mut cache_size = t::BASE_CACHE_SIZE;
    let mut worker_count = t::BASE_WORKER_COUNT;
    let mut skip_similar_frames = true;
    let mut enable_image_processing = true;

    let has_high = issues.iter().any(|i| i.severity == Severity::High);
    let has_medium = issues.iter().any(|i| i.severity == Severity::Medium);

    let tier = if has_high {
        target_fps = scaled_fps_floor(current, 0.6, t::MIN_TARGET_FPS);
        downsample_factor = 2.0;
        enable_image_processing = false;
        skip_similar_frames = true;

        recommendations.push("Performance is poor - applied aggressive optimizations".to_string());
        recommendations.push("Disabled image processing for faster scanning".to_string());
        recommendations.push("Reduced target FPS and enabled frame skipping".to_string());
        TuningTier::Aggressive
    } else if has_medium {
        target_fps = scaled_fps_floor(current, 0.8, t::MODERATE_MIN_TARGET_FPS);
        downsample_factor = 1.5;

        recommendations
            .push("Performance is below target - applied moderate optimizations".to_string());
        recommendations.push("Slightly reduced quality for better speed".to_string());
        TuningTier::Moderate
    } else if stats.fps_efficiency > t::UPSCALE_EFFICIENCY_PERCENT
        && stats.avg_total_time_ms < t::UPSCALE_TOTAL_TIME_MS
    {
        target_fps = scaled_fps_ceil(current, 1.2, t::MAX_TARGET_FPS);
        downsample_factor = 1.0;
        enable_image_processing = true;

        recommendations.push("Performance is excellent - increased quality settings".to_string());
        recommendations.push("Enabled full image processing".to_string());
        TuningTier::Upscale
    } else {
        TuningTier::Unchanged
    };

    // Cache and worker adjustments apply regardless of tier
    if stats.avg_lookup_time_ms > t::LOOKUP_CACHE_TRIGGER_MS {
        cache_size = t::BOOSTED_CACHE_SIZE;
        recommendations.push("Increased cache size to improve lookup performance".to_string());
    }

    if stats.avg_processing_time_ms > t::PROCESSING_WORKER_TRIGGER_MS {
        worker_count = (worker_count + 1).min(t::MAX_WORKER_COUNT);
        recommendations.push("Increased worker count for parallel processing".to_string());
    }

    TunedSettings {
        target_fps,
        downsample_factor,
        cache_size,
        worker_count,
        skip_similar_frames,
        enable_image_processing,
        tier,
        recommendations,
    }
}

/// Scale down, floor, and clamp to a minimum.
fn scaled_fps_floor(current: u32, factor: f64, min: u32) -> u32 {
    let scaled = (f64::from(current) * factor).floor() as u32;
    scaled.max(min)
}

/// Scale up, ceil, and clamp to a maximum.
fn scaled_fps_ceil(current: u32, factor: f64, max: u32) -> u32 {
    let scaled = (f64::from(current) * factor).ceil() as u32;
    scaled.min(max)
}
