//! Fixed scan-performance thresholds and grading deduction rates
//!
//! These are round-number field targets for "good enough" handheld scanning,
//! not values derived from calibration data. They are deliberately constants
//! rather than config keys: the classifier's output feeds the auto-tuner,
//! and a fleet where every device classifies against the same bands is worth
//! more than per-device tunability.

/// Thresholds for bottleneck classification
pub mod scan_thresholds {
    // === Capture latency (ms) ===
    /// Average scan time above this emits a slow_scan issue
    pub const SCAN_TIME_WARNING_MS: f64 = 100.0;
    /// Average scan time above this escalates the issue to high severity
    pub const SCAN_TIME_HIGH_MS: f64 = 200.0;

    // === Image-enhancement latency (ms) ===
    /// Average processing time above this emits a slow_processing issue
    pub const PROCESSING_TIME_WARNING_MS: f64 = 200.0;
    /// Average processing time above this escalates to high severity
    pub const PROCESSING_TIME_HIGH_MS: f64 = 400.0;

    // === Lookup latency (ms) ===
    /// Average lookup time above this emits a slow_lookup issue
    pub const LOOKUP_TIME_WARNING_MS: f64 = 50.0;
    /// Average lookup time above this escalates to high severity
    pub const LOOKUP_TIME_HIGH_MS: f64 = 100.0;

    // === Frame-rate efficiency (%) ===
    /// Efficiency below this emits a low_fps issue
    pub const FPS_EFFICIENCY_WARNING_PERCENT: f64 = 80.0;
    /// Efficiency below this is a medium-severity issue
    pub const FPS_EFFICIENCY_MEDIUM_PERCENT: f64 = 65.0;
    /// Efficiency below this is a high-severity issue
    pub const FPS_EFFICIENCY_HIGH_PERCENT: f64 = 50.0;
}

/// Tier-independent adjustment triggers for the auto-tuner
pub mod tuner_thresholds {
    /// Average lookup time above this raises the cache size (ms).
    /// Intentionally below the classifier's 50 ms warning: the cache
    /// adjustment is preventive and fires without an issue being emitted.
    pub const LOOKUP_CACHE_TRIGGER_MS: f64 = 30.0;
    /// Average processing time above this adds a worker (ms)
    pub const PROCESSING_WORKER_TRIGGER_MS: f64 = 150.0;

    // === Upscale gate ===
    /// Efficiency above this qualifies for the upscale tier (%)
    pub const UPSCALE_EFFICIENCY_PERCENT: f64 = 120.0;
    /// End-to-end latency must be under this to upscale (ms)
    pub const UPSCALE_TOTAL_TIME_MS: f64 = 80.0;

    // === Setting bounds ===
    /// Frame rate never tuned below this
    pub const MIN_TARGET_FPS: u32 = 5;
    /// Moderate tier keeps at least this frame rate
    pub const MODERATE_MIN_TARGET_FPS: u32 = 10;
    /// Frame rate never tuned above this
    pub const MAX_TARGET_FPS: u32 = 30;
    /// Baseline lookup cache capacity
    pub const BASE_CACHE_SIZE: usize = 100;
    /// Cache capacity when lookups run slow
    pub const BOOSTED_CACHE_SIZE: usize = 200;
    /// Baseline image-processing worker count
    pub const BASE_WORKER_COUNT: usize = 2;
    /// Worker count is never raised above this
    pub const MAX_WORKER_COUNT: usize = 4;
}

/// Deduction rates for the 0-100 performance grade
pub mod grading {
    /// Max points lost to slow captures
    pub const SCAN_TIME_MAX_DEDUCTION: f64 = 20.0;
    /// Milliseconds over the scan-time threshold per point lost
    pub const SCAN_TIME_MS_PER_POINT: f64 = 10.0;

    /// Max points lost to slow processing
    pub const PROCESSING_MAX_DEDUCTION: f64 = 20.0;
    /// Milliseconds over the processing threshold per point lost
    pub const PROCESSING_MS_PER_POINT: f64 = 20.0;

    /// Max points lost to slow lookups
    pub const LOOKUP_MAX_DEDUCTION: f64 = 15.0;
    /// Milliseconds over the lookup threshold per point lost
    pub const LOOKUP_MS_PER_POINT: f64 = 5.0;

    /// Max points lost to missed frame rate
    pub const FPS_MAX_DEDUCTION: f64 = 25.0;
    /// Efficiency percentage points under target per point lost
    pub const FPS_PERCENT_PER_POINT: f64 = 2.0;
}
