//! scanwatch: Scanner Operational Telemetry
//!
//! Performance telemetry and adaptive tuning for a barcode/asset scanning
//! client.
//!
//! ## Architecture
//!
//! - **Perf Monitor**: per-session timing samples in a fixed ring buffer,
//!   with on-demand aggregates
//! - **Bottleneck Classifier**: threshold-based issue detection with
//!   severity and remediation text
//! - **Auto-Tuner**: maps classified issues to revised scan settings
//! - **Scan Session**: barcode hygiene, duplicate suppression, batch runs
//! - **Frame Optimizer**: device-tier frame-rate selection and frame skipping

// Telemetry and session modules
pub mod config;
pub mod frames;
pub mod monitor;
pub mod session;
pub mod types;

// Re-export configuration
pub use config::{ConfigError, Preset, ScanwatchConfig};

// Re-export the monitor and its derived views
pub use monitor::{PerfMonitor, DEFAULT_CAPACITY, DEFAULT_TARGET_FPS};
pub use types::{
    BottleneckIssue, BottleneckKind, LetterGrade, ScanGrade, ScanSample, ScanStats, ScanToken,
    Severity, TunedSettings, TuningTier,
};

// Re-export session bookkeeping
pub use session::fallback::OcrFallback;
pub use session::ScanSession;
pub use types::{BatchStatus, BatchSummary, ScanMode, ScanRead, ScanSource};

// Re-export frame optimization
pub use frames::{DeviceProfile, DeviceTier, FrameInfo, FrameOptimizer, FrameOptimizerStats};
