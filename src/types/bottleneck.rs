//! Classified performance issues emitted by the bottleneck detector

use serde::{Deserialize, Serialize};

/// Which aggregate metric breached its threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleneckKind {
    /// Average capture latency above target
    SlowScan,
    /// Average image-enhancement latency above target
    SlowProcessing,
    /// Average lookup latency above target
    SlowLookup,
    /// Frame-rate efficiency below target
    LowFps,
}

impl std::fmt::Display for BottleneckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BottleneckKind::SlowScan => write!(f, "slow_scan"),
            BottleneckKind::SlowProcessing => write!(f, "slow_processing"),
            BottleneckKind::SlowLookup => write!(f, "slow_lookup"),
            BottleneckKind::LowFps => write!(f, "low_fps"),
        }
    }
}

/// How far past the threshold the measurement landed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low = 1,
    Medium = 2,
    High = 3,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// A single classified performance problem with remediation text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BottleneckIssue {
    /// Which metric breached
    pub kind: BottleneckKind,
    /// Severity band for the breach
    pub severity: Severity,
    /// Human-readable description embedding the measured value
    pub description: String,
    /// Suggested remediation
    pub recommendation: String,
    /// The measured value that breached
    pub value: f64,
    /// The threshold it was compared against
    pub threshold: f64,
}
