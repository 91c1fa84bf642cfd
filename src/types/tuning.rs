//! Auto-tuner output: revised scan settings plus grading types

use serde::{Deserialize, Serialize};

/// Which optimization tier the auto-tuner selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TuningTier {
    /// At least one high-severity issue: cut frame rate hard, disable
    /// image processing
    Aggressive,
    /// Medium-severity issues only: modest frame-rate and quality cuts
    Moderate,
    /// Headroom to spare: raise frame rate, restore quality
    Upscale,
    /// Metrics within target: settings pass through unchanged
    #[default]
    Unchanged,
}

impl std::fmt::Display for TuningTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuningTier::Aggressive => write!(f, "aggressive"),
            TuningTier::Moderate => write!(f, "moderate"),
            TuningTier::Upscale => write!(f, "upscale"),
            TuningTier::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// Revised scan configuration produced by `auto_tune`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TunedSettings {
    /// Revised frame-rate goal
    pub target_fps: u32,
    /// Resolution divisor (1.0 = full resolution)
    pub downsample_factor: f64,
    /// Lookup cache capacity
    pub cache_size: usize,
    /// Image-processing worker count
    pub worker_count: usize,
    /// Drop frames nearly identical to the previous one
    pub skip_similar_frames: bool,
    /// Run the image-enhancement stage
    pub enable_image_processing: bool,
    /// Which tier rule produced these settings
    pub tier: TuningTier,
    /// Human-readable explanations for each adjustment
    pub recommendations: Vec<String>,
}

/// Letter grade bands for the 0-100 performance score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
}

impl std::fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LetterGrade::A => write!(f, "A"),
            LetterGrade::B => write!(f, "B"),
            LetterGrade::C => write!(f, "C"),
            LetterGrade::D => write!(f, "D"),
            LetterGrade::F => write!(f, "F"),
        }
    }
}

/// Session performance grade: deduction-based score plus letter band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanGrade {
    /// Letter band for the score
    pub grade: LetterGrade,
    /// 0-100 score after deductions, rounded
    pub score: u8,
}
