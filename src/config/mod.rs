//! Scanner Configuration Module
//!
//! Operator-tunable scan settings loaded from TOML files. The bottleneck
//! classifier's thresholds are deliberately NOT here — they are fixed fleet
//! constants (see `monitor::thresholds`); config covers the knobs a
//! deployment actually varies: frame-rate goal, buffer sizes, session
//! behavior, frame-optimizer tuning, and OCR fallback timing.
//!
//! ## Loading Order
//!
//! 1. `SCANWATCH_CONFIG` environment variable (path to TOML file)
//! 2. `scanwatch.toml` in the current working directory
//! 3. Built-in defaults (the `balanced` preset)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

use crate::types::{BarcodeFormat, ScanMode};

/// Errors from loading, validating, or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config {0}: {1}")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Named configuration presets carried over from the scanning client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Throughput first: short format list, no enhancement
    Fast,
    /// Read rate first: full format list, every enhancement on
    Accurate,
    /// The default tradeoff
    Balanced,
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fast" => Ok(Preset::Fast),
            "accurate" => Ok(Preset::Accurate),
            "balanced" => Ok(Preset::Balanced),
            other => Err(format!(
                "unknown preset '{other}' (expected fast, accurate, or balanced)"
            )),
        }
    }
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a scanning deployment.
///
/// Load with `ScanwatchConfig::load()`, or start from a preset with
/// `ScanwatchConfig::preset(..)`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanwatchConfig {
    /// Telemetry monitor sizing
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Scan-session behavior
    #[serde(default)]
    pub session: SessionConfig,

    /// Frame-optimizer tuning
    #[serde(default)]
    pub frames: FrameConfig,

    /// OCR fallback timing
    #[serde(default)]
    pub fallback: FallbackConfig,
}

/// Telemetry monitor sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Frame-rate goal the session starts with
    #[serde(default = "defaults::target_fps")]
    pub target_fps: u32,
    /// Sample ring capacity
    #[serde(default = "defaults::history_size")]
    pub history_size: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            target_fps: defaults::target_fps(),
            history_size: defaults::history_size(),
        }
    }
}

/// Scan-session behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Read handling mode
    #[serde(default)]
    pub mode: ScanMode,
    /// Symbologies the client reports
    #[serde(default = "defaults::formats")]
    pub formats: Vec<BarcodeFormat>,
    /// Scan-history capacity (also the lookup cache size hint)
    #[serde(default = "defaults::cache_size")]
    pub cache_size: usize,
    /// Image-processing worker threads
    #[serde(default = "defaults::worker_threads")]
    pub worker_threads: usize,
    /// Drop frames nearly identical to the previous one
    #[serde(default = "defaults::yes")]
    pub skip_similar_frames: bool,
    /// Run the image-enhancement stage
    #[serde(default = "defaults::yes")]
    pub enhancement: bool,
    /// Combine evidence across frames before accepting a read
    #[serde(default = "defaults::yes")]
    pub multi_frame: bool,
    /// Low-light compensation
    #[serde(default = "defaults::yes")]
    pub low_light: bool,
    /// Attempt recovery of damaged codes
    #[serde(default)]
    pub damage_recovery: bool,
    /// Same-code suppression window in batch mode (ms)
    #[serde(default = "defaults::duplicate_cooldown_ms")]
    pub duplicate_cooldown_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: ScanMode::Single,
            formats: defaults::formats(),
            cache_size: defaults::cache_size(),
            worker_threads: defaults::worker_threads(),
            skip_similar_frames: true,
            enhancement: true,
            multi_frame: true,
            low_light: true,
            damage_recovery: false,
            duplicate_cooldown_ms: defaults::duplicate_cooldown_ms(),
        }
    }
}

/// Frame-optimizer tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Frames at or above this similarity are skipped (0-1)
    #[serde(default = "defaults::similarity_threshold")]
    pub similarity_threshold: f64,
    /// Resolution divisor (1.0 = full resolution)
    #[serde(default = "defaults::downsample_factor")]
    pub downsample_factor: f64,
    /// Crop frames to a centered region of interest
    #[serde(default = "defaults::yes")]
    pub enable_roi: bool,
    /// Fraction of each dimension the default ROI covers (0-1)
    #[serde(default = "defaults::roi_fraction")]
    pub roi_fraction: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: defaults::similarity_threshold(),
            downsample_factor: defaults::downsample_factor(),
            enable_roi: true,
            roi_fraction: defaults::roi_fraction(),
        }
    }
}

/// OCR fallback timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Milliseconds without a native read before OCR is armed
    #[serde(default = "defaults::arm_timeout_ms")]
    pub arm_timeout_ms: u64,
    /// Cooldown between OCR attempts in single mode (ms)
    #[serde(default = "defaults::ocr_cooldown_ms")]
    pub ocr_cooldown_ms: u64,
    /// Cooldown between OCR attempts in batch mode (ms)
    #[serde(default = "defaults::batch_ocr_cooldown_ms")]
    pub batch_ocr_cooldown_ms: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            arm_timeout_ms: defaults::arm_timeout_ms(),
            ocr_cooldown_ms: defaults::ocr_cooldown_ms(),
            batch_ocr_cooldown_ms: defaults::batch_ocr_cooldown_ms(),
        }
    }
}

/// Serde default functions, kept together so the built-in values are
/// readable in one place.
mod defaults {
    use crate::types::BarcodeFormat;

    pub fn target_fps() -> u32 {
        15
    }
    pub fn history_size() -> usize {
        100
    }
    pub fn formats() -> Vec<BarcodeFormat> {
        vec![
            BarcodeFormat::Code39,
            BarcodeFormat::Code128,
            BarcodeFormat::Qr,
            BarcodeFormat::Ean13,
            BarcodeFormat::Ean8,
            BarcodeFormat::UpcA,
            BarcodeFormat::UpcE,
        ]
    }
    pub fn cache_size() -> usize {
        100
    }
    pub fn worker_threads() -> usize {
        2
    }
    pub fn yes() -> bool {
        true
    }
    pub fn duplicate_cooldown_ms() -> u64 {
        500
    }
    pub fn similarity_threshold() -> f64 {
        0.95
    }
    pub fn downsample_factor() -> f64 {
        1.0
    }
    pub fn roi_fraction() -> f64 {
        0.4
    }
    pub fn arm_timeout_ms() -> u64 {
        3000
    }
    pub fn ocr_cooldown_ms() -> u64 {
        2000
    }
    pub fn batch_ocr_cooldown_ms() -> u64 {
        500
    }
}

impl ScanwatchConfig {
    /// Load configuration using the standard search order:
    /// 1. `$SCANWATCH_CONFIG` environment variable
    /// 2. `./scanwatch.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("SCANWATCH_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded scan config from SCANWATCH_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from SCANWATCH_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "SCANWATCH_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("scanwatch.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded scan config from ./scanwatch.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./scanwatch.toml, using defaults");
                }
            }
        }

        info!("No scanwatch.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Start from a named preset (the client's fast/accurate/balanced).
    pub fn preset(preset: Preset) -> Self {
        let mut config = Self::default();
        match preset {
            Preset::Fast => {
                config.monitor.target_fps = 30;
                config.session.formats = vec![
                    BarcodeFormat::Code39,
                    BarcodeFormat::Code128,
                    BarcodeFormat::Qr,
                    BarcodeFormat::Ean13,
                ];
                config.session.cache_size = 50;
                config.session.worker_threads = 1;
                config.session.skip_similar_frames = true;
                config.session.enhancement = false;
                config.session.multi_frame = false;
                config.session.low_light = false;
                config.session.damage_recovery = false;
            }
            Preset::Accurate => {
                config.monitor.target_fps = 15;
                config.session.formats = vec![
                    BarcodeFormat::Code39,
                    BarcodeFormat::Code128,
                    BarcodeFormat::Qr,
                    BarcodeFormat::Ean13,
                    BarcodeFormat::Ean8,
                    BarcodeFormat::UpcA,
                    BarcodeFormat::UpcE,
                    BarcodeFormat::Code93,
                    BarcodeFormat::Codabar,
                    BarcodeFormat::Itf14,
                    BarcodeFormat::DataMatrix,
                    BarcodeFormat::Pdf417,
                    BarcodeFormat::Aztec,
                ];
                config.session.skip_similar_frames = false;
                config.session.enhancement = true;
                config.session.multi_frame = true;
                config.session.low_light = true;
                config.session.damage_recovery = true;
            }
            Preset::Balanced => {
                config.monitor.target_fps = 20;
            }
        }
        config
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file (for runtime updates from the settings screen).
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Scan config saved");
        Ok(())
    }

    /// Validate all fields for internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        Self::check_range(
            f64::from(self.monitor.target_fps),
            1.0,
            60.0,
            "monitor.target_fps",
            &mut errors,
        );
        if self.monitor.history_size == 0 {
            errors.push("monitor.history_size must be > 0".to_string());
        }
        if self.session.cache_size == 0 {
            errors.push("session.cache_size must be > 0".to_string());
        }
        Self::check_range(
            self.session.worker_threads as f64,
            1.0,
            8.0,
            "session.worker_threads",
            &mut errors,
        );
        if self.session.formats.is_empty() {
            errors.push("session.formats must name at least one symbology".to_string());
        }
        Self::check_range(
            self.frames.similarity_threshold,
            0.0,
            1.0,
            "frames.similarity_threshold",
            &mut errors,
        );
        if self.frames.downsample_factor < 1.0 {
            errors.push(format!(
                "frames.downsample_factor must be >= 1.0 (got {})",
                self.frames.downsample_factor
            ));
        }
        if self.frames.roi_fraction <= 0.0 || self.frames.roi_fraction > 1.0 {
            errors.push(format!(
                "frames.roi_fraction must be in (0, 1] (got {})",
                self.frames.roi_fraction
            ));
        }
        if self.fallback.arm_timeout_ms == 0 {
            errors.push("fallback.arm_timeout_ms must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_range(value: f64, min: f64, max: f64, field: &str, errors: &mut Vec<String>) {
        if value < min || value > max {
            errors.push(format!(
                "{field} must be between {min} and {max} (got {value})"
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = ScanwatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.monitor.target_fps, 15);
        assert_eq!(config.monitor.history_size, 100);
        assert_eq!(config.session.duplicate_cooldown_ms, 500);
    }

    #[test]
    fn presets_differ_where_the_client_says_they_do() {
        let fast = ScanwatchConfig::preset(Preset::Fast);
        assert_eq!(fast.monitor.target_fps, 30);
        assert_eq!(fast.session.worker_threads, 1);
        assert!(!fast.session.enhancement);
        assert_eq!(fast.session.formats.len(), 4);

        let accurate = ScanwatchConfig::preset(Preset::Accurate);
        assert_eq!(accurate.monitor.target_fps, 15);
        assert!(!accurate.session.skip_similar_frames);
        assert!(accurate.session.damage_recovery);
        assert_eq!(accurate.session.formats.len(), 13);

        let balanced = ScanwatchConfig::preset(Preset::Balanced);
        assert_eq!(balanced.monitor.target_fps, 20);
        assert!(balanced.session.skip_similar_frames);
    }

    #[test]
    fn preset_names_parse() {
        assert_eq!("fast".parse::<Preset>(), Ok(Preset::Fast));
        assert_eq!("BALANCED".parse::<Preset>(), Ok(Preset::Balanced));
        assert!("turbo".parse::<Preset>().is_err());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed: ScanwatchConfig = toml::from_str(
            r#"
[monitor]
target_fps = 24
"#,
        )
        .unwrap();
        assert_eq!(parsed.monitor.target_fps, 24);
        assert_eq!(parsed.monitor.history_size, 100);
        assert_eq!(parsed.session.cache_size, 100);
        assert!(parsed.frames.enable_roi);
    }

    #[test]
    fn toml_round_trip() {
        let config = ScanwatchConfig::preset(Preset::Accurate);
        let text = config.to_toml().unwrap();
        let parsed: ScanwatchConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.monitor.target_fps, config.monitor.target_fps);
        assert_eq!(parsed.session.formats.len(), config.session.formats.len());
        assert_eq!(
            parsed.session.damage_recovery,
            config.session.damage_recovery
        );
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        let mut config = ScanwatchConfig::default();
        config.monitor.target_fps = 0;
        config.frames.similarity_threshold = 1.5;
        config.frames.downsample_factor = 0.5;

        let err = config.validate().unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 3, "all violations reported: {errors:?}");
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn load_from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scanwatch.toml");

        let mut config = ScanwatchConfig::preset(Preset::Fast);
        config.session.duplicate_cooldown_ms = 200;
        config.save_to_file(&path).unwrap();

        let loaded = ScanwatchConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.monitor.target_fps, 30);
        assert_eq!(loaded.session.duplicate_cooldown_ms, 200);
    }

    #[test]
    fn load_from_file_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scanwatch.toml");
        std::fs::write(&path, "[monitor]\ntarget_fps = 0\n").unwrap();
        assert!(ScanwatchConfig::load_from_file(&path).is_err());
    }
}
