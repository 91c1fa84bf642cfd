//! Frame-throughput optimization
//!
//! Decides which camera frames are worth processing and at what geometry:
//! device-tier frame-rate selection, similarity-based frame skipping,
//! resolution downsampling, and centered region-of-interest cropping. The
//! optimizer only works on frame metadata; the embedding client applies the
//! resulting geometry to the actual pixel buffers.

use serde::{Deserialize, Serialize};

use crate::config::FrameConfig;

/// Coarse device capability band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTier {
    Low,
    Mid,
    High,
}

/// Capability snapshot of the device running the scanner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub cpu_cores: u32,
    pub memory_mb: u32,
    /// 0-100
    pub battery_percent: u32,
    pub low_power_mode: bool,
    pub tier: DeviceTier,
}

/// Metadata for one camera frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Capture timestamp (ms, monotonic within a session)
    pub timestamp_ms: u64,
    pub width: u32,
    pub height: u32,
    /// Device orientation in degrees (0, 90, 180, 270)
    pub orientation: u16,
    /// Normalized ambient light estimate (0-1), when the camera reports it
    pub light_level: Option<f64>,
}

/// Centered crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Skip-rate statistics for the optimizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameOptimizerStats {
    pub total_frames: u64,
    pub frames_skipped: u64,
    /// frames_skipped / total_frames, 0 before any frames
    pub skip_rate: f64,
    pub current_target_fps: u32,
    pub downsample_factor: f64,
}

/// Per-tier recommended starting settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TierSettings {
    pub target_fps: u32,
    pub downsample_factor: f64,
    pub skip_similar_frames: bool,
    pub similarity_threshold: f64,
}

/// Frame optimization engine for one scanner instance.
pub struct FrameOptimizer {
    target_fps: u32,
    downsample_factor: f64,
    similarity_threshold: f64,
    skip_similar_frames: bool,
    enable_roi: bool,
    roi_fraction: f64,
    last_processed: Option<FrameInfo>,
    skip_count: u64,
    total_frames: u64,
    device: Option<DeviceProfile>,
}

impl FrameOptimizer {
    /// Create from config with the given starting frame-rate goal.
    pub fn new(config: &FrameConfig, target_fps: u32, skip_similar_frames: bool) -> Self {
        Self {
            target_fps,
            downsample_factor: config.downsample_factor,
            similarity_threshold: config.similarity_threshold,
            skip_similar_frames,
            enable_roi: config.enable_roi,
            roi_fraction: config.roi_fraction,
            last_processed: None,
            skip_count: 0,
            total_frames: 0,
            device: None,
        }
    }

    /// Pick a frame rate for the device's capability and power state.
    ///
    /// Tier sets the base (30/15/5); low-power mode halves it and a battery
    /// under 20% applies a further 0.7 factor, both floored at 5.
    pub fn adjust_frame_rate(&mut self, device: DeviceProfile) -> u32 {
        let mut fps: u32 = match device.tier {
            DeviceTier::High => 30,
            DeviceTier::Mid => 15,
            DeviceTier::Low => 5,
        };

        if device.low_power_mode {
            fps = (fps / 2).max(5);
        }
        if device.battery_percent < 20 {
            fps = ((f64::from(fps) * 0.7).floor() as u32).max(5);
        }

        self.device = Some(device);
        self.target_fps = fps;
        fps
    }

    /// Run a frame through skip/downsample/ROI. Returns `None` when the
    /// frame was skipped as too similar to the previous processed frame,
    /// otherwise the adjusted geometry the client should decode at.
    pub fn process_frame(&mut self, frame: FrameInfo) -> Option<FrameInfo> {
        self.total_frames += 1;

        if self.should_skip(&frame) {
            self.skip_count += 1;
            return None;
        }

        let mut processed = frame;
        if self.downsample_factor > 1.0 {
            processed.width = (f64::from(processed.width) / self.downsample_factor).floor() as u32;
            processed.height =
                (f64::from(processed.height) / self.downsample_factor).floor() as u32;
        }
        if self.enable_roi {
            let roi = self.roi_for(processed.width, processed.height);
            processed.width = roi.width;
            processed.height = roi.height;
        }

        self.last_processed = Some(processed);
        Some(processed)
    }

    /// Centered crop covering `roi_fraction` of each dimension.
    pub fn roi_for(&self, width: u32, height: u32) -> RoiRect {
        let roi_width = (f64::from(width) * self.roi_fraction).floor() as u32;
        let roi_height = (f64::from(height) * self.roi_fraction).floor() as u32;
        RoiRect {
            x: (width - roi_width) / 2,
            y: (height - roi_height) / 2,
            width: roi_width,
            height: roi_height,
        }
    }

    fn should_skip(&self, frame: &FrameInfo) -> bool {
        if !self.skip_similar_frames {
            return false;
        }
        let Some(last) = self.last_processed.as_ref() else {
            return false;
        };
        frame_similarity(frame, last) >= self.similarity_threshold
    }

    /// Nudge settings against the measured frame rate.
    ///
    /// Below 80% of target: more downsampling, lower target, stickier frame
    /// skipping. Above 120%: walk each adjustment back. Between the bands
    /// nothing moves, which keeps the tuner from oscillating.
    pub fn auto_tune(&mut self, average_fps: f64) {
        let target = f64::from(self.target_fps);

        if average_fps < target * 0.8 {
            if self.downsample_factor < 4.0 {
                self.downsample_factor = (self.downsample_factor + 0.5).min(4.0);
            }
            if self.target_fps > 5 {
                self.target_fps = ((target * 0.8).floor() as u32).max(5);
            }
            self.skip_similar_frames = true;
            self.similarity_threshold = (self.similarity_threshold + 0.05).min(0.98);
        } else if average_fps > target * 1.2 {
            if self.downsample_factor > 1.0 {
                self.downsample_factor = (self.downsample_factor - 0.5).max(1.0);
            }
            let tier_allows = self
                .device
                .map(|d| d.tier != DeviceTier::Low)
                .unwrap_or(true);
            if tier_allows {
                self.target_fps = (self.target_fps + 5).min(30);
            }
            if self.similarity_threshold > 0.90 {
                self.similarity_threshold = (self.similarity_threshold - 0.05).max(0.90);
            }
        }
    }

    /// Skip-rate statistics.
    pub fn stats(&self) -> FrameOptimizerStats {
        let skip_rate = if self.total_frames > 0 {
            self.skip_count as f64 / self.total_frames as f64
        } else {
            0.0
        };
        FrameOptimizerStats {
            total_frames: self.total_frames,
            frames_skipped: self.skip_count,
            skip_rate,
            current_target_fps: self.target_fps,
            downsample_factor: self.downsample_factor,
        }
    }

    /// Current frame-rate goal.
    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Current similarity threshold.
    pub fn similarity_threshold(&self) -> f64 {
        self.similarity_threshold
    }

    /// Forget the skip state and counters.
    pub fn reset(&mut self) {
        self.last_processed = None;
        self.skip_count = 0;
        self.total_frames = 0;
    }

    /// Estimate the capability band from core count and memory.
    pub fn estimate_device_tier(cpu_cores: u32, memory_mb: u32) -> DeviceTier {
        if cpu_cores >= 6 && memory_mb >= 4096 {
            DeviceTier::High
        } else if cpu_cores >= 4 && memory_mb >= 2048 {
            DeviceTier::Mid
        } else {
            DeviceTier::Low
        }
    }

    /// Recommended starting settings for a capability band.
    pub fn recommended_settings(tier: DeviceTier) -> TierSettings {
        match tier {
            DeviceTier::High => TierSettings {
                target_fps: 30,
                downsample_factor: 1.0,
                skip_similar_frames: true,
                similarity_threshold: 0.95,
            },
            DeviceTier::Mid => TierSettings {
                target_fps: 15,
                downsample_factor: 1.5,
                skip_similar_frames: true,
                similarity_threshold: 0.93,
            },
            DeviceTier::Low => TierSettings {
                target_fps: 5,
                downsample_factor: 2.0,
                skip_similar_frames: true,
                similarity_threshold: 0.90,
            },
        }
    }
}

/// Similarity estimate between two frames, 0 (different) to 1 (identical).
///
/// Timestamp proximity dominates: frames captured close together are almost
/// certainly near-identical. Past half a second the metadata decides —
/// matching orientation under similar light still reads as the same scene.
fn frame_similarity(a: &FrameInfo, b: &FrameInfo) -> f64 {
    let time_diff = a.timestamp_ms.abs_diff(b.timestamp_ms);

    if time_diff < 50 {
        return 0.98;
    }
    if time_diff < 100 {
        return 0.90;
    }
    if time_diff < 200 {
        return 0.75;
    }
    if time_diff < 500 {
        return 0.50;
    }

    if let (Some(light_a), Some(light_b)) = (a.light_level, b.light_level) {
        if a.orientation == b.orientation && (light_a - light_b).abs() < 0.1 {
            return 0.85;
        }
    }

    0.30
}
