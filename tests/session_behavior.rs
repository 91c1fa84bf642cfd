//! Session Behavior Tests
//!
//! Coverage of the scan-session layer (barcode hygiene, batch bookkeeping),
//! the OCR fallback debounce, the frame optimizer, and config file loading —
//! everything the embedding client touches besides the telemetry pipeline.

use std::time::{Duration, Instant};

use scanwatch::config::{FallbackConfig, SessionConfig};
use scanwatch::frames::{DeviceProfile, DeviceTier, FrameInfo, FrameOptimizer};
use scanwatch::{OcrFallback, Preset, ScanMode, ScanSession, ScanSource, ScanwatchConfig};

// ============================================================================
// Scan Session: Hygiene and Batches
// ============================================================================

#[test]
fn code39_guards_are_stripped_and_receipt_prefix_kept() {
    let mut session = ScanSession::new(SessionConfig::default());

    let read = session
        .process_scan("*%800005BE-1578330321A*", Some("code-39"), ScanSource::Native)
        .expect("cleaned read accepted");
    assert_eq!(read.barcode, "%800005BE-1578330321A");
    assert_eq!(read.format, "code39");
}

#[test]
fn cylinder_barcodes_resolve_to_code128_without_a_reported_format() {
    let mut session = ScanSession::new(SessionConfig::default());

    let read = session
        .process_scan("123456789", None, ScanSource::Native)
        .expect("9-digit read accepted");
    assert_eq!(read.format, "code128");

    let read = session
        .process_scan("  485920174  ", Some("org.iso.Code-128"), ScanSource::Enhanced)
        .expect("normalized format accepted");
    assert_eq!(read.format, "code128");
}

#[test]
fn batch_run_summarizes_uniques_and_duplicates() {
    let mut session = ScanSession::new(SessionConfig {
        mode: ScanMode::Batch,
        duplicate_cooldown_ms: 0, // let repeats through so the summary counts them
        ..SessionConfig::default()
    });

    session.start_batch();
    for code in ["111111111", "222222222", "111111111", "333333333"] {
        session.process_scan(code, None, ScanSource::Native);
    }

    let summary = session.complete_batch();
    assert_eq!(summary.total_scans, 4);
    assert_eq!(summary.unique_barcodes, 3);
    assert_eq!(summary.duplicates, 1);
    assert!(summary.started_at.is_some());
    assert!(summary.ended_at.is_some());
    assert!(summary.scans_per_second >= 0.0);
}

#[test]
fn batch_cooldown_suppresses_rapid_repeats() {
    let mut session = ScanSession::new(SessionConfig {
        mode: ScanMode::Batch,
        ..SessionConfig::default()
    });

    session.start_batch();
    assert!(session.process_scan("111111111", None, ScanSource::Native).is_some());
    assert!(
        session.process_scan("111111111", None, ScanSource::Native).is_none(),
        "repeat inside the 500ms window"
    );
    assert!(session.process_scan("222222222", None, ScanSource::Native).is_some());
    assert_eq!(session.batch_status().scan_count, 2);
}

// ============================================================================
// OCR Fallback Debounce
// ============================================================================

#[test]
fn ocr_waits_for_the_native_decoder_to_go_quiet() {
    let start = Instant::now();
    let fb = OcrFallback::from_config(&FallbackConfig::default(), false, start);

    assert!(!fb.should_attempt_ocr(start + Duration::from_millis(1000)));
    assert!(fb.should_attempt_ocr(start + Duration::from_millis(3000)));
}

#[test]
fn native_reads_keep_pushing_ocr_out() {
    let start = Instant::now();
    let mut fb = OcrFallback::from_config(&FallbackConfig::default(), false, start);

    // A read every second keeps the fallback disarmed indefinitely
    for i in 1..=5 {
        let now = start + Duration::from_secs(i);
        assert!(!fb.should_attempt_ocr(now));
        fb.note_scan_success(now);
    }
    assert!(fb.should_attempt_ocr(start + Duration::from_secs(5) + Duration::from_millis(3000)));
}

#[test]
fn consecutive_ocr_attempts_are_cooled_down_per_mode() {
    let start = Instant::now();
    let config = FallbackConfig::default();
    let mut single = OcrFallback::from_config(&config, false, start);
    let mut batch = OcrFallback::from_config(&config, true, start);

    let armed = start + Duration::from_millis(config.arm_timeout_ms);
    single.note_ocr_attempt(armed);
    batch.note_ocr_attempt(armed);

    let shortly_after = armed + Duration::from_millis(700);
    assert!(batch.should_attempt_ocr(shortly_after), "batch cooldown is 500ms");
    assert!(!single.should_attempt_ocr(shortly_after), "single cooldown is 2000ms");
    assert!(single.should_attempt_ocr(armed + Duration::from_millis(2000)));
}

// ============================================================================
// Frame Optimizer
// ============================================================================

#[test]
fn device_profile_drives_the_frame_budget() {
    let config = ScanwatchConfig::default();
    let mut optimizer = FrameOptimizer::new(&config.frames, 15, true);

    let tier = FrameOptimizer::estimate_device_tier(4, 3072);
    assert_eq!(tier, DeviceTier::Mid);

    let fps = optimizer.adjust_frame_rate(DeviceProfile {
        cpu_cores: 4,
        memory_mb: 3072,
        battery_percent: 15,
        low_power_mode: true,
        tier,
    });
    // 15 base, halved for low power, then floor(7 * 0.7) = 4 floored at 5
    assert_eq!(fps, 5);
}

#[test]
fn burst_frames_are_skipped_and_counted() {
    let config = ScanwatchConfig::default();
    let mut optimizer = FrameOptimizer::new(&config.frames, 15, true);

    let mut accepted = 0;
    for ts in [0u64, 20, 40, 900, 920, 1800] {
        let frame = FrameInfo {
            timestamp_ms: ts,
            width: 1920,
            height: 1080,
            orientation: 0,
            light_level: None,
        };
        if optimizer.process_frame(frame).is_some() {
            accepted += 1;
        }
    }

    let stats = optimizer.stats();
    assert_eq!(stats.total_frames, 6);
    assert_eq!(accepted as u64 + stats.frames_skipped, 6);
    assert!(stats.frames_skipped >= 2, "burst frames 20/40ms and 920ms apart skip");
    assert!(stats.skip_rate > 0.0);
}

#[test]
fn accepted_frames_carry_roi_geometry() {
    let config = ScanwatchConfig::default();
    let mut optimizer = FrameOptimizer::new(&config.frames, 15, false);

    let processed = optimizer
        .process_frame(FrameInfo {
            timestamp_ms: 0,
            width: 1920,
            height: 1080,
            orientation: 0,
            light_level: None,
        })
        .expect("skipping disabled");
    // Default config: no downsampling, 40% centered ROI
    assert_eq!(processed.width, 768);
    assert_eq!(processed.height, 432);
}

// ============================================================================
// Config Loading
// ============================================================================

#[test]
fn config_file_round_trips_through_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scanwatch.toml");

    let mut config = ScanwatchConfig::preset(Preset::Accurate);
    config.fallback.arm_timeout_ms = 4500;
    config.save_to_file(&path).expect("save");

    let loaded = ScanwatchConfig::load_from_file(&path).expect("load");
    assert_eq!(loaded.fallback.arm_timeout_ms, 4500);
    assert!(loaded.session.damage_recovery, "accurate preset survived the trip");
    assert_eq!(loaded.session.formats.len(), config.session.formats.len());
}

#[test]
fn invalid_config_files_are_rejected_with_every_violation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("scanwatch.toml");
    std::fs::write(
        &path,
        "[monitor]\ntarget_fps = 0\nhistory_size = 0\n",
    )
    .expect("write");

    let err = ScanwatchConfig::load_from_file(&path).expect_err("invalid config");
    let message = err.to_string();
    assert!(message.contains("target_fps"));
    assert!(message.contains("history_size"));
}
