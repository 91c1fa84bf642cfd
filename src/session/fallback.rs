//! OCR fallback debounce
//!
//! The text-recognition path is expensive, so it only runs when the native
//! decoder has gone quiet: a single arm timeout counts from session start
//! or the last successful native read, and once armed, consecutive OCR
//! attempts are separated by a cooldown. This is a poll-style state
//! machine — the caller supplies the clock and owns the actual timer.

use std::time::{Duration, Instant};

use crate::config::FallbackConfig;

/// Debounce state for the OCR fallback path of one scanner instance.
#[derive(Debug)]
pub struct OcrFallback {
    arm_timeout: Duration,
    cooldown: Duration,
    last_native_scan: Instant,
    last_ocr_attempt: Option<Instant>,
}

impl OcrFallback {
    /// Create with explicit timings, armed `arm_timeout` from `now`.
    pub fn new(arm_timeout: Duration, cooldown: Duration, now: Instant) -> Self {
        Self {
            arm_timeout,
            cooldown,
            last_native_scan: now,
            last_ocr_attempt: None,
        }
    }

    /// Create from config. Batch mode uses the shorter OCR cooldown.
    pub fn from_config(config: &FallbackConfig, batch_mode: bool, now: Instant) -> Self {
        let cooldown_ms = if batch_mode {
            config.batch_ocr_cooldown_ms
        } else {
            config.ocr_cooldown_ms
        };
        Self::new(
            Duration::from_millis(config.arm_timeout_ms),
            Duration::from_millis(cooldown_ms),
            now,
        )
    }

    /// A native read succeeded: push the arm deadline out.
    pub fn note_scan_success(&mut self, now: Instant) {
        self.last_native_scan = now;
    }

    /// Whether the OCR path may run at `now`: the native decoder has been
    /// quiet past the arm timeout and any prior OCR attempt has cooled down.
    pub fn should_attempt_ocr(&self, now: Instant) -> bool {
        if now.duration_since(self.last_native_scan) < self.arm_timeout {
            return false;
        }
        match self.last_ocr_attempt {
            None => true,
            Some(last) => now.duration_since(last) >= self.cooldown,
        }
    }

    /// An OCR attempt ran at `now`: start its cooldown.
    pub fn note_ocr_attempt(&mut self, now: Instant) {
        self.last_ocr_attempt = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fallback(arm_ms: u64, cooldown_ms: u64) -> (OcrFallback, Instant) {
        let start = Instant::now();
        (
            OcrFallback::new(
                Duration::from_millis(arm_ms),
                Duration::from_millis(cooldown_ms),
                start,
            ),
            start,
        )
    }

    #[test]
    fn quiet_period_arms_the_fallback() {
        let (fb, start) = fallback(3000, 2000);
        assert!(!fb.should_attempt_ocr(start + Duration::from_millis(2999)));
        assert!(fb.should_attempt_ocr(start + Duration::from_millis(3000)));
    }

    #[test]
    fn native_scan_resets_the_arm_deadline() {
        let (mut fb, start) = fallback(3000, 2000);
        fb.note_scan_success(start + Duration::from_millis(2500));
        // Old deadline has passed but the reset pushed it out
        assert!(!fb.should_attempt_ocr(start + Duration::from_millis(4000)));
        assert!(fb.should_attempt_ocr(start + Duration::from_millis(5500)));
    }

    #[test]
    fn ocr_attempts_respect_the_cooldown() {
        let (mut fb, start) = fallback(1000, 2000);
        let armed = start + Duration::from_millis(1000);
        assert!(fb.should_attempt_ocr(armed));

        fb.note_ocr_attempt(armed);
        assert!(!fb.should_attempt_ocr(armed + Duration::from_millis(1999)));
        assert!(fb.should_attempt_ocr(armed + Duration::from_millis(2000)));
    }

    #[test]
    fn batch_mode_uses_the_shorter_cooldown() {
        let config = FallbackConfig::default();
        let start = Instant::now();
        let mut batch = OcrFallback::from_config(&config, true, start);
        let mut single = OcrFallback::from_config(&config, false, start);

        let armed = start + Duration::from_millis(config.arm_timeout_ms);
        batch.note_ocr_attempt(armed);
        single.note_ocr_attempt(armed);

        let later = armed + Duration::from_millis(600);
        assert!(batch.should_attempt_ocr(later), "500ms batch cooldown");
        assert!(!single.should_attempt_ocr(later), "2000ms single cooldown");
    }
}
