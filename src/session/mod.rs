//! Scan session bookkeeping
//!
//! Platform-agnostic bookkeeping for one scanning session: payload
//! cleaning, format resolution, duplicate suppression, bounded read
//! history, and batch runs with summaries. The vendor decoder and camera
//! live in the embedding client; this layer only decides which reads to
//! accept and what to remember about them.

pub mod barcode;
pub mod fallback;

use std::collections::HashSet;

use chrono::Utc;
use tracing::debug;

use crate::config::SessionConfig;
use crate::types::{BatchStatus, BatchSummary, ScanMode, ScanRead, ScanSource};

struct BatchState {
    started_at: chrono::DateTime<Utc>,
    scans: Vec<ScanRead>,
}

/// Read-acceptance and history state for one scanning session.
pub struct ScanSession {
    config: SessionConfig,
    frame_count: u64,
    history: Vec<ScanRead>,
    last_accepted: Option<String>,
    batch: Option<BatchState>,
}

impl ScanSession {
    /// Create a session with the given behavior config.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            frame_count: 0,
            history: Vec::new(),
            last_accepted: None,
            batch: None,
        }
    }

    /// The session's behavior config.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Process a raw read from the decoder.
    ///
    /// Returns the accepted read, or `None` when the payload cleans to
    /// nothing or is suppressed as a duplicate. In single mode an
    /// immediate repeat of the previous barcode is dropped; in batch mode
    /// a barcode already read within the duplicate cooldown is dropped.
    pub fn process_scan(
        &mut self,
        raw: &str,
        format: Option<&str>,
        source: ScanSource,
    ) -> Option<ScanRead> {
        let barcode = match barcode::clean_barcode(raw) {
            Some(b) => b,
            None => {
                debug!(raw, "dropping scan: payload cleaned to nothing");
                return None;
            }
        };

        match self.config.mode {
            ScanMode::Single => {
                if self.last_accepted.as_deref() == Some(barcode.as_str()) {
                    debug!(barcode, "dropping repeat read in single mode");
                    return None;
                }
            }
            ScanMode::Batch | ScanMode::Concurrent => {
                if self.is_duplicate_in_batch(&barcode) {
                    debug!(barcode, "dropping duplicate read within batch cooldown");
                    return None;
                }
            }
        }

        let read = ScanRead {
            format: barcode::resolve_format(&barcode, format),
            barcode,
            frame: self.frame_count,
            timestamp: Utc::now(),
            source,
        };
        self.frame_count += 1;

        self.history.push(read.clone());
        if self.history.len() > self.config.cache_size {
            self.history.remove(0);
        }

        self.last_accepted = Some(read.barcode.clone());
        if let Some(batch) = self.batch.as_mut() {
            batch.scans.push(read.clone());
        }

        Some(read)
    }

    /// Whether this barcode was already read in the active batch within
    /// the duplicate cooldown window.
    fn is_duplicate_in_batch(&self, barcode: &str) -> bool {
        let Some(batch) = self.batch.as_ref() else {
            return false;
        };
        let window = chrono::Duration::milliseconds(self.config.duplicate_cooldown_ms as i64);
        let now = Utc::now();

        batch
            .scans
            .iter()
            .any(|scan| scan.barcode == barcode && now.signed_duration_since(scan.timestamp) < window)
    }

    // ------------------------------------------------------------------
    // Batch runs
    // ------------------------------------------------------------------

    /// Start a batch run. An already-active batch is restarted.
    pub fn start_batch(&mut self) {
        self.batch = Some(BatchState {
            started_at: Utc::now(),
            scans: Vec::new(),
        });
    }

    /// Finish the batch run and summarize it. With no active batch this
    /// returns an all-zero summary.
    pub fn complete_batch(&mut self) -> BatchSummary {
        let Some(batch) = self.batch.take() else {
            return BatchSummary::default();
        };

        let ended_at = Utc::now();
        let duration_ms = ended_at
            .signed_duration_since(batch.started_at)
            .num_milliseconds()
            .max(0) as u64;

        let unique: HashSet<&str> = batch.scans.iter().map(|s| s.barcode.as_str()).collect();
        let total = batch.scans.len();

        let scans_per_second = if duration_ms > 0 {
            total as f64 / (duration_ms as f64 / 1000.0)
        } else {
            0.0
        };

        BatchSummary {
            total_scans: total,
            unique_barcodes: unique.len(),
            duplicates: total - unique.len(),
            duration_ms,
            scans_per_second,
            started_at: Some(batch.started_at),
            ended_at: Some(ended_at),
        }
    }

    /// Live view of the active batch.
    pub fn batch_status(&self) -> BatchStatus {
        match self.batch.as_ref() {
            None => BatchStatus::default(),
            Some(batch) => BatchStatus {
                active: true,
                scan_count: batch.scans.len(),
                duration_ms: Utc::now()
                    .signed_duration_since(batch.started_at)
                    .num_milliseconds()
                    .max(0) as u64,
            },
        }
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Accepted reads, oldest first, bounded by the configured cache size.
    pub fn history(&self) -> &[ScanRead] {
        &self.history
    }

    /// Forget all accepted reads.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Frames seen so far (one per accepted read).
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Clear history, counters, and any active batch.
    pub fn reset(&mut self) {
        self.frame_count = 0;
        self.history.clear();
        self.last_accepted = None;
        self.batch = None;
    }
}
