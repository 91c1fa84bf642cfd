//! Scan-session types: reads, batch bookkeeping, formats

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the session treats consecutive reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// One read at a time, duplicate reads of the same code ignored
    #[default]
    Single,
    /// Continuous reads with per-code duplicate cooldown
    Batch,
    /// Multiple codes tracked in the same frame
    Concurrent,
}

/// Barcode symbologies the scanning client reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarcodeFormat {
    Qr,
    Code39,
    Code93,
    Code128,
    Ean8,
    Ean13,
    UpcA,
    UpcE,
    Codabar,
    Itf14,
    DataMatrix,
    Pdf417,
    Aztec,
}

impl std::fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BarcodeFormat::Qr => "qr",
            BarcodeFormat::Code39 => "code39",
            BarcodeFormat::Code93 => "code93",
            BarcodeFormat::Code128 => "code128",
            BarcodeFormat::Ean8 => "ean8",
            BarcodeFormat::Ean13 => "ean13",
            BarcodeFormat::UpcA => "upc_a",
            BarcodeFormat::UpcE => "upc_e",
            BarcodeFormat::Codabar => "codabar",
            BarcodeFormat::Itf14 => "itf14",
            BarcodeFormat::DataMatrix => "datamatrix",
            BarcodeFormat::Pdf417 => "pdf417",
            BarcodeFormat::Aztec => "aztec",
        };
        write!(f, "{name}")
    }
}

/// Which detection path produced a read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScanSource {
    /// Hardware/vendor barcode decoder
    #[default]
    Native,
    /// Text-recognition fallback path
    Ocr,
    /// Decoded after image enhancement
    Enhanced,
}

/// One accepted barcode read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRead {
    /// Cleaned barcode payload
    pub barcode: String,
    /// Normalized symbology name ("unknown" when unreported)
    pub format: String,
    /// Frame index at read time
    pub frame: u64,
    /// Wall-clock read time
    pub timestamp: DateTime<Utc>,
    /// Detection path
    pub source: ScanSource,
}

/// Summary of a completed batch scanning run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BatchSummary {
    /// Reads accepted during the batch
    pub total_scans: usize,
    /// Distinct barcode payloads
    pub unique_barcodes: usize,
    /// total_scans - unique_barcodes
    pub duplicates: usize,
    /// Batch duration (ms)
    pub duration_ms: u64,
    /// Accepted reads per second, 0 for an instantaneous batch
    pub scans_per_second: f64,
    /// Batch start, wall clock
    pub started_at: Option<DateTime<Utc>>,
    /// Batch end, wall clock
    pub ended_at: Option<DateTime<Utc>>,
}

/// Live view of an in-progress batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct BatchStatus {
    /// Whether a batch session is running
    pub active: bool,
    /// Reads accepted so far
    pub scan_count: usize,
    /// Milliseconds since the batch started
    pub duration_ms: u64,
}
