//! Barcode hygiene: payload cleaning, format normalization, OCR extraction

use regex::Regex;
use std::sync::OnceLock;

/// Asset-tag pattern recognized in OCR text: 8 hex chars, a dash, 10
/// digits, and an optional trailing letter (e.g. `800005BE-1578330321A`).
/// A `%` receipt prefix may precede it in the recognized text.
fn ocr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[0-9A-Fa-f]{8}-[0-9]{10}[A-Za-z]?").expect("static OCR pattern compiles")
    })
}

/// Clean a raw barcode payload.
///
/// Trims whitespace and strips Code 39 `*` start/stop characters. A leading
/// `%` (sales-receipt prefix) is preserved. Returns `None` when nothing
/// remains.
pub fn clean_barcode(raw: &str) -> Option<String> {
    let cleaned = raw.trim().trim_matches('*');
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Normalize a reported symbology name.
///
/// Vendor decoders report the same format under several spellings
/// (`org.iso.Code-128`, `CODE128`, `code-128`); everything is lowered,
/// the `org.iso.` prefix dropped, and dashes removed.
pub fn normalize_format(format: &str) -> String {
    let lowered = format.to_ascii_lowercase();
    let stripped = lowered.strip_prefix("org.iso.").unwrap_or(&lowered);
    stripped.replace('-', "")
}

/// Whether the payload is a 9-digit numeric cylinder barcode.
///
/// These are always printed as Code 128; decoders that fail to report a
/// format get it assigned.
pub fn is_cylinder_barcode(barcode: &str) -> bool {
    barcode.len() == 9 && barcode.chars().all(|c| c.is_ascii_digit())
}

/// Resolve the format for an accepted read: the normalized reported format
/// when present, `code128` for unreported cylinder barcodes, `unknown`
/// otherwise.
pub fn resolve_format(barcode: &str, reported: Option<&str>) -> String {
    let normalized = reported.map(normalize_format);
    match normalized {
        Some(f) if f != "unknown" && !f.is_empty() => f,
        _ if is_cylinder_barcode(barcode) => "code128".to_string(),
        Some(f) if !f.is_empty() => f,
        _ => "unknown".to_string(),
    }
}

/// Extract an asset-tag barcode from OCR-recognized text, uppercased.
pub fn extract_from_ocr_text(text: &str) -> Option<String> {
    ocr_pattern()
        .find(text)
        .map(|m| m.as_str().to_ascii_uppercase())
}
