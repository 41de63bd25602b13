/// Decoding of raw source bytes into viewer text.
use std::path::Path;

use anyhow::{Context, Result};
use chardetng::{EncodingDetector, Iso2022JpDetection, Utf8Detection};
use encoding_rs::{Encoding, UTF_8};

/// Detects the encoding of raw bytes.
///
/// A byte order mark wins, valid UTF-8 is taken as is, and anything else is
/// left to `chardetng`.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }

    let mut detector = EncodingDetector::new(Iso2022JpDetection::Deny);
    detector.feed(bytes, true);
    detector.guess(None, Utf8Detection::Allow)
}

/// Decodes raw bytes with `encoding`, dropping a matching BOM.
///
/// # Errors
///
/// Returns an error if the bytes are malformed in that encoding.
pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (decoded, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        anyhow::bail!("malformed {} content", encoding.name());
    }
    Ok(decoded.into_owned())
}

/// Normalizes `\r\n` and lone `\r` to the `\n` line separator.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Detects the encoding, decodes and normalizes line endings.
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded.
pub fn decode_source(bytes: &[u8]) -> Result<String> {
    let encoding = detect_encoding(bytes);
    tracing::debug!(encoding = encoding.name(), len = bytes.len(), "decoding source");
    let text = decode_bytes(bytes, encoding)?;
    Ok(normalize_line_endings(&text))
}

/// Reads and decodes a source file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn read_source(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read file: {}", path.display()))?;
    decode_source(&bytes).with_context(|| format!("failed to decode file: {}", path.display()))
}
