//! Text decoding for locally uploaded digests.
//!
//! Uploads arrive as raw bytes; this module turns them into a `String`:
//! BOM detection first, a strict UTF-8 fast path, then chardetng as a
//! fallback, always decoding with replacement rather than failing.

use chardetng::EncodingDetector;
use encoding_rs::{UTF_16BE, UTF_16LE, UTF_8};

const SAMPLE_SIZE: usize = 8192;

/// Decode bytes into text, returning the content and the encoding label
/// that was used.
pub fn decode_text(bytes: &[u8]) -> (String, String) {
    if bytes.is_empty() {
        return (String::new(), "utf-8".to_string());
    }

    // BOM markers are the most reliable signal.
    if bytes.starts_with(&[0xef, 0xbb, 0xbf]) {
        let (content, _, _) = UTF_8.decode(&bytes[3..]);
        return (content.into_owned(), "utf-8-sig".to_string());
    }
    if bytes.starts_with(&[0xff, 0xfe]) {
        let (content, _, _) = UTF_16LE.decode(bytes);
        return (content.into_owned(), "utf-16-le".to_string());
    }
    if bytes.starts_with(&[0xfe, 0xff]) {
        let (content, _, _) = UTF_16BE.decode(bytes);
        return (content.into_owned(), "utf-16-be".to_string());
    }

    // Fast path: most digests are plain UTF-8.
    if let Ok(content) = std::str::from_utf8(bytes) {
        return (content.to_string(), "utf-8".to_string());
    }

    let mut detector = EncodingDetector::new();
    detector.feed(&bytes[..bytes.len().min(SAMPLE_SIZE)], true);
    let encoding = detector.guess(None, true);
    let (content, used, _) = encoding.decode(bytes);
    (content.into_owned(), used.name().to_lowercase())
}

/// Heuristic binary sniff: null bytes, or a low ratio of printable ASCII
/// in the sampled prefix.
pub fn looks_binary(bytes: &[u8]) -> bool {
    let sample = &bytes[..bytes.len().min(SAMPLE_SIZE)];
    if sample.is_empty() {
        return false;
    }

    if sample.contains(&0) {
        // UTF-16 text has null bytes everywhere; the BOM tells it apart.
        return !(sample.starts_with(&[0xff, 0xfe]) || sample.starts_with(&[0xfe, 0xff]));
    }

    let printable = sample
        .iter()
        .filter(|&&b| (32..=126).contains(&b) || b == 9 || b == 10 || b == 13)
        .count();
    (printable as f64 / sample.len() as f64) < 0.70
}
