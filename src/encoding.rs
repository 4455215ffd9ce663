//! Decoding of raw file bytes into UTF-8 text using chardetng and `encoding_rs`.

use chardetng::EncodingDetector;
use simdutf8::basic::from_utf8;
use std::borrow::Cow;

/// Check if the given bytes are valid UTF-8.
///
/// Uses SIMD-accelerated validation for performance.
pub fn is_utf8(data: &[u8]) -> bool {
    from_utf8(data).is_ok()
}

/// Check if the data starts with a UTF-8 BOM (EF BB BF).
pub fn has_utf8_bom(data: &[u8]) -> bool {
    data.starts_with(&[0xEF, 0xBB, 0xBF])
}

/// Skip the UTF-8 BOM if present and return the remaining data.
pub fn skip_bom(data: &[u8]) -> &[u8] {
    if has_utf8_bom(data) { &data[3..] } else { data }
}

/// Text decoded from raw file bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText<'a> {
    /// The decoded text, without any byte order mark.
    pub text: Cow<'a, str>,
    /// Name of the source encoding.
    pub encoding: &'static str,
    /// Whether a byte order mark was present.
    pub had_bom: bool,
    /// Whether the bytes had to be transcoded to UTF-8.
    pub transcoded: bool,
}

/// Decode file bytes into UTF-8 text.
///
/// Valid UTF-8 is borrowed without copying. UTF-16 input is recognized by
/// its BOM; anything else goes through chardetng detection, which covers
/// the common single-byte code pages (Windows-125x, ISO-8859) and CJK
/// encodings.
pub fn decode(data: &[u8]) -> DecodedText<'_> {
    // chardetng doesn't handle UTF-16 BOMs
    if data.starts_with(&[0xFF, 0xFE]) || data.starts_with(&[0xFE, 0xFF]) {
        let encoding = if data[0] == 0xFF {
            encoding_rs::UTF_16LE
        } else {
            encoding_rs::UTF_16BE
        };
        let (decoded, _) = encoding.decode_without_bom_handling(&data[2..]);
        return DecodedText {
            text: Cow::Owned(decoded.into_owned()),
            encoding: encoding.name(),
            had_bom: true,
            transcoded: true,
        };
    }

    let had_bom = has_utf8_bom(data);
    let body = skip_bom(data);

    if let Ok(text) = from_utf8(body) {
        return DecodedText {
            text: Cow::Borrowed(text),
            encoding: encoding_rs::UTF_8.name(),
            had_bom,
            transcoded: false,
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);

    // Lossy decode; malformed sequences become U+FFFD
    let (decoded, _, _) = encoding.decode(body);
    let transcoded = encoding != encoding_rs::UTF_8;
    tracing::debug!(encoding = encoding.name(), "Decoded non-UTF-8 input");

    DecodedText {
        text: Cow::Owned(decoded.into_owned()),
        encoding: encoding.name(),
        had_bom,
        transcoded,
    }
}
