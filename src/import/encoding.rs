//! Character decoding for XMI files
//!
//! Enterprise Architect writes XMI exports as Windows-1252 unless told
//! otherwise. Content is decoded as UTF-8 when it is valid UTF-8 and as
//! Windows-1252 otherwise.

use encoding_rs::WINDOWS_1252;
use serde::{Deserialize, Serialize};

/// Encoding a document was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceEncoding {
    Utf8,
    Windows1252,
}

/// Decoded document text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: SourceEncoding,
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode raw file bytes.
///
/// # Example
///
/// ```rust
/// use xmi_schema::import::encoding::{SourceEncoding, decode_xmi_bytes};
///
/// let decoded = decode_xmi_bytes(b"caf\xe9");
/// assert_eq!(decoded.text, "café");
/// assert_eq!(decoded.encoding, SourceEncoding::Windows1252);
/// ```
pub fn decode_xmi_bytes(bytes: &[u8]) -> DecodedText {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => DecodedText {
            text: text.to_string(),
            encoding: SourceEncoding::Utf8,
        },
        Err(_) => DecodedText {
            text: decode_windows_1252(bytes),
            encoding: SourceEncoding::Windows1252,
        },
    }
}

fn decode_windows_1252(bytes: &[u8]) -> String {
    // Every byte has a mapping, so decoding never reports errors
    let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text.into_owned()
}
