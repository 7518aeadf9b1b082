//! Text decoding for exported clinical data.
//!
//! Exports arrive as UTF-8, UTF-8 with BOM, UTF-16 with BOM, or legacy
//! Windows-1252. A BOM decides the encoding; otherwise UTF-8 is tried and
//! Windows-1252 is the fallback, which never fails.

use encoding_rs::{Encoding, WINDOWS_1252};

/// Decoded text and the name of the encoding that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static str,
}

/// Decode raw file bytes into text.
pub fn decode_text(bytes: &[u8]) -> DecodedText {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return DecodedText {
            text: text.into_owned(),
            encoding: encoding.name(),
        };
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => DecodedText {
            text: text.to_string(),
            encoding: "UTF-8",
        },
        Err(_) => {
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            tracing::debug!("input is not valid UTF-8, decoded as windows-1252");
            DecodedText {
                text: text.into_owned(),
                encoding: WINDOWS_1252.name(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_utf8() {
        let decoded = decode_text("NT-proBNP 2,400 pg/mL".as_bytes());
        assert_eq!(decoded.text, "NT-proBNP 2,400 pg/mL");
        assert_eq!(decoded.encoding, "UTF-8");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let decoded = decode_text(b"\xEF\xBB\xBFpatient_id\tnote");
        assert_eq!(decoded.text, "patient_id\tnote");
        assert_eq!(decoded.encoding, "UTF-8");
    }

    #[test]
    fn windows_1252_fallback() {
        // 0x96 is an en dash in windows-1252 and invalid as UTF-8.
        let decoded = decode_text(b"NYHA class II\x96III");
        assert_eq!(decoded.text, "NYHA class II\u{2013}III");
        assert_eq!(decoded.encoding, "windows-1252");
    }

    #[test]
    fn utf16_le_with_bom() {
        let decoded = decode_text(b"\xFF\xFEe\x00G\x00F\x00R\x00");
        assert_eq!(decoded.text, "eGFR");
        assert_eq!(decoded.encoding, "UTF-16LE");
    }
}
