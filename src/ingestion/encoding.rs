//! Text encodings for delimited input.

use std::fmt;

use encoding_rs::Encoding;

use crate::error::{AnalysisError, AnalysisResult};

/// Text encoding a source file is declared to use.
///
/// ISO-8859-1 (`latin-1`, `iso-8859-1`, `l1`, ...) is decoded byte for byte: 0xNN becomes
/// U+00NN, including the C1 controls at 0x80-0x9F. Every other label follows the WHATWG
/// Encoding Standard as implemented by `encoding_rs`; `windows-1252` / `cp1252` still decode
/// 0x80 as `€`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding(Codec);

#[derive(Clone, Copy, PartialEq, Eq)]
enum Codec {
    Latin1,
    Whatwg(&'static Encoding),
}

/// Labels Python accepts for ISO-8859-1, lowercased.
const LATIN1_LABELS: &[&str] = &[
    "latin-1", "latin_1", "latin1", "latin", "l1", "iso-8859-1", "iso8859-1", "iso_8859-1", "iso_8859_1",
    "8859", "cp819",
];

impl TextEncoding {
    /// UTF-8, the default for files with no declared encoding.
    pub fn utf8() -> Self {
        Self(Codec::Whatwg(encoding_rs::UTF_8))
    }

    /// ISO-8859-1 / latin-1.
    pub fn latin1() -> Self {
        Self(Codec::Latin1)
    }

    /// Resolve an encoding label such as `"utf-8"` or `"latin-1"` (case-insensitive).
    pub fn from_label(label: &str) -> AnalysisResult<Self> {
        let normalized = label.trim().to_ascii_lowercase();
        if LATIN1_LABELS.contains(&normalized.as_str()) {
            return Ok(Self::latin1());
        }
        Encoding::for_label(normalized.as_bytes())
            .map(|e| Self(Codec::Whatwg(e)))
            .ok_or_else(|| AnalysisError::Encoding {
                label: label.to_owned(),
            })
    }

    /// Canonical name of the encoding.
    pub fn name(&self) -> &'static str {
        match self.0 {
            Codec::Latin1 => "ISO-8859-1",
            Codec::Whatwg(e) => e.name(),
        }
    }

    /// Decode `bytes`, stripping a byte-order mark for this encoding if present.
    ///
    /// Malformed input is an [`AnalysisError::Parse`] pointing at the first bad line. ISO-8859-1
    /// input cannot be malformed.
    pub fn decode(&self, bytes: &[u8]) -> AnalysisResult<String> {
        let encoding = match self.0 {
            Codec::Latin1 => return Ok(bytes.iter().copied().map(char::from).collect()),
            Codec::Whatwg(e) => e,
        };
        let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
        if had_errors {
            let bad_at = text.find(char::REPLACEMENT_CHARACTER).unwrap_or(text.len());
            let line = text[..bad_at].matches('\n').count() + 1;
            return Err(AnalysisError::Parse {
                row: line,
                message: format!("input is not valid {}", self.name()),
            });
        }
        Ok(text.into_owned())
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::utf8()
    }
}

impl fmt::Debug for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextEncoding").field(&self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::TextEncoding;

    #[test]
    fn latin1_labels_resolve() {
        for label in ["latin-1", "Latin1", "ISO-8859-1", "latin_1"] {
            assert_eq!(TextEncoding::from_label(label).unwrap(), TextEncoding::latin1());
        }
        assert_eq!(TextEncoding::from_label("utf-8").unwrap(), TextEncoding::utf8());
        assert_eq!(TextEncoding::latin1().name(), "ISO-8859-1");
    }

    #[test]
    fn latin1_maps_c1_bytes_to_same_code_points() {
        let latin1 = TextEncoding::from_label("latin-1").unwrap();
        assert_eq!(latin1.decode(&[0x80, 0x9F, 0xFF]).unwrap(), "\u{80}\u{9f}\u{ff}");

        let cp1252 = TextEncoding::from_label("windows-1252").unwrap();
        assert_ne!(cp1252, latin1);
        assert_eq!(cp1252.decode(&[0x80]).unwrap(), "€");
    }

    #[test]
    fn unknown_label_is_an_error() {
        let err = TextEncoding::from_label("klingon-8").unwrap_err();
        assert!(err.to_string().contains("unknown text encoding 'klingon-8'"));
    }

    #[test]
    fn latin1_decodes_accented_bytes() {
        // "Côte" in latin-1
        let bytes = [b'C', 0xF4, b't', b'e'];
        assert_eq!(TextEncoding::latin1().decode(&bytes).unwrap(), "Côte");
    }

    #[test]
    fn invalid_utf8_reports_line() {
        let bytes = b"a,b\n1,2\n\xff,3\n";
        let err = TextEncoding::utf8().decode(bytes).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("parse error at row 3"), "{msg}");
        assert!(msg.contains("not valid UTF-8"), "{msg}");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let bytes = b"\xEF\xBB\xBFEntity,Year\n";
        assert_eq!(TextEncoding::utf8().decode(bytes).unwrap(), "Entity,Year\n");
    }
}
