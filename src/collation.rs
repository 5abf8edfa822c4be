//! Charset and collation registry.
//!
//! Two mappings, both build-time data: client charset *name* to the charset
//! byte sent in the handshake, and server collation *id* (as reported on
//! column definitions) to the host text codec used to decode row values.
//! Collations with no host codec (e.g. `binary`, `utf32`) leave values as
//! raw bytes.

use std::borrow::Cow;

use encoding_rs::Encoding;

use crate::Result;

/// The charset byte for the default client charset, `utf8mb4`
/// (`utf8mb4_0900_ai_ci`).
pub const DEFAULT_CHARSET: u8 = 255;

/// Charset names a client may select at connect time.
static CLIENT_CHARSETS: &[(&str, u8)] = &[
    ("utf8mb4", DEFAULT_CHARSET),
    ("utf8mb3", 33),
    ("utf8", 33),
    ("latin1", 8),
    ("ascii", 11),
];

// (first id, last id, charset) for the collation ids servers are known to
// report. Generated from `information_schema.collations` on MySQL 8 and
// MariaDB 10; unlisted ids decode as raw bytes.
static COLLATIONS: &[(u16, u16, &str)] = &[
    (1, 1, "big5"),
    (2, 2, "latin2"),
    (5, 5, "latin1"),
    (7, 7, "koi8r"),
    (8, 8, "latin1"),
    (9, 9, "latin2"),
    (11, 11, "ascii"),
    (12, 12, "ujis"),
    (13, 13, "sjis"),
    (14, 14, "cp1251"),
    (15, 15, "latin1"),
    (16, 16, "hebrew"),
    (18, 18, "tis620"),
    (19, 19, "euckr"),
    (21, 21, "latin2"),
    (22, 22, "koi8u"),
    (23, 23, "cp1251"),
    (24, 24, "gb2312"),
    (25, 25, "greek"),
    (26, 26, "cp1250"),
    (27, 27, "latin2"),
    (28, 28, "gbk"),
    (29, 29, "cp1257"),
    (30, 30, "latin5"),
    (31, 31, "latin1"),
    (33, 33, "utf8mb3"),
    (34, 34, "cp1250"),
    (35, 35, "ucs2"),
    (36, 36, "cp866"),
    (39, 39, "macroman"),
    (41, 42, "latin7"),
    (44, 44, "cp1250"),
    (45, 46, "utf8mb4"),
    (47, 49, "latin1"),
    (50, 52, "cp1251"),
    (53, 53, "macroman"),
    (54, 55, "utf16"),
    (56, 56, "utf16le"),
    (57, 57, "cp1256"),
    (58, 59, "cp1257"),
    (60, 61, "utf32"),
    (63, 63, "binary"),
    (65, 65, "ascii"),
    (66, 66, "cp1250"),
    (67, 67, "cp1256"),
    (68, 68, "cp866"),
    (70, 70, "greek"),
    (71, 71, "hebrew"),
    (74, 74, "koi8r"),
    (75, 75, "koi8u"),
    (76, 76, "utf8mb3"),
    (77, 77, "latin2"),
    (78, 78, "latin5"),
    (79, 79, "latin7"),
    (83, 83, "utf8mb3"),
    (84, 84, "big5"),
    (85, 85, "euckr"),
    (86, 86, "gb2312"),
    (87, 87, "gbk"),
    (88, 88, "sjis"),
    (89, 89, "tis620"),
    (90, 90, "ucs2"),
    (91, 91, "ujis"),
    (94, 94, "latin1"),
    (95, 96, "cp932"),
    (97, 98, "eucjpms"),
    (99, 99, "cp1250"),
    (101, 124, "utf16"),
    (128, 151, "ucs2"),
    (160, 183, "utf32"),
    (192, 223, "utf8mb3"),
    (224, 247, "utf8mb4"),
    (248, 250, "gb18030"),
    (255, 323, "utf8mb4"),
];

fn encoding_for_charset(charset: &str) -> Option<&'static Encoding> {
    Some(match charset {
        "utf8mb4" | "utf8mb3" | "utf8" => encoding_rs::UTF_8,

        // MySQL "latin1" is Western cp1252, not ISO-8859-1
        "latin1" => encoding_rs::WINDOWS_1252,

        "ascii" => encoding_rs::UTF_8,
        "latin2" => encoding_rs::ISO_8859_2,
        "latin5" => encoding_rs::WINDOWS_1254,
        "latin7" => encoding_rs::ISO_8859_13,
        "greek" => encoding_rs::ISO_8859_7,
        "hebrew" => encoding_rs::ISO_8859_8,
        "koi8r" => encoding_rs::KOI8_R,
        "koi8u" => encoding_rs::KOI8_U,
        "cp866" => encoding_rs::IBM866,
        "cp1250" => encoding_rs::WINDOWS_1250,
        "cp1251" => encoding_rs::WINDOWS_1251,
        "cp1256" => encoding_rs::WINDOWS_1256,
        "cp1257" => encoding_rs::WINDOWS_1257,
        "tis620" => encoding_rs::WINDOWS_874,
        "macroman" => encoding_rs::MACINTOSH,

        "big5" => encoding_rs::BIG5,
        "gb2312" | "gbk" => encoding_rs::GBK,
        "gb18030" => encoding_rs::GB18030,
        "sjis" | "cp932" => encoding_rs::SHIFT_JIS,
        "ujis" | "eucjpms" => encoding_rs::EUC_JP,
        "euckr" => encoding_rs::EUC_KR,

        // no BOM on the wire; MySQL's ucs2/utf16 are big-endian
        "ucs2" | "utf16" => encoding_rs::UTF_16BE,
        "utf16le" => encoding_rs::UTF_16LE,

        // `binary`, `utf32` and anything unlisted stay raw
        _ => return None,
    })
}

/// The server charset family name for a collation id.
pub fn charset_for_collation(id: u16) -> Option<&'static str> {
    COLLATIONS
        .iter()
        .find(|(first, last, _)| (*first..=*last).contains(&id))
        .map(|(_, _, charset)| *charset)
}

/// The host codec for a collation id, when one exists.
pub fn encoding_for_collation(id: u16) -> Option<&'static Encoding> {
    encoding_for_charset(charset_for_collation(id)?)
}

/// Best-effort decode of a row value under its column collation. `None` if
/// the collation is unknown, has no host codec, or the bytes do not decode
/// cleanly; the caller keeps the raw bytes in those cases.
pub(crate) fn decode_text(collation: u16, bytes: &[u8]) -> Option<String> {
    let (text, had_errors) = encoding_for_collation(collation)?.decode_without_bom_handling(bytes);

    if had_errors {
        return None;
    }

    Some(text.into_owned())
}

/// The charset a session encodes statements with, resolved by name at
/// connect time.
#[derive(Debug, Clone, Copy)]
pub struct ClientCharset {
    name: &'static str,
    code: u8,
    encoding: &'static Encoding,
}

impl ClientCharset {
    pub(crate) fn resolve(name: &str) -> Result<Self> {
        let (name, code) = CLIENT_CHARSETS
            .iter()
            .copied()
            .find(|(known, _)| *known == name)
            .ok_or_else(|| err_unsupported!("unknown client charset {:?}", name))?;

        // every entry in CLIENT_CHARSETS has a host codec
        let encoding = encoding_for_charset(name)
            .ok_or_else(|| err_unsupported!("charset {:?} has no host codec", name))?;

        Ok(Self {
            name,
            code,
            encoding,
        })
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn code(&self) -> u8 {
        self.code
    }

    pub(crate) fn encode<'a>(&self, text: &'a str) -> Cow<'a, [u8]> {
        self.encoding.encode(text).0
    }
}

impl Default for ClientCharset {
    fn default() -> Self {
        Self {
            name: "utf8mb4",
            code: DEFAULT_CHARSET,
            encoding: encoding_rs::UTF_8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn it_resolves_the_default_charset() {
        let charset = ClientCharset::resolve("utf8mb4").unwrap();

        assert_eq!(charset.code(), 255);
        assert_eq!(&*charset.encode("SELECT 1"), b"SELECT 1");
    }

    #[test]
    fn it_rejects_unknown_client_charsets() {
        assert!(matches!(
            ClientCharset::resolve("klingon"),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn it_maps_collations_to_host_codecs() {
        assert_eq!(encoding_for_collation(8), Some(encoding_rs::WINDOWS_1252));
        assert_eq!(encoding_for_collation(224), Some(encoding_rs::UTF_8));
        assert_eq!(encoding_for_collation(54), Some(encoding_rs::UTF_16BE));
        assert_eq!(encoding_for_collation(56), Some(encoding_rs::UTF_16LE));
        assert_eq!(encoding_for_collation(7), Some(encoding_rs::KOI8_R));

        // binary and unknown ids stay raw
        assert_eq!(encoding_for_collation(63), None);
        assert_eq!(encoding_for_collation(2047), None);
    }

    #[test]
    fn it_decodes_row_values_best_effort() {
        // 0xE9 is 'é' in cp1252 (latin1_swedish_ci, id 8)
        assert_eq!(decode_text(8, b"caf\xe9").as_deref(), Some("café"));

        // invalid UTF-8 under a utf8mb4 collation falls back to raw bytes
        assert_eq!(decode_text(255, b"\xff\xfe"), None);
    }
}
