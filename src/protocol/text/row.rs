use byteorder::LittleEndian;

use crate::io::MySqlBufExt;
use crate::Result;

// https://dev.mysql.com/doc/dev/mysql-server/8.0.12/page_protocol_com_query_response_text_resultset_row.html
//
// One value per column, positionally aligned with the preceding column
// definitions: either the NULL marker (0xFB) or a length-encoded byte
// string.
#[derive(Debug)]
pub(crate) struct TextRow(pub(crate) Vec<Option<Vec<u8>>>);

impl TextRow {
    pub(crate) fn read(mut buf: &[u8], columns: usize) -> Result<Self> {
        let mut values = Vec::with_capacity(columns);

        for _ in 0..columns {
            values.push(
                buf.get_bytes_lenenc_or_null::<LittleEndian>()?
                    .map(<[u8]>::to_vec),
            );
        }

        Ok(TextRow(values))
    }
}

#[cfg(test)]
mod tests {
    use super::TextRow;
    use crate::Error;

    #[test]
    fn it_reads_values_positionally() {
        // "1" | NULL | "abc"
        let row = TextRow::read(b"\x011\xfb\x03abc", 3).unwrap();

        assert_eq!(row.0[0].as_deref(), Some(&b"1"[..]));
        assert_eq!(row.0[1], None);
        assert_eq!(row.0[2].as_deref(), Some(&b"abc"[..]));
    }

    #[test]
    fn it_fails_on_a_truncated_row() {
        assert!(matches!(
            TextRow::read(b"\x05ab", 1),
            Err(Error::Framing(_))
        ));
    }
}
