use byteorder::ByteOrder;

use super::{Buf, BufMut};
use crate::Result;

// Lead byte of a row value that stands for SQL NULL in the text protocol.
pub(crate) const NULL_VALUE: u8 = 0xfb;

/// MySQL-specific read extensions: length-encoded integers, byte strings and
/// the null-safe row-value variant.
pub trait MySqlBufExt<'a>: Buf<'a> {
    /// A length-encoded integer.
    ///
    /// The lead byte selects the width: `< 0xfb` is the value itself, `0xfc`
    /// a following `u16`, `0xfd` a `u24`, `0xfe` a `u64`. `0xfb` and `0xff`
    /// are errors in this position.
    fn get_uint_lenenc<T: ByteOrder>(&mut self) -> Result<u64>;

    fn get_bytes_lenenc<T: ByteOrder>(&mut self) -> Result<&'a [u8]>;

    fn get_str_lenenc<T: ByteOrder>(&mut self) -> Result<&'a str>;

    /// A length-encoded byte string where a lead byte of `0xfb` is an
    /// explicit NULL. Used for text-protocol row values only.
    fn get_bytes_lenenc_or_null<T: ByteOrder>(&mut self) -> Result<Option<&'a [u8]>>;
}

impl<'a> MySqlBufExt<'a> for &'a [u8] {
    fn get_uint_lenenc<T: ByteOrder>(&mut self) -> Result<u64> {
        Ok(match self.get_u8()? {
            0xfc => u64::from(self.get_u16::<T>()?),
            0xfd => u64::from(self.get_u24::<T>()?),
            0xfe => self.get_u64::<T>()?,

            tag @ (0xfb | 0xff) => {
                return Err(err_framing!(
                    "unknown tag 0x{:02X} for a length-encoded integer",
                    tag
                ));
            }

            value => u64::from(value),
        })
    }

    fn get_bytes_lenenc<T: ByteOrder>(&mut self) -> Result<&'a [u8]> {
        let len = self.get_uint_lenenc::<T>()?;
        self.get_bytes(len as usize)
    }

    fn get_str_lenenc<T: ByteOrder>(&mut self) -> Result<&'a str> {
        let len = self.get_uint_lenenc::<T>()?;
        self.get_str(len as usize)
    }

    fn get_bytes_lenenc_or_null<T: ByteOrder>(&mut self) -> Result<Option<&'a [u8]>> {
        if self.first() == Some(&NULL_VALUE) {
            self.advance(1)?;
            return Ok(None);
        }

        self.get_bytes_lenenc::<T>().map(Some)
    }
}

/// Write extensions; the length-encoded writer picks the smallest tag that
/// fits the value.
pub trait MySqlBufMutExt: BufMut {
    fn put_uint_lenenc<T: ByteOrder>(&mut self, val: u64);

    fn put_bytes_lenenc<T: ByteOrder>(&mut self, val: &[u8]);

    fn put_str_lenenc<T: ByteOrder>(&mut self, val: &str);
}

impl MySqlBufMutExt for Vec<u8> {
    fn put_uint_lenenc<T: ByteOrder>(&mut self, val: u64) {
        if val < 0xfb {
            self.put_u8(val as u8);
        } else if val <= 0xff_ff {
            self.put_u8(0xfc);
            self.put_u16::<T>(val as u16);
        } else if val <= 0xff_ff_ff {
            self.put_u8(0xfd);
            self.put_u24::<T>(val as u32);
        } else {
            self.put_u8(0xfe);
            self.put_u64::<T>(val);
        }
    }

    fn put_bytes_lenenc<T: ByteOrder>(&mut self, val: &[u8]) {
        self.put_uint_lenenc::<T>(val.len() as u64);
        self.put_bytes(val);
    }

    fn put_str_lenenc<T: ByteOrder>(&mut self, val: &str) {
        self.put_bytes_lenenc::<T>(val.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use byteorder::LittleEndian;

    use super::{MySqlBufExt, MySqlBufMutExt};
    use crate::Error;

    #[test]
    fn it_round_trips_lenenc_integers() {
        // Around every tag-width boundary, plus the extremes.
        let values: &[u64] = &[
            0,
            1,
            0xfa,
            0xfb,
            0xff,
            0x100,
            0xff_ff,
            0x1_00_00,
            0xff_ff_ff,
            0x1_00_00_00,
            u64::from(u32::MAX),
            u64::MAX,
        ];

        for &value in values {
            let mut buf = Vec::new();
            buf.put_uint_lenenc::<LittleEndian>(value);

            let mut slice = &buf[..];
            assert_eq!(slice.get_uint_lenenc::<LittleEndian>().unwrap(), value);
            assert!(slice.is_empty(), "residual bytes for {}", value);
        }
    }

    #[test]
    fn it_picks_the_minimal_tag_width() {
        for (value, len) in [
            (0u64, 1usize),
            (0xfa, 1),
            (0xfb, 3),
            (0xff_ff, 3),
            (0x1_00_00, 4),
            (0xff_ff_ff, 4),
            (0x1_00_00_00, 9),
            (u64::MAX, 9),
        ] {
            let mut buf = Vec::new();
            buf.put_uint_lenenc::<LittleEndian>(value);
            assert_eq!(buf.len(), len, "encoded width of {}", value);
        }
    }

    #[test]
    fn it_rejects_null_and_err_tags_for_plain_integers() {
        for lead in [0xfbu8, 0xff] {
            let mut buf: &[u8] = &[lead];
            assert!(matches!(
                buf.get_uint_lenenc::<LittleEndian>(),
                Err(Error::Framing(_))
            ));
        }
    }

    #[test]
    fn it_reads_null_markers_in_row_values() {
        let mut buf: &[u8] = &[0xfb, 0x01, b'1'];

        assert_eq!(buf.get_bytes_lenenc_or_null::<LittleEndian>().unwrap(), None);
        assert_eq!(
            buf.get_bytes_lenenc_or_null::<LittleEndian>().unwrap(),
            Some(&b"1"[..])
        );
    }
}
