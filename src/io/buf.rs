use std::str;

use byteorder::ByteOrder;
use memchr::memchr;

use crate::{Error, Result};

fn underflow(needed: usize, have: usize) -> Error {
    err_framing!(
        "unexpected end of packet; needed {} byte(s), have {}",
        needed,
        have
    )
}

/// A checked cursor over a packet body.
///
/// Every read consumes from the front of the slice and fails with
/// [`Error::Framing`] instead of running past the end.
pub trait Buf<'a> {
    fn advance(&mut self, cnt: usize) -> Result<()>;

    fn get_u8(&mut self) -> Result<u8>;

    fn get_u16<T: ByteOrder>(&mut self) -> Result<u16>;

    fn get_u24<T: ByteOrder>(&mut self) -> Result<u32>;

    fn get_u32<T: ByteOrder>(&mut self) -> Result<u32>;

    fn get_u64<T: ByteOrder>(&mut self) -> Result<u64>;

    fn get_bytes(&mut self, len: usize) -> Result<&'a [u8]>;

    /// Bytes up to (and consuming, but not returning) the next `0x00`.
    fn get_bytes_nul(&mut self) -> Result<&'a [u8]>;

    /// The remainder of the packet.
    fn get_bytes_eof(&mut self) -> Result<&'a [u8]>;

    fn get_str(&mut self, len: usize) -> Result<&'a str>;

    fn get_str_nul(&mut self) -> Result<&'a str>;

    fn get_str_eof(&mut self) -> Result<&'a str>;
}

fn to_str(buf: &[u8]) -> Result<&str> {
    str::from_utf8(buf).map_err(|err| err_framing!("string is not valid UTF-8: {}", err))
}

impl<'a> Buf<'a> for &'a [u8] {
    fn advance(&mut self, cnt: usize) -> Result<()> {
        if self.len() < cnt {
            return Err(underflow(cnt, self.len()));
        }

        *self = &self[cnt..];

        Ok(())
    }

    fn get_u8(&mut self) -> Result<u8> {
        let val = *self.first().ok_or_else(|| underflow(1, 0))?;
        *self = &self[1..];

        Ok(val)
    }

    fn get_u16<T: ByteOrder>(&mut self) -> Result<u16> {
        let val = T::read_u16(self.get_bytes(2)?);

        Ok(val)
    }

    fn get_u24<T: ByteOrder>(&mut self) -> Result<u32> {
        let val = T::read_u24(self.get_bytes(3)?);

        Ok(val)
    }

    fn get_u32<T: ByteOrder>(&mut self) -> Result<u32> {
        let val = T::read_u32(self.get_bytes(4)?);

        Ok(val)
    }

    fn get_u64<T: ByteOrder>(&mut self) -> Result<u64> {
        let val = T::read_u64(self.get_bytes(8)?);

        Ok(val)
    }

    fn get_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.len() < len {
            return Err(underflow(len, self.len()));
        }

        let buf = &self[..len];
        *self = &self[len..];

        Ok(buf)
    }

    fn get_bytes_nul(&mut self) -> Result<&'a [u8]> {
        let len = memchr(b'\0', self)
            .ok_or_else(|| err_framing!("string is missing its NUL terminator"))?;

        let buf = &self[..len];
        *self = &self[len + 1..];

        Ok(buf)
    }

    fn get_bytes_eof(&mut self) -> Result<&'a [u8]> {
        let buf = &self[..];
        *self = &self[self.len()..];

        Ok(buf)
    }

    fn get_str(&mut self, len: usize) -> Result<&'a str> {
        to_str(self.get_bytes(len)?)
    }

    fn get_str_nul(&mut self) -> Result<&'a str> {
        to_str(self.get_bytes_nul()?)
    }

    fn get_str_eof(&mut self) -> Result<&'a str> {
        to_str(self.get_bytes_eof()?)
    }
}

#[cfg(test)]
mod tests {
    use byteorder::LittleEndian;

    use super::Buf;
    use crate::Error;

    #[test]
    fn it_reads_fixed_width_integers() {
        let mut buf: &[u8] = &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];

        assert_eq!(buf.get_u8().unwrap(), 1);
        assert_eq!(buf.get_u16::<LittleEndian>().unwrap(), 0x0302);
        assert_eq!(buf.get_u24::<LittleEndian>().unwrap(), 0x06_0504);
        assert_eq!(buf.get_u8().unwrap(), 7);
        assert!(buf.is_empty());
    }

    #[test]
    fn it_reads_nul_terminated_strings() {
        let mut buf: &[u8] = b"mysql_native_password\0rest";

        assert_eq!(buf.get_str_nul().unwrap(), "mysql_native_password");
        assert_eq!(buf, b"rest");
    }

    #[test]
    fn it_rejects_unterminated_strings() {
        let mut buf: &[u8] = b"no terminator here";

        assert!(matches!(buf.get_str_nul(), Err(Error::Framing(_))));
    }

    #[test]
    fn it_rejects_reads_past_the_end() {
        let mut buf: &[u8] = &[0x01];

        assert!(matches!(
            buf.get_u32::<LittleEndian>(),
            Err(Error::Framing(_))
        ));
    }
}
