use byteorder::LittleEndian;

use crate::io::Buf;
use crate::protocol::{Capabilities, Status};
use crate::Result;

// https://dev.mysql.com/doc/dev/mysql-server/8.0.12/page_protocol_basic_eof_packet.html
// https://mariadb.com/kb/en/eof_packet/
//
// Not sent by servers that negotiated DEPRECATE_EOF; those terminate result
// sets with an OK packet carrying the 0xFE header instead.
#[derive(Debug)]
pub struct EofPacket {
    /// Always `0xFE`; diagnostic only.
    pub header: u8,
    pub warnings: u16,
    pub status: Status,
}

impl EofPacket {
    pub(crate) fn read(mut buf: &[u8], capabilities: Capabilities) -> Result<Self> {
        let header = buf.get_u8()?;
        if header != 0xfe {
            return Err(err_framing!("expected EOF (0xFE); received 0x{:02X}", header));
        }

        let (warnings, status) = if capabilities.contains(Capabilities::PROTOCOL_41) {
            (
                buf.get_u16::<LittleEndian>()?,
                Status::from_bits_truncate(buf.get_u16::<LittleEndian>()?),
            )
        } else {
            (0, Status::empty())
        };

        Ok(Self {
            header,
            warnings,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Capabilities, EofPacket, Status};

    #[test]
    fn it_reads_eof_with_protocol_41() {
        let p = EofPacket::read(b"\xfe\x01\x00\x02\x00", Capabilities::PROTOCOL_41).unwrap();

        assert_eq!(p.header, 0xfe);
        assert_eq!(p.warnings, 1);
        assert!(p.status.contains(Status::AUTOCOMMIT));
    }

    #[test]
    fn it_reads_bare_eof_without_protocol_41() {
        let p = EofPacket::read(b"\xfe", Capabilities::empty()).unwrap();

        assert_eq!(p.warnings, 0);
        assert!(p.status.is_empty());
    }
}
