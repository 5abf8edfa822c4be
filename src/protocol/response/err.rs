use byteorder::LittleEndian;

use crate::io::Buf;
use crate::protocol::Capabilities;
use crate::Result;

// https://dev.mysql.com/doc/dev/mysql-server/8.0.12/page_protocol_basic_err_packet.html
// https://mariadb.com/kb/en/err_packet/
#[derive(Debug)]
pub struct ErrPacket {
    pub code: u16,
    /// The `#` marker preceding the SQLSTATE; absent pre-4.1.
    pub sql_state_marker: Option<u8>,
    pub sql_state: Option<Box<str>>,
    pub message: Box<str>,
}

impl ErrPacket {
    pub(crate) fn read(mut buf: &[u8], capabilities: Capabilities) -> Result<Self> {
        let header = buf.get_u8()?;
        if header != 0xff {
            return Err(err_framing!("expected ERR (0xFF); received 0x{:02X}", header));
        }

        let code = buf.get_u16::<LittleEndian>()?;

        let (sql_state_marker, sql_state) =
            if capabilities.contains(Capabilities::PROTOCOL_41) {
                (Some(buf.get_u8()?), Some(buf.get_str(5)?.into()))
            } else {
                (None, None)
            };

        let message = buf.get_str_eof()?.into();

        Ok(Self {
            code,
            sql_state_marker,
            sql_state,
            message,
        })
    }
}
