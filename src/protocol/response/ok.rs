use byteorder::LittleEndian;

use crate::io::{Buf, MySqlBufExt};
use crate::protocol::{Capabilities, Status};
use crate::Result;

// https://dev.mysql.com/doc/dev/mysql-server/8.0.12/page_protocol_basic_ok_packet.html
// https://mariadb.com/kb/en/ok_packet/
#[derive(Debug)]
pub struct OkPacket {
    /// `0x00`, or `0xFE` when this OK stands in for a deprecated EOF.
    /// Diagnostic only; never a discriminator after classification.
    pub header: u8,
    pub affected_rows: u64,
    pub last_insert_id: u64,
    pub status: Status,
    pub warnings: u16,
    pub info: Box<str>,
    pub session_state_info: Option<Box<[u8]>>,
}

impl OkPacket {
    /// Reads an OK packet under the given capabilities.
    ///
    /// Trailing fields are probed by position: each is read only while bytes
    /// remain, so a minimal 7-byte OK and a full OK with empty `info` parse
    /// the same way.
    pub(crate) fn read(mut buf: &[u8], capabilities: Capabilities) -> Result<Self> {
        let header = buf.get_u8()?;

        let affected_rows = buf.get_uint_lenenc::<LittleEndian>()?;
        let last_insert_id = buf.get_uint_lenenc::<LittleEndian>()?;

        let status = if capabilities
            .intersects(Capabilities::PROTOCOL_41 | Capabilities::TRANSACTIONS)
            && buf.len() >= 2
        {
            Status::from_bits_truncate(buf.get_u16::<LittleEndian>()?)
        } else {
            Status::empty()
        };

        let warnings = if capabilities.contains(Capabilities::PROTOCOL_41) && buf.len() >= 2 {
            buf.get_u16::<LittleEndian>()?
        } else {
            0
        };

        let mut session_state_info = None;

        let info = if capabilities.contains(Capabilities::SESSION_TRACK) {
            let info = if buf.is_empty() {
                ""
            } else {
                buf.get_str_lenenc::<LittleEndian>()?
            };

            if status.contains(Status::SESSION_STATE_CHANGED) && !buf.is_empty() {
                session_state_info = Some(buf.get_bytes_lenenc::<LittleEndian>()?.into());
            }

            info
        } else {
            buf.get_str_eof()?
        };

        Ok(Self {
            header,
            affected_rows,
            last_insert_id,
            status,
            warnings,
            info: info.into(),
            session_state_info,
        })
    }
}
