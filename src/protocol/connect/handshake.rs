use byteorder::LittleEndian;

use crate::io::Buf;
use crate::protocol::{Capabilities, Status};
use crate::{Error, Result};

// https://dev.mysql.com/doc/dev/mysql-server/8.0.12/page_protocol_connection_phase_packets_protocol_handshake_v10.html
// https://mariadb.com/kb/en/connection/#initial-handshake-packet
#[derive(Debug)]
pub(crate) struct Handshake {
    pub(crate) server_version: Box<str>,
    pub(crate) thread_id: u32,
    pub(crate) server_capabilities: Capabilities,
    pub(crate) server_default_collation: u8,
    pub(crate) status: Status,
    pub(crate) auth_plugin_name: Option<Box<str>>,

    // auth_data_1 ++ auth_data_2, as sent; the scramble uses the first 20
    auth_plugin_data: Box<[u8]>,
}

impl Handshake {
    pub(crate) fn challenge(&self) -> &[u8] {
        &self.auth_plugin_data
    }

    pub(crate) fn read(mut buf: &[u8]) -> Result<Self> {
        // protocol version : int<1>
        let protocol_version = buf.get_u8()?;
        if protocol_version != 10 {
            return Err(Error::ProtocolVersion(protocol_version));
        }

        // server version : string<NUL>
        let server_version = buf.get_str_nul()?.into();

        // thread id : int<4>
        let thread_id = buf.get_u32::<LittleEndian>()?;

        // scramble, first part : string<8>
        let mut auth_plugin_data = buf.get_bytes(8)?.to_vec();

        // filler : int<1>
        buf.advance(1)?;

        // capability flags, lower half : int<2>
        let capabilities_lo = buf.get_u16::<LittleEndian>()?;

        // character set : int<1>
        let server_default_collation = buf.get_u8()?;

        // status flags : int<2>
        let status = Status::from_bits_truncate(buf.get_u16::<LittleEndian>()?);

        // capability flags, upper half : int<2>
        let capabilities_hi = buf.get_u16::<LittleEndian>()?;

        let mut capabilities = Capabilities::from_bits_truncate(
            u64::from(capabilities_lo) | (u64::from(capabilities_hi) << 16),
        );

        // length of the scramble, 0 without PLUGIN_AUTH : int<1>
        let auth_plugin_data_len = buf.get_u8()?;

        // reserved : string<6>
        buf.advance(6)?;

        if capabilities.contains(Capabilities::MYSQL) {
            // reserved : string<4>
            buf.advance(4)?;
        } else {
            // extended (MariaDB) capability flags : int<4>
            capabilities |= Capabilities::from_bits_truncate(
                u64::from(buf.get_u32::<LittleEndian>()?) << 32,
            );
        }

        let auth_plugin_name = if capabilities.contains(Capabilities::PLUGIN_AUTH) {
            // scramble, second part : string<n> where n = max(13, length - 8)
            let len = ((auth_plugin_data_len as isize) - 8).max(13) as usize;
            auth_plugin_data.extend_from_slice(buf.get_bytes(len)?);

            // plugin name : string<NUL>
            Some(buf.get_str_nul()?.into())
        } else {
            None
        };

        if !buf.is_empty() {
            return Err(err_framing!(
                "{} stray byte(s) after the server handshake",
                buf.len()
            ));
        }

        Ok(Self {
            server_version,
            thread_id,
            server_capabilities: capabilities,
            server_default_collation,
            status,
            auth_plugin_name,
            auth_plugin_data: auth_plugin_data.into(),
        })
    }
}
