use byteorder::LittleEndian;

use crate::io::{BufMut, MySqlBufMutExt};
use crate::protocol::{Capabilities, Encode, EncodeContext};

// https://dev.mysql.com/doc/dev/mysql-server/8.0.12/page_protocol_connection_phase_packets_protocol_handshake_response.html
// https://mariadb.com/kb/en/connection/#handshake-response-packet
#[derive(Debug)]
pub(crate) struct HandshakeResponse<'a> {
    pub(crate) max_packet_size: u32,
    pub(crate) username: &'a str,
    pub(crate) auth_response: &'a [u8],
    pub(crate) database: Option<&'a str>,
    pub(crate) auth_plugin_name: Option<&'a str>,

    // encoded when set, never populated by this crate
    pub(crate) connect_attrs: Option<&'a [(&'a str, &'a str)]>,
    pub(crate) zstd_compression_level: Option<u8>,
}

impl Encode for HandshakeResponse<'_> {
    fn encode(&self, buf: &mut Vec<u8>, cx: &EncodeContext) {
        // client capabilities, lower half : int<4>
        buf.put_u32::<LittleEndian>(cx.capabilities.bits() as u32);

        // max packet size : int<4>
        buf.put_u32::<LittleEndian>(self.max_packet_size);

        // client charset : int<1>
        buf.put_u8(cx.charset.code());

        // filler : string<23>
        buf.advance(23);

        // username : string<NUL>
        buf.put_str_nul(self.username);

        if cx.capabilities.contains(Capabilities::PLUGIN_AUTH_LENENC_DATA) {
            // auth response : string<lenenc>
            buf.put_bytes_lenenc::<LittleEndian>(self.auth_response);
        } else {
            // auth response length : int<1>, then the bytes
            buf.put_u8(self.auth_response.len() as u8);
            buf.put_bytes(self.auth_response);
        }

        if cx.capabilities.contains(Capabilities::CONNECT_WITH_DB) {
            if let Some(database) = self.database {
                // database : string<NUL>
                buf.put_str_nul(database);
            }
        }

        if cx.capabilities.contains(Capabilities::PLUGIN_AUTH) {
            if let Some(plugin) = self.auth_plugin_name {
                // client plugin name : string<NUL>
                buf.put_str_nul(plugin);
            }
        }

        if cx.capabilities.contains(Capabilities::CONNECT_ATTRS) {
            if let Some(attrs) = self.connect_attrs {
                let mut kv = Vec::new();
                for (key, value) in attrs {
                    kv.put_str_lenenc::<LittleEndian>(key);
                    kv.put_str_lenenc::<LittleEndian>(value);
                }

                buf.put_uint_lenenc::<LittleEndian>(kv.len() as u64);
                buf.put_bytes(&kv);
            }
        }

        if cx.capabilities.contains(Capabilities::ZSTD_COMPRESSION_ALGORITHM) {
            if let Some(level) = self.zstd_compression_level {
                // compression level : int<1>
                buf.put_u8(level);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HandshakeResponse;
    use crate::collation::ClientCharset;
    use crate::protocol::{Capabilities, Encode, EncodeContext};

    fn context(capabilities: Capabilities) -> EncodeContext {
        EncodeContext {
            capabilities,
            charset: ClientCharset::default(),
        }
    }

    fn response<'a>(auth_response: &'a [u8]) -> HandshakeResponse<'a> {
        HandshakeResponse {
            max_packet_size: 0xff_ff_ff,
            username: "root",
            auth_response,
            database: Some("shop"),
            auth_plugin_name: Some("mysql_native_password"),
            connect_attrs: None,
            zstd_compression_level: None,
        }
    }

    #[test]
    fn it_encodes_the_fixed_prefix() {
        let caps = Capabilities::PROTOCOL_41 | Capabilities::PLUGIN_AUTH;

        let mut buf = Vec::new();
        response(b"").encode(&mut buf, &context(caps));

        assert_eq!(&buf[..4], (caps.bits() as u32).to_le_bytes());
        assert_eq!(&buf[4..8], 0xff_ff_ffu32.to_le_bytes());
        assert_eq!(buf[8], 255);
        assert!(buf[9..32].iter().all(|&b| b == 0));
        assert_eq!(&buf[32..37], b"root\0");
    }

    #[test]
    fn it_length_prefixes_the_auth_response_by_capability() {
        let scramble = [0xaa_u8; 20];

        // one-byte length prefix
        let mut buf = Vec::new();
        response(&scramble).encode(&mut buf, &context(Capabilities::PROTOCOL_41));
        assert_eq!(buf[37], 20);
        assert_eq!(&buf[38..58], scramble);

        // lenenc prefix (same wire form for n < 0xfb, picked via the flag)
        let mut lenenc = Vec::new();
        response(&scramble).encode(
            &mut lenenc,
            &context(Capabilities::PROTOCOL_41 | Capabilities::PLUGIN_AUTH_LENENC_DATA),
        );
        assert_eq!(lenenc[37], 20);
        assert_eq!(&lenenc[38..58], scramble);
    }

    #[test]
    fn it_appends_database_and_plugin_in_order() {
        let caps = Capabilities::PROTOCOL_41
            | Capabilities::CONNECT_WITH_DB
            | Capabilities::PLUGIN_AUTH;

        let mut buf = Vec::new();
        response(b"").encode(&mut buf, &context(caps));

        let tail = &buf[38..];
        assert_eq!(tail, b"shop\0mysql_native_password\0");
    }
}
