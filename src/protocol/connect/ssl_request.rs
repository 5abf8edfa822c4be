use byteorder::LittleEndian;

use crate::io::BufMut;
use crate::protocol::{Encode, EncodeContext};

// https://dev.mysql.com/doc/internals/en/connection-phase-packets.html#packet-Protocol::SSLRequest
//
// The first 32 bytes of HandshakeResponse41, sent alone to ask for the TLS
// upgrade before any credentials cross the wire.
#[derive(Debug)]
pub(crate) struct SslRequest {
    pub(crate) max_packet_size: u32,
}

impl Encode for SslRequest {
    fn encode(&self, buf: &mut Vec<u8>, cx: &EncodeContext) {
        // client capabilities : int<4>
        buf.put_u32::<LittleEndian>(cx.capabilities.bits() as u32);

        // max packet size : int<4>
        buf.put_u32::<LittleEndian>(self.max_packet_size);

        // client charset : int<1>
        buf.put_u8(cx.charset.code());

        // filler : string<23>
        buf.advance(23);
    }
}
