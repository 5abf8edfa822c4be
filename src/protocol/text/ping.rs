use crate::io::BufMut;
use crate::protocol::{Encode, EncodeContext};

// https://dev.mysql.com/doc/internals/en/com-ping.html
#[derive(Debug)]
pub(crate) struct Ping;

impl Encode for Ping {
    fn encode(&self, buf: &mut Vec<u8>, _: &EncodeContext) {
        // COM_PING : int<1>
        buf.put_u8(0x0e);
    }
}
