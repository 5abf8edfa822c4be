use crate::io::BufMut;
use crate::protocol::{Encode, EncodeContext};

// https://dev.mysql.com/doc/internals/en/com-quit.html
#[derive(Debug)]
pub(crate) struct Quit;

impl Encode for Quit {
    fn encode(&self, buf: &mut Vec<u8>, _: &EncodeContext) {
        // COM_QUIT : int<1>
        buf.put_u8(0x01);
    }
}
