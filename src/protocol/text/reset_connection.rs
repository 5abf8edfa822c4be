use crate::io::BufMut;
use crate::protocol::{Encode, EncodeContext};

// https://dev.mysql.com/doc/dev/mysql-server/8.0.12/page_protocol_com_reset_connection.html
//
// Resets session state (user variables, temporary tables, ...) without
// re-authenticating.
#[derive(Debug)]
pub(crate) struct ResetConnection;

impl Encode for ResetConnection {
    fn encode(&self, buf: &mut Vec<u8>, _: &EncodeContext) {
        // COM_RESET_CONNECTION : int<1>
        buf.put_u8(0x1f);
    }
}
