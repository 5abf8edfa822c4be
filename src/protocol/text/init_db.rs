use crate::io::BufMut;
use crate::protocol::{Encode, EncodeContext};

// https://dev.mysql.com/doc/internals/en/com-init-db.html
#[derive(Debug)]
pub(crate) struct InitDb<'a> {
    pub(crate) database: &'a str,
}

impl Encode for InitDb<'_> {
    fn encode(&self, buf: &mut Vec<u8>, cx: &EncodeContext) {
        // COM_INIT_DB : int<1>
        buf.put_u8(0x02);

        // database name : string<EOF>
        buf.put_bytes(&cx.charset.encode(self.database));
    }
}
