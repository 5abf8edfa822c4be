use crate::io::Buf;
use crate::Result;

// https://dev.mysql.com/doc/dev/mysql-server/8.0.12/page_protocol_com_query_response_local_infile_request.html
//
// The server asks the client to upload a local file; actually sending the
// file content is delegated to the caller.
#[derive(Debug)]
pub struct LocalInfilePacket {
    pub filename: Box<str>,
}

impl LocalInfilePacket {
    pub(crate) fn read(mut buf: &[u8]) -> Result<Self> {
        let header = buf.get_u8()?;
        if header != 0xfb {
            return Err(err_framing!(
                "expected LOCAL INFILE (0xFB); received 0x{:02X}",
                header
            ));
        }

        Ok(Self {
            filename: buf.get_str_eof()?.into(),
        })
    }
}
