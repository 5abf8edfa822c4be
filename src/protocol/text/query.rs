use crate::io::BufMut;
use crate::protocol::{Encode, EncodeContext};

// https://dev.mysql.com/doc/dev/mysql-server/8.0.12/page_protocol_com_query.html
#[derive(Debug)]
pub(crate) struct Query<'a> {
    pub(crate) statement: &'a str,
}

impl Encode for Query<'_> {
    fn encode(&self, buf: &mut Vec<u8>, cx: &EncodeContext) {
        // COM_QUERY : int<1>
        buf.put_u8(0x03);

        // statement, in the session charset : string<EOF>
        buf.put_bytes(&cx.charset.encode(self.statement));
    }
}

#[cfg(test)]
mod tests {
    use super::Query;
    use crate::collation::ClientCharset;
    use crate::protocol::{Capabilities, Encode, EncodeContext};

    #[test]
    fn it_encodes_the_statement_to_eof() {
        let cx = EncodeContext {
            capabilities: Capabilities::PROTOCOL_41,
            charset: ClientCharset::default(),
        };

        let mut buf = Vec::new();
        Query {
            statement: "SELECT 1",
        }
        .encode(&mut buf, &cx);

        assert_eq!(buf, b"\x03SELECT 1");
    }
}
