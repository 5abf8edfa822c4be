mod eof;
mod err;
mod infile;
mod ok;

pub use eof::EofPacket;
pub use err::ErrPacket;
pub use infile::LocalInfilePacket;
pub use ok::OkPacket;

use crate::protocol::Capabilities;
use crate::Result;

/// A classified server reply.
///
/// Commands declare the subset they accept; anything else surfaces as
/// [`Error::UnexpectedPacket`](crate::Error::UnexpectedPacket).
#[derive(Debug)]
pub(crate) enum Response {
    Ok(OkPacket),
    Err(ErrPacket),
    Eof(EofPacket),
    LocalInfile(LocalInfilePacket),

    /// Anything that is not a control packet: a column-count header, a
    /// column definition, or a row.
    Data(Vec<u8>),
}

impl Response {
    /// The header byte this reply arrived with, for error reporting.
    pub(crate) fn header(&self) -> u8 {
        match self {
            Response::Ok(ok) => ok.header,
            Response::Err(_) => 0xff,
            Response::Eof(eof) => eof.header,
            Response::LocalInfile(_) => 0xfb,
            Response::Data(body) => body.first().copied().unwrap_or(0),
        }
    }

    /// Identify a reply by its header byte and length, then parse it under
    /// the negotiated capabilities.
    ///
    /// `0xFB` only identifies a LOCAL INFILE request where one is possible,
    /// i.e. as the first reply to `COM_QUERY`; a length-encoded row value
    /// shares the header byte.
    pub(crate) fn classify(
        body: Vec<u8>,
        capabilities: Capabilities,
        accept_infile: bool,
    ) -> Result<Self> {
        Ok(match body.first() {
            Some(0xfe) if body.len() < 9 => {
                if capabilities.contains(Capabilities::DEPRECATE_EOF) {
                    Response::Ok(OkPacket::read(&body, capabilities)?)
                } else {
                    Response::Eof(EofPacket::read(&body, capabilities)?)
                }
            }

            Some(0x00) => Response::Ok(OkPacket::read(&body, capabilities)?),

            Some(0xff) => Response::Err(ErrPacket::read(&body, capabilities)?),

            Some(0xfb) if accept_infile => {
                Response::LocalInfile(LocalInfilePacket::read(&body)?)
            }

            _ => Response::Data(body),
        })
    }
}
