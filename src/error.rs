//! Error and Result types.

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::io;

use crate::protocol::response::ErrPacket;

/// A specialized `Result` type for this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All the ways a protocol operation can fail.
///
/// Every variant except [`Error::Server`] is fatal to the session: the byte
/// stream may be left mid-message and no resynchronization is attempted.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Error communicating with the server: channel closed, EOF mid-frame,
    /// write failure, or a timeout surfaced by the host's stream.
    #[error("error communicating with the server: {0}")]
    Io(#[from] io::Error),

    /// A fragment arrived out of sequence, in either the plain-packet or the
    /// compressed-envelope sequence domain.
    #[error("packet out of order: expected sequence {expected}, received {received}")]
    Sequence { expected: u8, received: u8 },

    /// Malformed data on the wire: a compressed length mismatch, an unknown
    /// length-encoding tag, an unterminated string, or a truncated packet.
    #[error("malformed packet: {0}")]
    Framing(Box<str>),

    /// The server opened with a protocol version other than 10.
    #[error("unsupported protocol version {0}; expected 10")]
    ProtocolVersion(u8),

    /// A requested capability or charset is not offered by the server (or
    /// known to the registry).
    #[error("{0}")]
    Unsupported(Box<str>),

    /// An `ERR` packet returned by the server.
    ///
    /// The session remains usable: the query engine drains the message
    /// stream of the failed command before surfacing this.
    #[error("error returned from the server: {0}")]
    Server(#[source] MySqlDatabaseError),

    /// A reply arrived whose classification did not match the reply set the
    /// current command accepts. Carries the header byte of the offender.
    #[error("unexpected packet with header 0x{0:02X}")]
    UnexpectedPacket(u8),
}

impl From<ErrPacket> for Error {
    fn from(err: ErrPacket) -> Self {
        Error::Server(MySqlDatabaseError(err))
    }
}

/// A typed error produced by the server, carrying the fields of the
/// underlying `ERR` packet.
pub struct MySqlDatabaseError(pub(crate) ErrPacket);

impl MySqlDatabaseError {
    /// The server error code, e.g. `1096` (`ER_NO_TABLES_USED`).
    pub fn code(&self) -> u16 {
        self.0.code
    }

    /// The five-character SQLSTATE, when the server sent one.
    pub fn sql_state(&self) -> Option<&str> {
        self.0.sql_state.as_deref()
    }

    /// The human-readable message text.
    pub fn message(&self) -> &str {
        &self.0.message
    }
}

impl Display for MySqlDatabaseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.sql_state() {
            Some(state) => write!(f, "{} ({}): {}", self.code(), state, self.message()),
            None => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}

impl fmt::Debug for MySqlDatabaseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlDatabaseError")
            .field("code", &self.code())
            .field("sql_state", &self.sql_state())
            .field("message", &self.message())
            .finish()
    }
}

impl StdError for MySqlDatabaseError {}

macro_rules! err_framing {
    ($($args:tt)*) => {
        $crate::Error::Framing(format!($($args)*).into())
    };
}

macro_rules! err_unsupported {
    ($($args:tt)*) => {
        $crate::Error::Unsupported(format!($($args)*).into())
    };
}
