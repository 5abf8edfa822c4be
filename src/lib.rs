//! Wire-and-session layer for the MySQL/MariaDB **text protocol**.
//!
//! This crate turns any async duplex byte stream into an ordered sequence of
//! typed protocol messages: the server handshake, the authenticated client
//! handshake, command requests (`QUERY`, `PING`, `RESET`, `QUIT`, `INIT_DB`),
//! and server responses (OK, ERR, EOF, LOCAL INFILE, column definitions and
//! text-protocol rows).
//!
//! It deliberately stops there. Opening the TCP socket, performing the TLS
//! handshake, and applying timeouts belong to the host: the connection is
//! generic over `S: AsyncRead + AsyncWrite + Unpin` (the [`futures_io`]
//! traits) and the TLS upgrade is a one-shot callback invoked between the
//! server handshake and the client response.
//!
//! ```rust,no_run
//! # async fn example<S>(stream: S) -> Result<(), mason_mysql::Error>
//! # where S: futures_io::AsyncRead + futures_io::AsyncWrite + Unpin + 'static {
//! use mason_mysql::{MySqlConnection, MySqlConnectOptions, QueryResponse};
//!
//! let options = MySqlConnectOptions::new()
//!     .username("root")
//!     .password("password")
//!     .database("shop")
//!     .compression(true);
//!
//! let mut conn = MySqlConnection::establish(stream, options).await?;
//!
//! conn.ping().await?;
//!
//! if let QueryResponse::Results(rs) = conn.query("SELECT 1").await? {
//!     let value = rs.rows[0].get_by_name("1").and_then(|v| v.as_text());
//!     assert_eq!(value, Some("1"));
//! }
//!
//! conn.close().await?;
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

#[macro_use]
mod error;

mod io;

pub mod collation;

mod options;
mod protocol;
mod result_set;
mod row;
mod wire;

mod connection;

pub use connection::{MySqlConnection, QueryResponse, TlsUpgrade};
pub use error::{Error, MySqlDatabaseError, Result};
pub use options::MySqlConnectOptions;
pub use protocol::response::{EofPacket, ErrPacket, LocalInfilePacket, OkPacket};
pub use protocol::text::{ColumnDefinition, FieldFlags, TypeId};
pub use protocol::{Capabilities, Status};
pub use result_set::MySqlResultSet;
pub use row::{MySqlRow, MySqlValue};
