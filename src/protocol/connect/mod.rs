mod auth;
mod handshake;
mod handshake_response;
mod ssl_request;

pub(crate) use auth::native_password;
pub(crate) use handshake::Handshake;
pub(crate) use handshake_response::HandshakeResponse;
pub(crate) use ssl_request::SslRequest;
