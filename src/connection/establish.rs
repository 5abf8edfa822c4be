use std::io;

use futures_core::future::BoxFuture;
use futures_io::{AsyncRead, AsyncWrite};

use crate::collation::ClientCharset;
use crate::options::MySqlConnectOptions;
use crate::protocol::connect::{native_password, Handshake, HandshakeResponse, SslRequest};
use crate::protocol::response::Response;
use crate::protocol::{Capabilities, Encode, EncodeContext};
use crate::wire::{CompressedFramer, HandshakeFramer, PlainFramer, WireFormat};
use crate::{Error, MySqlConnection, Result};

/// A one-shot TLS upgrade supplied by the host: takes the raw stream after
/// the `SSLRequest` packet has been written and returns the encrypted
/// replacement.
pub type TlsUpgrade<S> = Box<dyn FnOnce(S) -> BoxFuture<'static, io::Result<S>> + Send>;

impl<S> MySqlConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + 'static,
{
    /// Performs the connection handshake over an open stream and returns an
    /// authenticated session.
    pub async fn establish(stream: S, options: MySqlConnectOptions) -> Result<Self> {
        establish(stream, options, None).await
    }

    /// Like [`establish`](Self::establish), upgrading the stream to TLS
    /// between the server handshake and the client response.
    ///
    /// Fails with [`Error::Unsupported`] if the server does not offer `SSL`.
    pub async fn establish_with_tls(
        stream: S,
        options: MySqlConnectOptions,
        upgrade: TlsUpgrade<S>,
    ) -> Result<Self> {
        establish(stream, options, Some(upgrade)).await
    }
}

async fn establish<S>(
    stream: S,
    options: MySqlConnectOptions,
    upgrade: Option<TlsUpgrade<S>>,
) -> Result<MySqlConnection<S>>
where
    S: AsyncRead + AsyncWrite + Unpin + 'static,
{
    let charset = ClientCharset::resolve(&options.charset)?;

    // The server opens the conversation, with a sequence of its choosing.
    let mut framer = HandshakeFramer::new(stream);

    let payload = framer.recv().await?;
    let handshake = Handshake::read(&payload)?;

    tracing::debug!(
        server_version = &*handshake.server_version,
        thread_id = handshake.thread_id,
        "received server handshake"
    );

    match handshake.auth_plugin_name.as_deref() {
        // no name means pre-plugin native password
        None | Some("mysql_native_password") => {}

        Some(plugin) => {
            return Err(err_unsupported!(
                "authentication plugin {:?} is not supported",
                plugin
            ));
        }
    }

    let mut desired = Capabilities::PROTOCOL_41
        | Capabilities::SECURE_CONNECTION
        | Capabilities::TRANSACTIONS
        | Capabilities::PLUGIN_AUTH
        | Capabilities::PLUGIN_AUTH_LENENC_DATA
        | Capabilities::DEPRECATE_EOF;

    if options.compression {
        desired |= Capabilities::COMPRESS;
    }

    if options.database.is_some() {
        if !handshake
            .server_capabilities
            .contains(Capabilities::CONNECT_WITH_DB)
        {
            return Err(err_unsupported!(
                "server does not support selecting a database at connect"
            ));
        }

        desired |= Capabilities::CONNECT_WITH_DB;
    }

    if upgrade.is_some() {
        if !handshake.server_capabilities.contains(Capabilities::SSL) {
            return Err(err_unsupported!("server does not support TLS"));
        }

        desired |= Capabilities::SSL;
    }

    // The active dialect; frozen for the life of the session.
    let capabilities = desired & handshake.server_capabilities;

    let cx = EncodeContext {
        capabilities,
        charset,
    };

    // Upgrade the channel before any credentials cross it. Traffic stays on
    // the handshake framer's sequence either way.
    if let Some(upgrade) = upgrade {
        let mut buf = Vec::with_capacity(32);
        SslRequest {
            max_packet_size: options.max_packet_size,
        }
        .encode(&mut buf, &cx);

        framer.send(&buf).await?;

        let (stream, seq) = framer.into_parts();
        framer = HandshakeFramer::from_parts(upgrade(stream).await?, seq);

        tracing::debug!("upgraded stream to TLS");
    }

    let auth_response = native_password(&options.password, handshake.challenge());

    let mut buf = Vec::new();
    HandshakeResponse {
        max_packet_size: options.max_packet_size,
        username: &options.username,
        auth_response: &auth_response,
        database: options.database.as_deref(),
        auth_plugin_name: Some("mysql_native_password"),
        connect_attrs: None,
        zstd_compression_level: None,
    }
    .encode(&mut buf, &cx);

    framer.send(&buf).await?;

    // The ACK still arrives on the plain handshake framer, even when
    // compression was negotiated.
    let payload = framer.recv().await?;
    match Response::classify(payload, capabilities, false)? {
        Response::Ok(_) | Response::Eof(_) => {}
        Response::Err(err) => return Err(err.into()),
        response => return Err(Error::UnexpectedPacket(response.header())),
    }

    // Authenticated: pick the wire layer, exactly once.
    let compressed = capabilities.contains(Capabilities::COMPRESS);
    let stream = framer.into_stream();

    let wire = if compressed {
        WireFormat::Compressed(CompressedFramer::new(
            stream,
            options.compression_threshold,
            options.compression_level,
        ))
    } else {
        WireFormat::Plain(PlainFramer::new(stream))
    };

    tracing::debug!(
        ?capabilities,
        compressed,
        charset = charset.name(),
        "session established"
    );

    Ok(MySqlConnection {
        wire,
        capabilities,
        charset,
    })
}

#[cfg(test)]
mod tests {
    use crate::connection::fixtures::*;
    use crate::io::mock::MockStream;
    use crate::protocol::Capabilities;
    use crate::{Error, MySqlConnectOptions, MySqlConnection};

    fn options() -> MySqlConnectOptions {
        MySqlConnectOptions::new().username("root").password("secret")
    }

    #[tokio::test]
    async fn it_establishes_and_freezes_the_intersection() {
        let stream = MockStream::new()
            .script(&frame(0, &handshake_body(server_capabilities())))
            .script(&frame(2, OK_BODY));

        let conn = MySqlConnection::establish(stream, options()).await.unwrap();

        let caps = conn.capabilities();
        assert!(caps.contains(Capabilities::PROTOCOL_41 | Capabilities::DEPRECATE_EOF));

        // offered but not requested, and requested-only flags are both gone
        assert!(!caps.contains(Capabilities::SSL));
        assert!(!caps.contains(Capabilities::COMPRESS));
        assert!(!caps.contains(Capabilities::CONNECT_WITH_DB));
    }

    #[tokio::test]
    async fn it_sends_the_reference_scramble() {
        let stream = MockStream::new()
            .script(&frame(0, &handshake_body(server_capabilities())))
            .script(&frame(2, OK_BODY));

        let conn = MySqlConnection::establish(stream, options()).await.unwrap();

        let written = match conn.wire {
            crate::wire::WireFormat::Plain(framer) => framer.into_stream().take_written(),
            _ => unreachable!("compression was not requested"),
        };

        // packet 1 is the handshake response; its auth blob is the 20-byte
        // scramble behind a one-byte lenenc length
        assert_eq!(written[3], 1, "client continues the server's sequence");

        let needle: Vec<u8> = {
            let mut v = b"root\0\x14".to_vec();
            v.extend_from_slice(&SECRET_SCRAMBLE);
            v
        };

        assert!(
            written.windows(needle.len()).any(|w| w == needle),
            "scramble not found in handshake response"
        );
    }

    #[tokio::test]
    async fn it_fails_when_the_database_capability_is_missing() {
        let offered = server_capabilities() - Capabilities::CONNECT_WITH_DB;
        let stream = MockStream::new().script(&frame(0, &handshake_body(offered)));

        let result =
            MySqlConnection::establish(stream, options().database("missing")).await;

        assert!(matches!(result, Err(Error::Unsupported(_))));
    }

    #[tokio::test]
    async fn it_fails_when_tls_is_not_offered() {
        let offered = server_capabilities() - Capabilities::SSL;
        let stream = MockStream::new().script(&frame(0, &handshake_body(offered)));

        let result = MySqlConnection::establish_with_tls(
            stream,
            options(),
            Box::new(|s| Box::pin(async move { Ok(s) })),
        )
        .await;

        assert!(matches!(result, Err(Error::Unsupported(_))));
    }

    #[tokio::test]
    async fn it_writes_the_ssl_request_before_the_response() {
        let stream = MockStream::new()
            .script(&frame(0, &handshake_body(server_capabilities())))
            .script(&frame(3, OK_BODY));

        let conn = MySqlConnection::establish_with_tls(
            stream,
            options(),
            Box::new(|s| Box::pin(async move { Ok(s) })),
        )
        .await
        .unwrap();

        assert!(conn.capabilities().contains(Capabilities::SSL));

        let written = match conn.wire {
            crate::wire::WireFormat::Plain(framer) => framer.into_stream().take_written(),
            _ => unreachable!(),
        };

        // SSLRequest: 32-byte body at sequence 1, then the full response at 2
        assert_eq!(written[..3], [32, 0, 0]);
        assert_eq!(written[3], 1);
        assert_eq!(written[36 + 3], 2);
    }

    #[tokio::test]
    async fn it_surfaces_an_err_ack_as_a_server_error() {
        let err_body = b"\xff\x15\x04#28000Access denied for user";

        let stream = MockStream::new()
            .script(&frame(0, &handshake_body(server_capabilities())))
            .script(&frame(2, err_body));

        match MySqlConnection::establish(stream, options()).await {
            Err(Error::Server(err)) => {
                assert_eq!(err.code(), 1045);
                assert_eq!(err.sql_state(), Some("28000"));
            }

            other => panic!("expected a server error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn it_rejects_unsupported_auth_plugins() {
        let mut body = handshake_body(server_capabilities());
        let idx = body.len() - b"mysql_native_password\0".len();
        body.truncate(idx);
        body.extend_from_slice(b"caching_sha2_password\0");

        let stream = MockStream::new().script(&frame(0, &body));

        assert!(matches!(
            MySqlConnection::establish(stream, options()).await,
            Err(Error::Unsupported(_))
        ));
    }
}
