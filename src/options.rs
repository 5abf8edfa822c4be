/// Options for establishing a MySQL session over an already-open stream.
///
/// ```rust
/// use mason_mysql::MySqlConnectOptions;
///
/// let options = MySqlConnectOptions::new()
///     .username("app")
///     .password("secret")
///     .database("shop")
///     .compression(true)
///     .compression_level(3);
/// ```
#[derive(Debug, Clone)]
pub struct MySqlConnectOptions {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) database: Option<String>,
    pub(crate) charset: String,
    pub(crate) compression: bool,
    pub(crate) compression_threshold: usize,
    pub(crate) compression_level: u32,
    pub(crate) max_packet_size: u32,
}

impl Default for MySqlConnectOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl MySqlConnectOptions {
    pub fn new() -> Self {
        Self {
            username: String::from("root"),
            password: String::new(),
            database: None,
            charset: String::from("utf8mb4"),
            compression: false,
            compression_threshold: 50,
            compression_level: 1,
            max_packet_size: 0xff_ff_ff,
        }
    }

    /// Sets the username to authenticate as.
    pub fn username(mut self, username: &str) -> Self {
        self.username = username.to_owned();
        self
    }

    /// Sets the password; the wire only ever carries its
    /// `mysql_native_password` scramble.
    pub fn password(mut self, password: &str) -> Self {
        self.password = password.to_owned();
        self
    }

    /// Selects a database as part of the handshake (`CONNECT_WITH_DB`).
    ///
    /// Fails the handshake if the server does not offer the capability.
    pub fn database(mut self, database: &str) -> Self {
        self.database = Some(database.to_owned());
        self
    }

    /// The charset statements are encoded with. Defaults to `utf8mb4`.
    pub fn charset(mut self, charset: &str) -> Self {
        self.charset = charset.to_owned();
        self
    }

    /// Requests wire compression (`COMPRESS`); silently stays on the plain
    /// wire when the server does not offer it.
    pub fn compression(mut self, compression: bool) -> Self {
        self.compression = compression;
        self
    }

    /// Packets at most this large travel uncompressed inside the compressed
    /// envelope. Defaults to 50 bytes.
    pub fn compression_threshold(mut self, threshold: usize) -> Self {
        self.compression_threshold = threshold;
        self
    }

    /// zlib compression level, `1..=9`. Defaults to 1.
    pub fn compression_level(mut self, level: u32) -> Self {
        self.compression_level = level.clamp(1, 9);
        self
    }

    /// The maximum packet size announced to the server.
    pub fn max_packet_size(mut self, size: u32) -> Self {
        self.max_packet_size = size;
        self
    }
}
