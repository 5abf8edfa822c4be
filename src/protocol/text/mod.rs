mod column_def;
mod field;
mod init_db;
mod ping;
mod query;
mod quit;
mod reset_connection;
mod row;
mod r#type;

pub use column_def::ColumnDefinition;
pub use field::FieldFlags;
pub use r#type::TypeId;

pub(crate) use init_db::InitDb;
pub(crate) use ping::Ping;
pub(crate) use query::Query;
pub(crate) use quit::Quit;
pub(crate) use reset_connection::ResetConnection;
pub(crate) use row::TextRow;
