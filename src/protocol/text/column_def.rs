use byteorder::LittleEndian;

use crate::io::{Buf, MySqlBufExt};
use crate::protocol::text::{FieldFlags, TypeId};
use crate::Result;

// https://dev.mysql.com/doc/dev/mysql-server/8.0.12/page_protocol_com_query_response_text_resultset_column_definition.html
// https://mariadb.com/kb/en/result-set-packets/#column-definition-packet
//
// The `_virtual` names are what the statement projected (aliases included);
// the `_original` names are the underlying table and column.
#[derive(Debug, Clone)]
pub struct ColumnDefinition {
    /// Always `"def"` on current servers.
    pub catalog: Box<str>,
    pub schema: Box<str>,
    pub table_virtual: Box<str>,
    pub table_original: Box<str>,
    pub name_virtual: Box<str>,
    pub name_original: Box<str>,

    /// Length of the fixed-width tail of this packet; `0x0c` on the wire.
    pub fixed_length_fields_length: u64,

    /// Collation id of the column; drives row-value decoding.
    pub charset: u16,
    pub max_length: u32,
    pub field_type: TypeId,
    pub flags: FieldFlags,
    pub decimals: u8,
}

impl ColumnDefinition {
    pub(crate) fn read(mut buf: &[u8]) -> Result<Self> {
        let catalog = buf.get_str_lenenc::<LittleEndian>()?.into();
        let schema = buf.get_str_lenenc::<LittleEndian>()?.into();
        let table_virtual = buf.get_str_lenenc::<LittleEndian>()?.into();
        let table_original = buf.get_str_lenenc::<LittleEndian>()?.into();
        let name_virtual = buf.get_str_lenenc::<LittleEndian>()?.into();
        let name_original = buf.get_str_lenenc::<LittleEndian>()?.into();

        let fixed_length_fields_length = buf.get_uint_lenenc::<LittleEndian>()?;

        let charset = buf.get_u16::<LittleEndian>()?;
        let max_length = buf.get_u32::<LittleEndian>()?;
        let field_type = TypeId(buf.get_u8()?);
        let flags = FieldFlags::from_bits_truncate(buf.get_u16::<LittleEndian>()?);
        let decimals = buf.get_u8()?;

        // two reserved bytes may follow; ignored

        Ok(Self {
            catalog,
            schema,
            table_virtual,
            table_original,
            name_virtual,
            name_original,
            fixed_length_fields_length,
            charset,
            max_length,
            field_type,
            flags,
            decimals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ColumnDefinition, FieldFlags, TypeId};

    // `SELECT 1` as sent by MySQL 8: an unnamed schema/table, column "1",
    // binary collation, LONGLONG, NOT_NULL | BINARY | NUM
    const COLUMN_DEF_SELECT_1: &[u8] =
        b"\x03def\x00\x00\x00\x011\x00\x0c\x3f\x00\x02\x00\x00\x00\x08\x81\x40\x00\x00\x00";

    #[test]
    fn it_reads_the_select_1_column() {
        let def = ColumnDefinition::read(COLUMN_DEF_SELECT_1).unwrap();

        assert_eq!(&*def.catalog, "def");
        assert_eq!(&*def.schema, "");
        assert_eq!(&*def.name_virtual, "1");
        assert_eq!(&*def.name_original, "");
        assert_eq!(def.fixed_length_fields_length, 0x0c);
        assert_eq!(def.charset, 63);
        assert_eq!(def.max_length, 2);
        assert_eq!(def.field_type, TypeId::LONGLONG);
        assert!(def.flags.contains(FieldFlags::NOT_NULL | FieldFlags::BINARY | FieldFlags::NUM));
        assert_eq!(def.decimals, 0);
    }
}
