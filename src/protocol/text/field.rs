// https://dev.mysql.com/doc/dev/mysql-server/8.0.12/group__group__cs__column__definition__flags.html
// https://mariadb.com/kb/en/result-set-packets/#field-details-flag
bitflags::bitflags! {
    /// Detail flags on a column definition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldFlags: u16 {
        /// Field cannot be NULL
        const NOT_NULL = 1;

        /// Field is **part of** a primary key
        const PRIMARY_KEY = 1 << 1;

        /// Field is **part of** a unique key
        const UNIQUE_KEY = 1 << 2;

        /// Field is **part of** a non-unique key
        const MULTIPLE_KEY = 1 << 3;

        const BLOB = 1 << 4;

        const UNSIGNED = 1 << 5;

        const ZEROFILL = 1 << 6;

        /// Field is binary (set for strings)
        const BINARY = 1 << 7;

        const ENUM = 1 << 8;

        const AUTO_INCREMENT = 1 << 9;

        const TIMESTAMP = 1 << 10;

        const SET = 1 << 11;

        const NO_DEFAULT_VALUE = 1 << 12;

        const ON_UPDATE_NOW = 1 << 13;

        /// Field is numeric
        const NUM = 1 << 14;

        const PART_KEY = 1 << 15;
    }
}
