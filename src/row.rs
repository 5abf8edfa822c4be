use std::collections::HashMap;
use std::ops::Index;
use std::sync::Arc;

/// A single decoded row value.
///
/// Values whose column collation maps to a host codec arrive as [`Text`];
/// `binary` columns and unknown collations stay [`Bytes`].
///
/// [`Text`]: MySqlValue::Text
/// [`Bytes`]: MySqlValue::Bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MySqlValue {
    Text(String),
    Bytes(Vec<u8>),
}

impl MySqlValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MySqlValue::Text(text) => Some(text),
            MySqlValue::Bytes(_) => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            MySqlValue::Text(text) => text.as_bytes(),
            MySqlValue::Bytes(bytes) => bytes,
        }
    }
}

/// One row of a text-protocol result set.
///
/// Values are positional; name-keyed access goes through a map shared by
/// every row of the set. A `None` value is SQL `NULL`.
#[derive(Debug, Clone)]
pub struct MySqlRow {
    pub(crate) values: Vec<Option<MySqlValue>>,
    pub(crate) column_names: Arc<HashMap<Box<str>, usize>>,
}

impl MySqlRow {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value at `index`; `None` for SQL `NULL` or an out-of-range index.
    pub fn get(&self, index: usize) -> Option<&MySqlValue> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// The value of the column named `name` (the first column of that name,
    /// when duplicated); `None` for SQL `NULL` or an unknown name.
    pub fn get_by_name(&self, name: &str) -> Option<&MySqlValue> {
        self.get(*self.column_names.get(name)?)
    }
}

impl Index<usize> for MySqlRow {
    type Output = Option<MySqlValue>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

impl Index<&str> for MySqlRow {
    type Output = Option<MySqlValue>;

    fn index(&self, name: &str) -> &Self::Output {
        match self.column_names.get(name) {
            Some(&index) => &self.values[index],
            None => panic!("no column named {:?} in this result set", name),
        }
    }
}
