use std::collections::HashMap;
use std::sync::Arc;

use crate::protocol::text::ColumnDefinition;
use crate::row::MySqlRow;

/// A fully-streamed text-protocol result set.
#[derive(Debug)]
pub struct MySqlResultSet {
    pub columns: Vec<ColumnDefinition>,
    pub rows: Vec<MySqlRow>,

    column_names: Arc<HashMap<Box<str>, usize>>,
}

impl MySqlResultSet {
    pub(crate) fn new(columns: Vec<ColumnDefinition>, rows: Vec<MySqlRow>) -> Self {
        let column_names = match rows.first() {
            Some(row) => Arc::clone(&row.column_names),
            None => Arc::new(name_index(&columns)),
        };

        Self {
            columns,
            rows,
            column_names,
        }
    }

    /// The position of the first column whose projected name is `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.get(name).copied()
    }
}

/// Maps each projected column name to its position; a duplicated name keeps
/// the first occurrence.
pub(crate) fn name_index(columns: &[ColumnDefinition]) -> HashMap<Box<str>, usize> {
    let mut names = HashMap::with_capacity(columns.len());

    for (index, column) in columns.iter().enumerate() {
        names.entry(column.name_virtual.clone()).or_insert(index);
    }

    names
}
