//! Database schema description consumed by the generator.

use std::collections::BTreeMap;
use std::future::Future;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub nullable: bool,
    /// PostgreSQL type name; arrays are spelled `elem[]`.
    pub data_type: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            nullable,
            data_type: data_type.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    /// Columns in ordinal order.
    pub columns: Vec<ColumnInfo>,
}

/// Tables keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub tables: BTreeMap<String, TableInfo>,
}

impl Schema {
    pub fn find_table(&self, name: &str) -> Option<&TableInfo> {
        self.tables.get(name)
    }

    pub fn insert(&mut self, table: TableInfo) {
        self.tables.insert(table.name.clone(), table);
    }
}

/// Source of a [`Schema`].
pub trait SchemaLoader {
    fn load(&self) -> impl Future<Output = anyhow::Result<Schema>> + Send;
}
