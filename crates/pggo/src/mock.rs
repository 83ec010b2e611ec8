//! In-memory `Db` and rows for unit tests.

use crate::builder::Param;
use crate::db::Db;
use crate::entity::{
    Entity, EntityList, Pointers, ResultRow, Scan, Values, scan_first, scan_rows,
};
use crate::error::OrmResult;
use bytes::BytesMut;
use std::sync::Mutex;
use tokio_postgres::types::{IsNull, ToSql, Type};

/// A result row holding encoded values.
#[derive(Clone, Debug, Default)]
pub struct MockRow {
    columns: Vec<(String, Type, Option<Vec<u8>>)>,
}

impl MockRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, encoding `value` as `ty`.
    pub fn col<T: ToSql>(mut self, name: &str, ty: Type, value: T) -> Self {
        let mut buf = BytesMut::new();
        let raw = match value.to_sql(&ty, &mut buf).unwrap() {
            IsNull::Yes => None,
            IsNull::No => Some(buf.to_vec()),
        };
        self.columns.push((name.to_string(), ty, raw));
        self
    }
}

impl ResultRow for MockRow {
    fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _, _)| name.as_str()).collect()
    }

    fn raw_value(&self, idx: usize) -> OrmResult<(&Type, Option<&[u8]>)> {
        let (_, ty, raw) = &self.columns[idx];
        Ok((ty, raw.as_deref()))
    }
}

/// A statement as seen by [`MockDb`].
#[derive(Clone, Debug)]
pub struct Executed {
    pub sql: String,
    pub args: String,
}

/// A `Db` that records statements and answers with canned rows.
#[derive(Debug, Default)]
pub struct MockDb {
    rows: Vec<MockRow>,
    affected: u64,
    executed: Mutex<Vec<Executed>>,
}

impl MockDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<MockRow>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn with_affected(affected: u64) -> Self {
        Self {
            affected,
            ..Self::default()
        }
    }

    pub fn executed(&self) -> Vec<Executed> {
        self.executed.lock().unwrap().clone()
    }

    fn record(&self, sql: &str, args: &[Param]) {
        self.executed.lock().unwrap().push(Executed {
            sql: sql.to_string(),
            args: format!("{args:?}"),
        });
    }
}

impl Db for MockDb {
    async fn query<L: EntityList>(
        &self,
        sql: &str,
        args: &[Param],
        records: &mut L,
    ) -> OrmResult<()> {
        self.record(sql, args);
        scan_rows(&self.rows, records)
    }

    async fn query_row<E: Entity + ?Sized>(
        &self,
        sql: &str,
        args: &[Param],
        record: &mut E,
    ) -> OrmResult<()> {
        self.record(sql, args);
        scan_first(&self.rows, record)
    }

    async fn exec(&self, sql: &str, args: &[Param]) -> OrmResult<u64> {
        self.record(sql, args);
        Ok(self.affected)
    }
}

/// Hand-written record used across unit tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Person {
    pub id: i32,
    pub name: String,
    pub nickname: Option<String>,
}

impl Person {
    pub fn new(id: i32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            nickname: None,
        }
    }
}

impl Entity for Person {
    fn get_pointers<'a>(&'a mut self, columns: &[&str]) -> OrmResult<Vec<&'a mut dyn Scan>> {
        Pointers::new()
            .field("id", &mut self.id)
            .field("name", &mut self.name)
            .field("nickname", &mut self.nickname)
            .select(columns)
    }

    fn get_values(&self, columns: &[&str]) -> OrmResult<Vec<Param>> {
        Values::new()
            .field("id", self.id)
            .field("name", self.name.clone())
            .field("nickname", self.nickname.clone())
            .select(columns)
    }
}

/// `id`/`name` row for [`Person`].
pub fn person_row(id: i32, name: &str) -> MockRow {
    MockRow::new()
        .col("id", Type::INT4, id)
        .col("name", Type::TEXT, name)
}
