//! tokio-postgres adapter.
//!
//! [`Conn`] unifies the connection types that can run a statement (clients, transactions,
//! pooled objects). [`PgDb`] wraps one of them and implements [`Db`] on top of it.
//!
//! ```ignore
//! let (client, connection) = tokio_postgres::connect(&url, tokio_postgres::NoTls).await?;
//! tokio::spawn(async move { connection.await });
//!
//! let db = pggo::pg::with(&client);
//! let mut person = Person::default();
//! db.select(["id", "name"])
//!     .from_table("person")
//!     .where_([pggo::equal("id", 1_i32)])
//!     .query_row(&mut person)
//!     .await?;
//! ```

use crate::builder::{Factory, Param, param};
use crate::db::Db;
use crate::entity::{Entity, EntityList, ResultRow, scan_first, scan_rows};
use crate::error::{OrmError, OrmResult};
use std::future::Future;
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, ToSql, Type};
use tracing::{debug, trace};

/// Maximum number of SQL bytes carried by a log event.
const LOG_SQL_MAX_BYTES: usize = 200;

/// A connection that can run a statement with positional arguments.
///
/// This allows the same [`PgDb`] to wrap a direct client, a transaction or a pooled
/// connection.
pub trait Conn: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = OrmResult<Vec<Row>>> + Send;

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = OrmResult<u64>> + Send;
}

impl Conn for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Vec<Row>> {
        tokio_postgres::Client::query(self, sql, params)
            .await
            .map_err(OrmError::from)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<u64> {
        tokio_postgres::Client::execute(self, sql, params)
            .await
            .map_err(OrmError::from)
    }
}

impl Conn for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Vec<Row>> {
        tokio_postgres::Transaction::query(self, sql, params)
            .await
            .map_err(OrmError::from)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<u64> {
        tokio_postgres::Transaction::execute(self, sql, params)
            .await
            .map_err(OrmError::from)
    }
}

#[cfg(feature = "pool")]
impl Conn for deadpool_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Vec<Row>> {
        // Delegate to the deref target (ClientWrapper / tokio_postgres::Client).
        Conn::query(&***self, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<u64> {
        Conn::execute(&***self, sql, params).await
    }
}

#[cfg(feature = "pool")]
impl Conn for deadpool_postgres::Pool {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<Vec<Row>> {
        let client = self.get().await?;
        Conn::query(&client, sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> OrmResult<u64> {
        let client = self.get().await?;
        Conn::execute(&client, sql, params).await
    }
}

impl<C: Conn> Conn for &C {
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = OrmResult<Vec<Row>>> + Send {
        (**self).query(sql, params)
    }

    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl Future<Output = OrmResult<u64>> + Send {
        (**self).execute(sql, params)
    }
}

/// Raw column value, borrowed from a row.
struct RawValue<'a>(Option<&'a [u8]>);

impl<'a> FromSql<'a> for RawValue<'a> {
    fn from_sql(
        _ty: &Type,
        raw: &'a [u8],
    ) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        Ok(RawValue(Some(raw)))
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        Ok(RawValue(None))
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

impl ResultRow for Row {
    fn column_names(&self) -> Vec<&str> {
        self.columns().iter().map(|c| c.name()).collect()
    }

    fn raw_value(&self, idx: usize) -> OrmResult<(&Type, Option<&[u8]>)> {
        let column = self
            .columns()
            .get(idx)
            .ok_or_else(|| OrmError::Other(format!("sqlb: column index {idx} out of range")))?;
        let RawValue(raw): RawValue<'_> = self.try_get(idx)?;
        Ok((column.type_(), raw))
    }
}

/// [`Db`] over a tokio-postgres connection.
#[derive(Clone, Debug)]
pub struct PgDb<C> {
    conn: C,
}

impl<C: Conn> PgDb<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    pub fn conn(&self) -> &C {
        &self.conn
    }

    pub fn into_inner(self) -> C {
        self.conn
    }
}

impl<C: Conn> Db for PgDb<C> {
    async fn query<L: EntityList>(
        &self,
        sql: &str,
        args: &[Param],
        records: &mut L,
    ) -> OrmResult<()> {
        log_statement(sql, args);
        let params = param::as_refs(args);
        let rows = self.conn.query(sql, &params).await?;
        trace!(target: "pggo.sql", rows = rows.len(), "rows returned");
        scan_rows(&rows, records)
    }

    async fn query_row<E: Entity + ?Sized>(
        &self,
        sql: &str,
        args: &[Param],
        record: &mut E,
    ) -> OrmResult<()> {
        log_statement(sql, args);
        let params = param::as_refs(args);
        let rows = self.conn.query(sql, &params).await?;
        trace!(target: "pggo.sql", rows = rows.len(), "rows returned");
        scan_first(&rows, record)
    }

    async fn exec(&self, sql: &str, args: &[Param]) -> OrmResult<u64> {
        log_statement(sql, args);
        let params = param::as_refs(args);
        let affected = self.conn.execute(sql, &params).await?;
        trace!(target: "pggo.sql", affected, "statement executed");
        Ok(affected)
    }
}

/// Bind builders to `conn`.
pub fn with<C: Conn>(conn: C) -> Factory<PgDb<C>> {
    Factory::new(PgDb::new(conn))
}

fn log_statement(sql: &str, args: &[Param]) {
    debug!(
        target: "pggo.sql",
        param_count = args.len(),
        sql = %truncate_sql_bytes(sql, LOG_SQL_MAX_BYTES),
    );
}

fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
