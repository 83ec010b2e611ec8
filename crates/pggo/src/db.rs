//! Execution abstraction the builders delegate to.

use crate::builder::Param;
use crate::entity::{Entity, EntityList};
use crate::error::{OrmError, OrmResult};
use std::future::Future;
use tracing::warn;

/// Executes compiled statements and binds their results.
///
/// Builders never talk to a connection directly; they hand SQL text and ordered arguments to
/// a `Db`. See [`crate::pg::PgDb`] for the tokio-postgres implementation.
pub trait Db: Send + Sync {
    /// Run a query and bind every returned row into a fresh record of `records`.
    fn query<L: EntityList>(
        &self,
        sql: &str,
        args: &[Param],
        records: &mut L,
    ) -> impl Future<Output = OrmResult<()>> + Send;

    /// Run a query and bind its first row into `record`.
    ///
    /// Semantics:
    /// - 0 rows: returns [`OrmError::NotFound`]
    /// - 1 or more rows: binds the first row, the rest are ignored
    fn query_row<E: Entity + ?Sized>(
        &self,
        sql: &str,
        args: &[Param],
        record: &mut E,
    ) -> impl Future<Output = OrmResult<()>> + Send;

    /// Run a statement and return the number of affected rows.
    fn exec(&self, sql: &str, args: &[Param]) -> impl Future<Output = OrmResult<u64>> + Send;
}

impl<D: Db> Db for &D {
    fn query<L: EntityList>(
        &self,
        sql: &str,
        args: &[Param],
        records: &mut L,
    ) -> impl Future<Output = OrmResult<()>> + Send {
        (**self).query(sql, args, records)
    }

    fn query_row<E: Entity + ?Sized>(
        &self,
        sql: &str,
        args: &[Param],
        record: &mut E,
    ) -> impl Future<Output = OrmResult<()>> + Send {
        (**self).query_row(sql, args, record)
    }

    fn exec(&self, sql: &str, args: &[Param]) -> impl Future<Output = OrmResult<u64>> + Send {
        (**self).exec(sql, args)
    }
}

/// A `Db` that refuses to execute anything.
///
/// Builders created without a database use this; compiling them works, executing them fails
/// with [`OrmError::NoDb`] without doing any I/O.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoopDb;

impl Db for NoopDb {
    async fn query<L: EntityList>(
        &self,
        sql: &str,
        _args: &[Param],
        _records: &mut L,
    ) -> OrmResult<()> {
        warn!(target: "pggo", sql, "query without a database");
        Err(OrmError::NoDb)
    }

    async fn query_row<E: Entity + ?Sized>(
        &self,
        sql: &str,
        _args: &[Param],
        _record: &mut E,
    ) -> OrmResult<()> {
        warn!(target: "pggo", sql, "query_row without a database");
        Err(OrmError::NoDb)
    }

    async fn exec(&self, sql: &str, _args: &[Param]) -> OrmResult<u64> {
        warn!(target: "pggo", sql, "exec without a database");
        Err(OrmError::NoDb)
    }
}
