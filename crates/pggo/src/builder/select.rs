//! SELECT statement builder.

use super::condition::{Condition, and};
use super::expr::{BaseTable, Build, Table};
use super::param::{Param, ParamList};
use crate::db::Db;
use crate::entity::{Entity, EntityList};
use crate::error::OrmResult;
use std::fmt;
use std::future::Future;

/// Builder for `SELECT <columns> [FROM <table>] [WHERE <predicate>]`.
///
/// Created by [`crate::select`] or [`crate::Factory::select`].
pub struct SelectBuilder<'a, D> {
    db: &'a D,
    columns: Vec<String>,
    from: Option<Box<dyn Table + 'a>>,
    filter: Option<Condition>,
}

impl<'a, D> SelectBuilder<'a, D> {
    pub(crate) fn new<S: AsRef<str>>(db: &'a D, columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            db,
            columns: columns.into_iter().map(|c| c.as_ref().to_string()).collect(),
            from: None,
            filter: None,
        }
    }

    /// Set the FROM target.
    pub fn from(mut self, table: impl Table + 'a) -> Self {
        self.from = Some(Box::new(table));
        self
    }

    /// Set the FROM target to a table referenced by name.
    pub fn from_table(self, name: impl Into<String>) -> Self {
        self.from(BaseTable::new(name))
    }

    /// Set the WHERE predicate to the conjunction of `conditions`.
    ///
    /// Calling it again replaces the previous predicate.
    pub fn where_(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.filter = Some(and(conditions));
        self
    }

    /// Compile to SQL text and ordered arguments.
    pub fn sql(&self) -> OrmResult<(String, Vec<Param>)> {
        let mut sql = String::new();
        let mut args = ParamList::new();
        self.build(&mut sql, &mut args)?;
        Ok((sql, args.into_vec()))
    }
}

impl<D: Db> SelectBuilder<'_, D> {
    /// Execute and bind every row into a fresh record of `records`.
    pub fn query<L: EntityList>(
        &self,
        records: &mut L,
    ) -> impl Future<Output = OrmResult<()>> + Send {
        let compiled = self.sql();
        let db = self.db;
        async move {
            let (sql, args) = compiled?;
            db.query(&sql, &args, records).await
        }
    }

    /// Execute and bind the first row into `record`.
    ///
    /// Returns [`crate::OrmError::NotFound`] when the query yields no rows.
    pub fn query_row<E: Entity + ?Sized>(
        &self,
        record: &mut E,
    ) -> impl Future<Output = OrmResult<()>> + Send {
        let compiled = self.sql();
        let db = self.db;
        async move {
            let (sql, args) = compiled?;
            db.query_row(&sql, &args, record).await
        }
    }
}

impl<D> Build for SelectBuilder<'_, D> {
    fn build(&self, sql: &mut String, args: &mut ParamList) -> OrmResult<()> {
        sql.push_str("SELECT ");
        if self.columns.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.columns.join(", "));
        }

        if let Some(from) = &self.from {
            sql.push_str(" FROM ");
            from.build(sql, args)?;
        }

        if let Some(filter) = &self.filter {
            sql.push_str(" WHERE ");
            filter.build(sql, args)?;
        }

        Ok(())
    }
}

impl<D> fmt::Debug for SelectBuilder<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectBuilder")
            .field("columns", &self.columns)
            .field("has_from", &self.from.is_some())
            .field("filter", &self.filter)
            .finish()
    }
}
