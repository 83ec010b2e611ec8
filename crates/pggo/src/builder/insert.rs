//! INSERT statement builder.

use super::expr::{Build, Table};
use super::param::{Param, ParamList};
use crate::db::Db;
use crate::entity::Entity;
use crate::error::{OrmError, OrmResult};
use std::fmt;
use std::future::Future;

enum RowSource<'a> {
    Values(Vec<Param>),
    Entity(&'a dyn Entity),
}

/// Builder for `INSERT INTO <table> [(<columns>)] VALUES (<row>),(<row>)...`.
///
/// Created by [`crate::insert`], [`crate::insert_table`] or their [`crate::Factory`]
/// counterparts.
pub struct InsertBuilder<'a, D> {
    db: &'a D,
    table: Box<dyn Table + 'a>,
    columns: Vec<String>,
    rows: Vec<RowSource<'a>>,
    affected_rows: Option<&'a mut u64>,
}

impl<'a, D> InsertBuilder<'a, D> {
    pub(crate) fn new(db: &'a D, table: impl Table + 'a) -> Self {
        Self {
            db,
            table: Box::new(table),
            columns: Vec::new(),
            rows: Vec::new(),
            affected_rows: None,
        }
    }

    /// Set the column list.
    pub fn columns<S: AsRef<str>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns.into_iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    /// Add one row of values.
    pub fn values(mut self, row: Vec<Param>) -> Self {
        self.rows.push(RowSource::Values(row));
        self
    }

    /// Add one row per record.
    ///
    /// The values are read through [`Entity::get_values`] for the configured columns each
    /// time the statement is compiled.
    pub fn entities<E: Entity + 'a>(mut self, entities: impl IntoIterator<Item = &'a E>) -> Self {
        self.rows.extend(
            entities
                .into_iter()
                .map(|e| RowSource::Entity(e as &'a dyn Entity)),
        );
        self
    }

    /// Receive the affected-row count when the statement is executed.
    pub fn affected_rows(mut self, out: &'a mut u64) -> Self {
        self.affected_rows = Some(out);
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

impl<'a, D: Db> InsertBuilder<'a, D> {
    /// Execute and return the affected-row count.
    ///
    /// The count is also written to the out-param set with [`InsertBuilder::affected_rows`].
    pub fn exec(self) -> impl Future<Output = OrmResult<u64>> + Send + 'a {
        let compiled = self.sql();
        let db = self.db;
        let out = self.affected_rows;
        async move {
            let (sql, args) = compiled?;
            let affected = db.exec(&sql, &args).await?;
            if let Some(out) = out {
                *out = affected;
            }
            Ok(affected)
        }
    }
}

impl<D> Build for InsertBuilder<'_, D> {
    fn build(&self, sql: &mut String, args: &mut ParamList) -> OrmResult<()> {
        if self.rows.is_empty() {
            return Err(OrmError::NoRows);
        }

        sql.push_str("INSERT INTO ");
        self.table.build(sql, args)?;

        if !self.columns.is_empty() {
            sql.push_str(" (");
            sql.push_str(&self.columns.join(","));
            sql.push(')');
        }

        sql.push_str(" VALUES ");
        let columns: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                sql.push(',');
            }
            let pulled;
            let values = match row {
                RowSource::Values(values) => values,
                RowSource::Entity(entity) => {
                    pulled = entity.get_values(&columns)?;
                    &pulled
                }
            };
            sql.push('(');
            for (j, value) in values.iter().enumerate() {
                if j > 0 {
                    sql.push(',');
                }
                let placeholder = args.push(value.clone());
                sql.push_str(&placeholder);
            }
            sql.push(')');
        }

        Ok(())
    }
}

impl<D> fmt::Debug for InsertBuilder<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertBuilder")
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
            .finish()
    }
}
