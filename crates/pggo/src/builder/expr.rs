//! Expression builder protocol and table targets.
//!
//! Every composable SQL fragment implements [`Build`]: it writes its text into a `String`
//! sink and registers literal values with the [`ParamList`], splicing the returned
//! placeholder at the matching position. Composites call their children in order, so the
//! `$n` numbering always follows the left-to-right order of the generated text.

use super::param::ParamList;
use crate::error::OrmResult;

/// A SQL fragment that can be written into a statement.
pub trait Build {
    /// Write the fragment to `sql`, registering its arguments with `args`.
    ///
    /// On error the sink may hold a partial fragment; callers discard it.
    fn build(&self, sql: &mut String, args: &mut ParamList) -> OrmResult<()>;
}

impl<T: Build + ?Sized> Build for &T {
    fn build(&self, sql: &mut String, args: &mut ParamList) -> OrmResult<()> {
        (**self).build(sql, args)
    }
}

impl<T: Build + ?Sized> Build for Box<T> {
    fn build(&self, sql: &mut String, args: &mut ParamList) -> OrmResult<()> {
        (**self).build(sql, args)
    }
}

/// A FROM / INSERT INTO target.
///
/// Predicates do not implement this trait, so a condition can never be passed where a table
/// is expected.
pub trait Table: Build + Send + Sync {}

impl<T: Table + ?Sized> Table for &T {}

impl<T: Table + ?Sized> Table for Box<T> {}

/// A table referenced by a literal name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseTable {
    name: String,
}

impl BaseTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Build for BaseTable {
    fn build(&self, sql: &mut String, _args: &mut ParamList) -> OrmResult<()> {
        sql.push_str(&self.name);
        Ok(())
    }
}

impl Table for BaseTable {}

/// Static description of a table: its name and declared columns in order.
///
/// Generated schema modules expose one of these per table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableDef {
    name: &'static str,
    columns: &'static [&'static str],
}

impl TableDef {
    pub const fn new(name: &'static str, columns: &'static [&'static str]) -> Self {
        Self { name, columns }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Declared columns, in table order.
    pub const fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    /// Check whether `column` is one of the declared columns.
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains(&column)
    }
}

impl Build for TableDef {
    fn build(&self, sql: &mut String, _args: &mut ParamList) -> OrmResult<()> {
        sql.push_str(self.name);
        Ok(())
    }
}

impl Table for TableDef {}
