//! Builder entry points bound to a [`Db`].

use super::expr::{BaseTable, Table};
use super::insert::InsertBuilder;
use super::select::SelectBuilder;
use crate::db::{Db, NoopDb};

/// Creates statement builders that execute through `D`.
///
/// ```ignore
/// let db = pggo::pg::with(&client);
/// let mut people: Vec<Person> = Vec::new();
/// db.select(["id", "name"])
///     .from_table("person")
///     .where_([pggo::equal("id", 1_i32)])
///     .query(&mut people)
///     .await?;
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Factory<D = NoopDb> {
    db: D,
}

impl<D> Factory<D> {
    pub const fn new(db: D) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &D {
        &self.db
    }

    pub fn into_db(self) -> D {
        self.db
    }

    /// Start a SELECT of `columns`.
    pub fn select<S: AsRef<str>>(&self, columns: impl IntoIterator<Item = S>) -> SelectBuilder<'_, D> {
        SelectBuilder::new(&self.db, columns)
    }

    /// Start an INSERT into `table`.
    pub fn insert<'a>(&'a self, table: impl Table + 'a) -> InsertBuilder<'a, D> {
        InsertBuilder::new(&self.db, table)
    }

    /// Start an INSERT into a table referenced by name.
    pub fn insert_table(&self, name: impl Into<String>) -> InsertBuilder<'_, D> {
        InsertBuilder::new(&self.db, BaseTable::new(name))
    }
}

impl<D: Db> From<D> for Factory<D> {
    fn from(db: D) -> Self {
        Self::new(db)
    }
}

/// Factory used by the free functions; it has no database.
pub static DEFAULT_FACTORY: Factory<NoopDb> = Factory::new(NoopDb);

/// Start a SELECT of `columns` without a database.
///
/// The statement can be compiled with `sql()`; executing it fails with
/// [`crate::OrmError::NoDb`].
pub fn select<S: AsRef<str>>(columns: impl IntoIterator<Item = S>) -> SelectBuilder<'static, NoopDb> {
    DEFAULT_FACTORY.select(columns)
}

/// Start an INSERT into `table` without a database.
pub fn insert<'a>(table: impl Table + 'a) -> InsertBuilder<'a, NoopDb> {
    DEFAULT_FACTORY.insert(table)
}

/// Start an INSERT into a table referenced by name, without a database.
pub fn insert_table(name: impl Into<String>) -> InsertBuilder<'static, NoopDb> {
    DEFAULT_FACTORY.insert_table(name)
}
