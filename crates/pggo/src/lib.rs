//! # pggo
//!
//! SQL construction and result binding for PostgreSQL, decoupled from any connection type.
//!
//! ## Features
//!
//! - **No string concatenation**: statements and predicate trees are composed from values
//! - **Ordered placeholders**: `$n` numbering always follows the left-to-right order of the SQL
//! - **Binding by column name**: rows are scanned into records through the [`Entity`] trait
//! - **Pluggable execution**: builders delegate to a [`Db`]; [`pg::PgDb`] runs them on
//!   tokio-postgres clients, transactions and deadpool pools
//!
//! ## Example
//!
//! ```ignore
//! use pggo::{Entity, equal, in_list};
//!
//! #[derive(Debug, Default, Entity)]
//! struct Person {
//!     id: i32,
//!     name: String,
//! }
//!
//! let db = pggo::pg::with(&client);
//!
//! let mut people: Vec<Person> = Vec::new();
//! db.select(["id", "name"])
//!     .from_table("person")
//!     .where_([in_list("id", [1_i32, 2, 3])])
//!     .query(&mut people)
//!     .await?;
//!
//! let mut inserted = 0;
//! db.insert_table("person")
//!     .columns(["id", "name"])
//!     .entities(&people)
//!     .affected_rows(&mut inserted)
//!     .exec()
//!     .await?;
//!
//! // Without a database the statement can still be compiled.
//! let (sql, args) = pggo::select(["id"]).from_table("person").where_([equal("id", 1_i32)]).sql()?;
//! assert_eq!(sql, "SELECT id FROM person WHERE (id = $1)");
//! ```

pub mod builder;
pub mod db;
pub mod entity;
pub mod error;
pub mod pg;
pub mod prelude;

#[cfg(test)]
mod mock;

pub use builder::{
    BaseTable, Build, Condition, DEFAULT_FACTORY, Factory, InsertBuilder, Operand, Param,
    ParamList, SelectBuilder, Table, TableDef, and, equal, in_list, insert, insert_table, or,
    select,
};
pub use db::{Db, NoopDb};
pub use entity::{EntityList, Pointers, ResultRow, Scan, Values, scan_first, scan_row, scan_rows};
pub use error::{OrmError, OrmResult};

// The trait and its derive share a name; both are re-exported.
pub use entity::Entity;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};

#[cfg(feature = "derive")]
pub use pggo_derive::Entity;
