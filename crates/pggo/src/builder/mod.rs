//! SQL construction: accumulator, expression protocol, predicates and statement builders.
//!
//! ```ignore
//! use pggo::{equal, in_list, or, select};
//!
//! let (sql, args) = select(["id", "name"])
//!     .from_table("person")
//!     .where_([equal("active", true), or([equal("id", 1_i32), in_list("id", [2_i32, 3])])])
//!     .sql()?;
//!
//! assert_eq!(
//!     sql,
//!     "SELECT id, name FROM person WHERE ((active = $1) AND ((id = $2) OR (id IN ($3,$4))))"
//! );
//! assert_eq!(args.len(), 4);
//! ```

pub mod condition;
pub mod expr;
pub mod factory;
pub mod insert;
pub mod param;
pub mod select;

pub use condition::{Condition, Operand, and, equal, in_list, or};
pub use expr::{BaseTable, Build, Table, TableDef};
pub use factory::{DEFAULT_FACTORY, Factory, insert, insert_table, select};
pub use insert::InsertBuilder;
pub use param::{Param, ParamList};
pub use select::SelectBuilder;
