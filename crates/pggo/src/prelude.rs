//! Convenient imports for typical `pggo` usage.
//!
//! ```ignore
//! use pggo::prelude::*;
//! ```

pub use crate::{
    Condition, Db, Entity, EntityList, Factory, OrmError, OrmResult, Param, Pointers, Scan,
    Table, TableDef, Values, and, equal, in_list, insert, insert_table, or, params, select,
};

#[cfg(feature = "pool")]
pub use crate::create_pool;
