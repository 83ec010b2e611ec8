//! Row binding by column name.
//!
//! A record type implements [`Entity`] to expose its fields as scan targets and as bound
//! values, keyed by column name. Executors read the column names the driver returned and ask
//! the record for exactly those targets, in that order. Values are decoded from the raw
//! PostgreSQL wire bytes through `FromSql`, so any owned `FromSql` type can be a field.
//!
//! ```ignore
//! #[derive(Debug, Default)]
//! struct Person {
//!     id: i32,
//!     name: String,
//! }
//!
//! impl Entity for Person {
//!     fn get_pointers<'a>(&'a mut self, columns: &[&str]) -> OrmResult<Vec<&'a mut dyn Scan>> {
//!         Pointers::new()
//!             .field("id", &mut self.id)
//!             .field("name", &mut self.name)
//!             .select(columns)
//!     }
//!
//!     fn get_values(&self, columns: &[&str]) -> OrmResult<Vec<Param>> {
//!         Values::new()
//!             .field("id", self.id)
//!             .field("name", self.name.clone())
//!             .select(columns)
//!     }
//! }
//! ```

use crate::builder::Param;
use crate::error::{OrmError, OrmResult};
use std::error::Error;
use tokio_postgres::types::{FromSql, ToSql, Type};

/// A destination for one column value.
pub trait Scan: Send {
    /// Decode `raw` (`None` for SQL NULL) of PostgreSQL type `ty` into `self`.
    fn scan(&mut self, ty: &Type, raw: Option<&[u8]>) -> Result<(), Box<dyn Error + Sync + Send>>;
}

impl<T> Scan for T
where
    T: for<'r> FromSql<'r> + Send,
{
    fn scan(&mut self, ty: &Type, raw: Option<&[u8]>) -> Result<(), Box<dyn Error + Sync + Send>> {
        if !T::accepts(ty) {
            return Err(format!(
                "cannot convert between the Postgres type {ty} and the Rust type {}",
                std::any::type_name::<T>()
            )
            .into());
        }
        *self = T::from_sql_nullable(ty, raw)?;
        Ok(())
    }
}

/// A record that can be bound to result rows and read as insert values.
pub trait Entity: Send + Sync {
    /// Scan targets for `columns`, in the same order.
    ///
    /// An empty `columns` slice selects every field in declaration order. A column the
    /// record does not know fails with [`OrmError::UnknownColumn`].
    ///
    /// Each field can be borrowed once, so a column name that appears twice fails with
    /// [`OrmError::DuplicateColumn`]. Alias same-named columns of joined tables
    /// (`a.id AS a_id, b.id AS b_id`).
    fn get_pointers<'a>(&'a mut self, columns: &[&str]) -> OrmResult<Vec<&'a mut dyn Scan>>;

    /// Bound values for `columns`, in the same order.
    ///
    /// An empty `columns` slice selects every field in declaration order.
    fn get_values(&self, columns: &[&str]) -> OrmResult<Vec<Param>>;
}

/// A growable collection of records, used as the target of multi-row queries.
pub trait EntityList: Send {
    type Entity: Entity;

    /// Create a fresh record to bind the next row into.
    fn new_entity(&self) -> Self::Entity;

    /// Collect a bound record.
    fn append(&mut self, entity: Self::Entity);
}

impl<E: Entity + Default> EntityList for Vec<E> {
    type Entity = E;

    fn new_entity(&self) -> E {
        E::default()
    }

    fn append(&mut self, entity: E) {
        self.push(entity);
    }
}

/// Column-keyed scan targets of one record.
#[derive(Default)]
pub struct Pointers<'a> {
    fields: Vec<(&'static str, Option<&'a mut dyn Scan>)>,
}

impl<'a> Pointers<'a> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Register `target` under `column`.
    pub fn field<T: Scan>(mut self, column: &'static str, target: &'a mut T) -> Self {
        self.fields.push((column, Some(target as &mut dyn Scan)));
        self
    }

    /// Resolve the targets for `columns`.
    pub fn select(self, columns: &[&str]) -> OrmResult<Vec<&'a mut dyn Scan>> {
        let mut fields = self.fields;
        if columns.is_empty() {
            return Ok(fields.into_iter().filter_map(|(_, target)| target).collect());
        }

        let mut targets = Vec::with_capacity(columns.len());
        for &column in columns {
            let Some((_, slot)) = fields.iter_mut().find(|(name, _)| *name == column) else {
                return Err(OrmError::UnknownColumn(column.to_string()));
            };
            match slot.take() {
                Some(target) => targets.push(target),
                None => return Err(OrmError::DuplicateColumn(column.to_string())),
            }
        }
        Ok(targets)
    }
}

/// Column-keyed bound values of one record.
#[derive(Clone, Debug, Default)]
pub struct Values {
    fields: Vec<(&'static str, Param)>,
}

impl Values {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Register `value` under `column`.
    pub fn field<T: ToSql + Send + Sync + 'static>(mut self, column: &'static str, value: T) -> Self {
        self.fields.push((column, Param::new(value)));
        self
    }

    /// Pick the values for `columns`, in that order.
    pub fn select(self, columns: &[&str]) -> OrmResult<Vec<Param>> {
        if columns.is_empty() {
            return Ok(self.fields.into_iter().map(|(_, value)| value).collect());
        }

        columns
            .iter()
            .map(|&column| {
                self.fields
                    .iter()
                    .find(|(name, _)| *name == column)
                    .map(|(_, value)| value.clone())
                    .ok_or_else(|| OrmError::UnknownColumn(column.to_string()))
            })
            .collect()
    }
}

/// A driver row seen through column names and raw values.
pub trait ResultRow {
    /// Column names, in result order.
    fn column_names(&self) -> Vec<&str>;

    /// Type and raw bytes of the value at `idx` (`None` for NULL).
    fn raw_value(&self, idx: usize) -> OrmResult<(&Type, Option<&[u8]>)>;
}

/// Bind one row into `record`.
///
/// Every target is resolved before anything is scanned, so an unknown column leaves the
/// record untouched.
pub fn scan_row<R, E>(row: &R, columns: &[&str], record: &mut E) -> OrmResult<()>
where
    R: ResultRow + ?Sized,
    E: Entity + ?Sized,
{
    if columns.is_empty() {
        return Ok(());
    }

    let mut targets = record.get_pointers(columns)?;
    if targets.len() != columns.len() {
        return Err(OrmError::Other(format!(
            "sqlb: expected {} scan targets, got {}",
            columns.len(),
            targets.len()
        )));
    }

    for (idx, target) in targets.iter_mut().enumerate() {
        let (ty, raw) = row.raw_value(idx)?;
        target
            .scan(ty, raw)
            .map_err(|e| OrmError::decode(columns[idx], e.to_string()))?;
    }
    Ok(())
}

/// Bind every row into a fresh record of `list`.
pub fn scan_rows<R, L>(rows: &[R], list: &mut L) -> OrmResult<()>
where
    R: ResultRow,
    L: EntityList + ?Sized,
{
    let Some(first) = rows.first() else {
        return Ok(());
    };
    let columns = first.column_names();

    for row in rows {
        let mut entity = list.new_entity();
        scan_row(row, &columns, &mut entity)?;
        list.append(entity);
    }
    Ok(())
}

/// Bind the first row into `record`; later rows are ignored.
pub fn scan_first<R, E>(rows: &[R], record: &mut E) -> OrmResult<()>
where
    R: ResultRow,
    E: Entity + ?Sized,
{
    let Some(first) = rows.first() else {
        return Err(OrmError::not_found("sqlb: no rows in result set"));
    };
    let columns = first.column_names();
    scan_row(first, &columns, record)
}

#[cfg(test)]
mod tests;
