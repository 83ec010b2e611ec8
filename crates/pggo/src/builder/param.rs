//! Argument accumulator and clone-friendly parameter storage.

use std::fmt;
use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A clone-friendly bound value.
///
/// Builders hold their literal values as `Param`s so a statement can be compiled any number
/// of times without copying the underlying data.
#[derive(Clone)]
pub struct Param(Arc<dyn ToSql + Send + Sync>);

impl Param {
    /// Create a new parameter from any ToSql value.
    pub fn new<T: ToSql + Send + Sync + 'static>(value: T) -> Self {
        Param(Arc::new(value))
    }

    /// Get a reference to the inner value as a ToSql trait object.
    pub fn as_sql(&self) -> &(dyn ToSql + Sync) {
        &*self.0 as &(dyn ToSql + Sync)
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Build a `Vec<Param>` from a list of values.
///
/// ```ignore
/// pggo::insert_table("person")
///     .columns(["id", "name"])
///     .values(pggo::params![1_i32, "Joe"]);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::Param>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Param::new($value)),+]
    };
}

/// Ordered, append-only list of bound values.
///
/// Every append hands back the placeholder token for the value just stored. The number in
/// the token is the list length after the append, so tokens follow traversal order.
#[derive(Clone, Debug, Default)]
pub struct ParamList {
    params: Vec<Param>,
}

impl ParamList {
    /// Create a new empty parameter list.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Store one value and return its placeholder (`$1`, `$2`, ...).
    pub fn push(&mut self, param: Param) -> String {
        self.params.push(param);
        format!("${}", self.params.len())
    }

    /// Store a run of values and return the placeholder of the last one.
    ///
    /// An empty run stores nothing and returns `None`.
    pub fn append(&mut self, params: impl IntoIterator<Item = Param>) -> Option<String> {
        let before = self.params.len();
        self.params.extend(params);
        (self.params.len() > before).then(|| format!("${}", self.params.len()))
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Consume the list, returning the stored values in order.
    pub fn into_vec(self) -> Vec<Param> {
        self.params
    }
}

/// Borrow a slice of parameters the way tokio-postgres expects them.
pub fn as_refs(params: &[Param]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(Param::as_sql).collect()
}
