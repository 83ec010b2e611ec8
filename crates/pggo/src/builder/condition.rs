//! Predicate combinators for WHERE clauses.

use super::expr::Build;
use super::param::{Param, ParamList};
use crate::error::{OrmError, OrmResult};
use tokio_postgres::types::ToSql;

/// Right-hand side of a comparison.
#[derive(Clone, Debug)]
pub enum Operand {
    /// A single placeholder.
    Value(Param),
    /// A parenthesized, comma-separated placeholder group.
    Group(Vec<Param>),
}

impl Build for Operand {
    fn build(&self, sql: &mut String, args: &mut ParamList) -> OrmResult<()> {
        match self {
            Operand::Value(param) => {
                let placeholder = args.push(param.clone());
                sql.push_str(&placeholder);
            }
            Operand::Group(params) => {
                if params.is_empty() {
                    return Err(OrmError::EmptyGroup);
                }
                sql.push('(');
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        sql.push(',');
                    }
                    let placeholder = args.push(param.clone());
                    sql.push_str(&placeholder);
                }
                sql.push(')');
            }
        }
        Ok(())
    }
}

/// Boolean predicate tree.
///
/// Conditions are plain values; nothing is validated until the enclosing statement is
/// compiled.
#[derive(Clone, Debug)]
pub enum Condition {
    /// `(column op operand)`
    Compare {
        op: &'static str,
        column: String,
        operand: Operand,
    },

    /// `(c1 op c2 op ...)`; a single child is written unwrapped.
    Logical {
        op: &'static str,
        conditions: Vec<Condition>,
    },
}

impl Condition {
    /// `column IN (...)` over already-wrapped parameters.
    pub fn in_params(column: impl Into<String>, values: Vec<Param>) -> Self {
        Condition::Compare {
            op: "IN",
            column: column.into(),
            operand: Operand::Group(values),
        }
    }

    /// Combine with another condition using AND.
    pub fn and(self, other: Condition) -> Self {
        and([self, other])
    }

    /// Combine with another condition using OR.
    pub fn or(self, other: Condition) -> Self {
        or([self, other])
    }
}

impl Build for Condition {
    fn build(&self, sql: &mut String, args: &mut ParamList) -> OrmResult<()> {
        match self {
            Condition::Compare {
                op,
                column,
                operand,
            } => {
                sql.push('(');
                sql.push_str(column);
                sql.push(' ');
                sql.push_str(op);
                sql.push(' ');
                operand.build(sql, args)?;
                sql.push(')');
                Ok(())
            }
            Condition::Logical { op, conditions } => match conditions.as_slice() {
                [] => Err(OrmError::EmptyConditions),
                [only] => only.build(sql, args),
                _ => {
                    sql.push('(');
                    for (i, cond) in conditions.iter().enumerate() {
                        if i > 0 {
                            sql.push(' ');
                            sql.push_str(op);
                            sql.push(' ');
                        }
                        cond.build(sql, args)?;
                    }
                    sql.push(')');
                    Ok(())
                }
            },
        }
    }
}

/// `(column = $n)`
pub fn equal<T>(column: impl Into<String>, value: T) -> Condition
where
    T: ToSql + Send + Sync + 'static,
{
    Condition::Compare {
        op: "=",
        column: column.into(),
        operand: Operand::Value(Param::new(value)),
    }
}

/// `(column IN ($a,$b,...))`
///
/// An empty `values` list fails when the statement is compiled.
pub fn in_list<T, I>(column: impl Into<String>, values: I) -> Condition
where
    T: ToSql + Send + Sync + 'static,
    I: IntoIterator<Item = T>,
{
    Condition::in_params(column, values.into_iter().map(Param::new).collect())
}

/// Conjunction of `conditions`.
pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::Logical {
        op: "AND",
        conditions: conditions.into_iter().collect(),
    }
}

/// Disjunction of `conditions`.
pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Condition {
    Condition::Logical {
        op: "OR",
        conditions: conditions.into_iter().collect(),
    }
}
