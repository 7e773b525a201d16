use sea_orm::Condition;
use sea_orm::sea_query::{Expr, Func, SimpleExpr, Value};
use std::fmt;

use crate::errors::GridError;
use crate::models::Operator;

/// SQL type request values are bound as for a physical column.
///
/// Request values always arrive as strings. Binding them as text works on
/// SQLite and MySQL, which coerce, but PostgreSQL rejects `integer = text`,
/// so numeric and boolean columns should declare their type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ValueType {
    #[default]
    Text,
    /// Bound as `BIGINT`
    Integer,
    /// Bound as `DOUBLE PRECISION`
    Float,
    /// `true`/`false`, `1`/`0`
    Boolean,
}

impl ValueType {
    /// Parse a raw request value into a bindable value, `None` if it does not parse.
    #[must_use]
    pub fn bind(self, raw: &str) -> Option<Value> {
        match self {
            Self::Text => Some(raw.into()),
            Self::Integer => raw.trim().parse::<i64>().ok().map(Value::from),
            Self::Float => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(Value::from),
            Self::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true.into()),
                "false" | "0" => Some(false.into()),
                _ => None,
            },
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
        })
    }
}

fn value_at(operator: Operator, values: &[String], index: usize) -> Result<&str, GridError> {
    values
        .get(index)
        .map(String::as_str)
        .ok_or(GridError::missing_value(operator, index))
}

/// Build the predicate for `target <operator> values`, binding values as text.
///
/// `target` is usually a column (see
/// [`PhysicalColumn::expr`](crate::filtering::PhysicalColumn::expr)) but can be
/// any expression, which is how callback columns filter on computed values.
///
/// Every value is bound as its own parameter, so the same column and operator
/// can appear any number of times in one query. Values beyond the operator's
/// arity are ignored; missing ones fail with [`GridError::MissingValue`].
///
/// `LIKE`, `STARTS` and `ENDS` wrap the value in `%` wildcards without
/// escaping wildcards already present in it.
///
/// `NBETWEEN` is built as `target > values[1] OR target < values[0]`, i.e. the
/// complement of the inclusive `BETWEEN` range with the bounds checked (and
/// bound) in reversed order.
pub fn build_expression(
    target: impl Into<SimpleExpr>,
    operator: Operator,
    values: &[String],
) -> Result<Condition, GridError> {
    build_typed_expression(target, ValueType::Text, operator, values)
}

/// [`build_expression`] with values parsed and bound as `value_type`.
///
/// Comparison, membership and range operands are parsed; a value that does
/// not parse fails with [`GridError::InvalidValue`]. Pattern operators always
/// bind text.
pub fn build_typed_expression(
    target: impl Into<SimpleExpr>,
    value_type: ValueType,
    operator: Operator,
    values: &[String],
) -> Result<Condition, GridError> {
    let target: SimpleExpr = target.into();
    let column = || Expr::expr(target.clone());
    let parse = |raw: &str| {
        value_type
            .bind(raw)
            .ok_or_else(|| GridError::invalid_value(operator, raw, value_type))
    };
    let bound = |index: usize| parse(value_at(operator, values, index)?);
    let pattern = || value_at(operator, values, 0);
    let all = || {
        value_at(operator, values, 0)?;
        values.iter().map(|raw| parse(raw)).collect::<Result<Vec<_>, _>>()
    };

    let expr = match operator {
        Operator::Eq => column().eq(bound(0)?),
        Operator::Neq => column().ne(bound(0)?),
        Operator::In => column().is_in(all()?),
        Operator::Nin => column().is_not_in(all()?),
        Operator::Gt => column().gt(bound(0)?),
        Operator::Lt => column().lt(bound(0)?),
        Operator::Gte => column().gte(bound(0)?),
        Operator::Lte => column().lte(bound(0)?),
        Operator::Like => column().like(format!("%{}%", pattern()?)),
        Operator::Starts => column().like(format!("{}%", pattern()?)),
        Operator::Ends => column().like(format!("%{}", pattern()?)),
        Operator::Nempty => column().is_not_null(),
        Operator::Empty => column().is_null(),
        Operator::Between => {
            let low = bound(0)?;
            let high = bound(1)?;
            column().between(low, high)
        }
        Operator::Nbetween => {
            let low = bound(0)?;
            let high = bound(1)?;
            return Ok(Condition::any()
                .add(column().gt(high))
                .add(column().lt(low)));
        }
    };

    Ok(Condition::all().add(expr))
}

/// Case-insensitive "contains": `UPPER(target) LIKE '%TEXT%'`.
pub fn contains_ignore_case(target: impl Into<SimpleExpr>, text: &str) -> SimpleExpr {
    Expr::expr(Func::upper(target.into())).like(format!("%{}%", text.to_uppercase()))
}
