use super::columns::{GridColumns, SortColumn};
use crate::core::Queryable;
use crate::errors::GridError;
use crate::models::Sorter;

/// Apply sorters in order: the first is the primary sort key.
///
/// All aliases are resolved before any ordering is added.
pub fn apply_sorters<Q: Queryable>(
    query: &mut Q,
    columns: &GridColumns,
    sorters: &[Sorter],
) -> Result<(), GridError> {
    let mut orders = Vec::with_capacity(sorters.len());
    for sorter in sorters {
        match columns.resolve_sort(&sorter.column)?.as_ref() {
            SortColumn::Physical(column) => orders.push((column.expr(), sorter.direction)),
            SortColumn::Callback(callback) => orders.extend(callback(sorter.direction)),
        }
    }

    tracing::debug!(count = orders.len(), "Applied grid sorters");
    for (expr, direction) in orders {
        query.order_by(expr, direction.into());
    }
    Ok(())
}
