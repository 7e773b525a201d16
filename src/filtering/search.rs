use sea_orm::Condition;

use super::columns::{FilterColumn, GridColumns};
use super::expression::contains_ignore_case;
use super::joined::{ScopeTracker, ScopedCondition};
use crate::errors::GridError;
use crate::models::Operator;

/// Build the free-text search group: one case-insensitive "contains" per
/// searchable alias, combined with OR.
///
/// Searchable aliases go through the filter allow-list like any other
/// column. Callback columns are invoked with `LIKE` and the search text;
/// unlike physical columns they get no `UPPER(..)`, so case handling is up to
/// the callback.
/// Returns `None` when the grid has no searchable columns.
pub fn build_search_group(
    columns: &GridColumns,
    text: &str,
) -> Result<Option<ScopedCondition>, GridError> {
    let mut condition = Condition::any();
    let mut tracker = ScopeTracker::default();

    for alias in columns.searchable() {
        match columns.resolve_filter(alias)?.as_ref() {
            FilterColumn::Physical(column) => {
                tracker.include(column.table());
                condition = condition.add(contains_ignore_case(column.expr(), text));
            }
            FilterColumn::Callback(callback) => {
                tracker.include(None);
                condition = condition.add(callback(Operator::Like, &[text.to_string()])?);
            }
        }
    }

    Ok(tracker.finish(condition))
}
