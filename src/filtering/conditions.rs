use sea_orm::Condition;

use super::columns::{FilterColumn, GridColumns};
use super::expression::build_typed_expression;
use super::joined::{ScopeTracker, ScopedCondition};
use super::search::build_search_group;
use crate::core::Queryable;
use crate::errors::GridError;
use crate::models::FilterCondition;

/// Compose one OR-group. Empty groups produce nothing.
fn build_group(
    columns: &GridColumns,
    group: &[FilterCondition],
) -> Result<Option<ScopedCondition>, GridError> {
    let mut condition = Condition::any();
    let mut tracker = ScopeTracker::default();

    for filter in group {
        let predicate = match columns.resolve_filter(&filter.column)?.as_ref() {
            FilterColumn::Physical(column) => {
                tracker.include(column.table());
                build_typed_expression(
                    column.expr(),
                    column.value_type(),
                    filter.operator,
                    &filter.value,
                )?
            }
            FilterColumn::Callback(callback) => {
                tracker.include(None);
                callback(filter.operator, &filter.value)?
            }
        };
        condition = condition.add(predicate);
    }

    Ok(tracker.finish(condition))
}

/// Apply filter groups and the optional free-text search to `query`.
///
/// Conditions inside a group are OR'ed; groups (and the search group) are
/// AND'ed together. In join-aware mode a group that only touches one joined
/// table goes to that join's `ON` clause (see [`super::joined`]).
///
/// Every alias and value is validated before `query` is touched, so on error
/// the query is left as it was.
pub fn apply_filters<Q: Queryable>(
    query: &mut Q,
    columns: &GridColumns,
    groups: &[Vec<FilterCondition>],
    search: Option<&str>,
) -> Result<(), GridError> {
    let mut composed = Vec::with_capacity(groups.len() + 1);
    for group in groups {
        composed.extend(build_group(columns, group)?);
    }
    if let Some(text) = search {
        composed.extend(build_search_group(columns, text)?);
    }

    let mut root = Condition::all();
    let mut joined = 0_usize;
    for ScopedCondition { scope, condition } in composed {
        match scope {
            Some(scope) if columns.is_join_aware() && query.has_scope(&scope) => {
                query.filter_scope(&scope, condition);
                joined += 1;
            }
            _ => root = root.add(condition),
        }
    }

    let rooted = root.len();
    if !root.is_empty() {
        query.filter(root);
    }

    tracing::debug!(rooted, joined, searching = search.is_some(), "Applied grid filters");
    Ok(())
}
