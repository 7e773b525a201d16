//! Join scope routing.
//!
//! In join-aware mode an OR-group whose columns all live on one joined table
//! is attached to that join's `ON` clause instead of the root `WHERE`. With a
//! `LEFT JOIN` this drops only the non-matching related rows: the owning row
//! stays in the result with empty related columns, where a `WHERE` predicate
//! on the same columns would have removed it.
//!
//! A group that mixes tables stays at the root, since splitting its OR across
//! several `ON` clauses would turn it into an AND.

use sea_orm::Condition;

/// Where a group of predicates belongs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum GroupScope {
    #[default]
    Empty,
    Table(String),
    Root,
}

/// Collects the tables referenced by one OR-group.
#[derive(Debug, Default)]
pub struct ScopeTracker {
    scope: GroupScope,
}

impl ScopeTracker {
    /// Record a predicate on `table` (`None` for unqualified columns and callbacks).
    pub fn include(&mut self, table: Option<&str>) {
        self.scope = match (std::mem::take(&mut self.scope), table) {
            (GroupScope::Empty, Some(table)) => GroupScope::Table(table.to_string()),
            (GroupScope::Table(current), Some(table)) if current == table => {
                GroupScope::Table(current)
            }
            _ => GroupScope::Root,
        };
    }

    /// `None` when no predicate was recorded.
    #[must_use]
    pub fn finish(self, condition: Condition) -> Option<ScopedCondition> {
        let scope = match self.scope {
            GroupScope::Empty => return None,
            GroupScope::Table(table) => Some(table),
            GroupScope::Root => None,
        };
        Some(ScopedCondition { scope, condition })
    }
}

/// A composed OR-group and the single table it references, if any.
#[derive(Debug, Clone)]
pub struct ScopedCondition {
    pub scope: Option<String>,
    pub condition: Condition,
}
