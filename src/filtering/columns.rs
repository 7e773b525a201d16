//! Column allow-lists.
//!
//! A [`GridColumns`] maps the public aliases a client may use to what they
//! mean in the query: a physical (optionally `table.column` qualified)
//! column, or a callback that builds the predicate or ordering itself.
//! It is built once, never mutated afterwards, and shared by every request.

use sea_orm::sea_query::{Alias, ColumnRef, Expr, IntoColumnRef, SimpleExpr};
use sea_orm::Condition;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::expression::ValueType;
use crate::errors::{ColumnUsage, GridError};
use crate::models::{Direction, Operator};

/// Builds the predicate for a callback filter column from the request's
/// operator and values.
pub type FilterCallback =
    Arc<dyn Fn(Operator, &[String]) -> Result<Condition, GridError> + Send + Sync>;

/// Builds one or more order-by entries for a callback sort column.
pub type SortCallback = Arc<dyn Fn(Direction) -> Vec<(SimpleExpr, Direction)> + Send + Sync>;

/// Split `"table.column"` at the first dot.
///
/// ```
/// use gridcrate::filtering::parse_qualified;
///
/// assert_eq!(parse_qualified("c.name"), (Some("c"), "name"));
/// assert_eq!(parse_qualified("name"), (None, "name"));
/// ```
#[must_use]
pub fn parse_qualified(reference: &str) -> (Option<&str>, &str) {
    match reference.split_once('.') {
        Some((table, column)) if !table.is_empty() => (Some(table), column),
        Some((_, column)) => (None, column),
        None => (None, reference),
    }
}

/// A column in the backing query, optionally qualified by its table (or
/// table alias), with the type filter values are bound as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhysicalColumn {
    table: Option<String>,
    column: String,
    value_type: ValueType,
}

impl PhysicalColumn {
    pub fn new(table: Option<&str>, column: impl Into<String>) -> Self {
        Self {
            table: table.map(str::to_string),
            column: column.into(),
            value_type: ValueType::Text,
        }
    }

    #[must_use]
    pub const fn with_value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    #[must_use]
    pub fn parse(reference: &str) -> Self {
        let (table, column) = parse_qualified(reference);
        Self::new(table, column)
    }

    #[must_use]
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Identifier reference, quoted by the query builder.
    #[must_use]
    pub fn column_ref(&self) -> ColumnRef {
        match &self.table {
            Some(table) => (Alias::new(table), Alias::new(&self.column)).into_column_ref(),
            None => Alias::new(&self.column).into_column_ref(),
        }
    }

    #[must_use]
    pub fn expr(&self) -> SimpleExpr {
        Expr::col(self.column_ref()).into()
    }
}

impl fmt::Display for PhysicalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{table}.{}", self.column),
            None => f.write_str(&self.column),
        }
    }
}

/// What a filterable alias resolves to.
#[derive(Clone)]
pub enum FilterColumn {
    Physical(PhysicalColumn),
    Callback(FilterCallback),
}

/// What a sortable alias resolves to.
#[derive(Clone)]
pub enum SortColumn {
    Physical(PhysicalColumn),
    Callback(SortCallback),
}

impl fmt::Debug for FilterColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Physical(column) => f.debug_tuple("Physical").field(column).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl fmt::Debug for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Physical(column) => f.debug_tuple("Physical").field(column).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// Filterable, sortable and searchable columns of one grid.
///
/// A map set to `None` is *open*: any alias is accepted and used directly as a
/// physical column name. Open mode offers no protection against clients naming
/// arbitrary columns and should only be used with trusted input.
#[derive(Debug, Clone)]
pub struct GridColumns {
    filterable: Option<HashMap<String, FilterColumn>>,
    sortable: Option<HashMap<String, SortColumn>>,
    searchable: Vec<String>,
    join_aware: bool,
}

impl Default for GridColumns {
    fn default() -> Self {
        GridColumnsBuilder::default().build()
    }
}

impl GridColumns {
    #[must_use]
    pub fn builder() -> GridColumnsBuilder {
        GridColumnsBuilder::default()
    }

    /// Resolve a filter alias.
    pub fn resolve_filter(&self, alias: &str) -> Result<Cow<'_, FilterColumn>, GridError> {
        match &self.filterable {
            None => Ok(Cow::Owned(FilterColumn::Physical(PhysicalColumn::parse(alias)))),
            Some(columns) => columns
                .get(alias)
                .map(Cow::Borrowed)
                .ok_or_else(|| GridError::not_allowed(alias, ColumnUsage::Filter)),
        }
    }

    /// Resolve a sort alias.
    pub fn resolve_sort(&self, alias: &str) -> Result<Cow<'_, SortColumn>, GridError> {
        match &self.sortable {
            None => Ok(Cow::Owned(SortColumn::Physical(PhysicalColumn::parse(alias)))),
            Some(columns) => columns
                .get(alias)
                .map(Cow::Borrowed)
                .ok_or_else(|| GridError::not_allowed(alias, ColumnUsage::Sort)),
        }
    }

    /// Aliases matched by free-text search, resolved through the filter allow-list.
    #[must_use]
    pub fn searchable(&self) -> &[String] {
        &self.searchable
    }

    /// Whether predicates on joined tables are routed to the join's `ON` clause.
    #[must_use]
    pub const fn is_join_aware(&self) -> bool {
        self.join_aware
    }
}

/// Builder for [`GridColumns`]. Starts strict: nothing is filterable or
/// sortable until listed.
pub struct GridColumnsBuilder {
    filterable: Option<HashMap<String, FilterColumn>>,
    sortable: Option<HashMap<String, SortColumn>>,
    searchable: Vec<String>,
    join_aware: bool,
}

impl Default for GridColumnsBuilder {
    fn default() -> Self {
        Self {
            filterable: Some(HashMap::new()),
            sortable: Some(HashMap::new()),
            searchable: Vec::new(),
            join_aware: false,
        }
    }
}

impl GridColumnsBuilder {
    /// Allow `alias` for both filtering and sorting.
    #[must_use]
    pub fn column(self, alias: &str, reference: &str) -> Self {
        self.filter(alias, reference).sort(alias, reference)
    }

    /// [`Self::column`] with filter values bound as `value_type`.
    #[must_use]
    pub fn column_typed(self, alias: &str, reference: &str, value_type: ValueType) -> Self {
        self.filter_typed(alias, reference, value_type).sort(alias, reference)
    }

    /// Allow `alias` for filtering, binding its values as text.
    #[must_use]
    pub fn filter(self, alias: &str, reference: &str) -> Self {
        self.filter_typed(alias, reference, ValueType::Text)
    }

    /// Allow `alias` for filtering, parsing its values as `value_type`.
    ///
    /// PostgreSQL needs this for non-text columns: it does not compare an
    /// `integer` column with a text parameter.
    #[must_use]
    pub fn filter_typed(mut self, alias: &str, reference: &str, value_type: ValueType) -> Self {
        self.filterable.get_or_insert_with(HashMap::new).insert(
            alias.to_string(),
            FilterColumn::Physical(PhysicalColumn::parse(reference).with_value_type(value_type)),
        );
        self
    }

    /// Allow `alias` for filtering through `callback`, which gets the raw
    /// operator and values and builds the whole predicate.
    ///
    /// A searchable callback column is called with [`Operator::Like`] and the
    /// search text as its only value. Physical columns are searched with
    /// `UPPER(..) LIKE`; a callback that should match case-insensitively on
    /// PostgreSQL has to do that itself (e.g. with
    /// [`contains_ignore_case`](crate::filtering::contains_ignore_case)).
    #[must_use]
    pub fn filter_with<F>(mut self, alias: &str, callback: F) -> Self
    where
        F: Fn(Operator, &[String]) -> Result<Condition, GridError> + Send + Sync + 'static,
    {
        self.filterable
            .get_or_insert_with(HashMap::new)
            .insert(alias.to_string(), FilterColumn::Callback(Arc::new(callback)));
        self
    }

    #[must_use]
    pub fn sort(mut self, alias: &str, reference: &str) -> Self {
        self.sortable.get_or_insert_with(HashMap::new).insert(
            alias.to_string(),
            SortColumn::Physical(PhysicalColumn::parse(reference)),
        );
        self
    }

    #[must_use]
    pub fn sort_with<F>(mut self, alias: &str, callback: F) -> Self
    where
        F: Fn(Direction) -> Vec<(SimpleExpr, Direction)> + Send + Sync + 'static,
    {
        self.sortable
            .get_or_insert_with(HashMap::new)
            .insert(alias.to_string(), SortColumn::Callback(Arc::new(callback)));
        self
    }

    /// Filter aliases matched by the free-text `search`.
    ///
    /// Physical columns match case-insensitively. Callback columns receive
    /// `LIKE` with the raw text and decide themselves, see [`Self::filter_with`].
    #[must_use]
    pub fn search<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Accept any filter alias as a physical column name.
    #[must_use]
    pub fn allow_any_filter(mut self) -> Self {
        tracing::warn!("Grid configured without a filter allow-list; aliases are used as column names");
        self.filterable = None;
        self
    }

    /// Accept any sort alias as a physical column name.
    #[must_use]
    pub fn allow_any_sort(mut self) -> Self {
        tracing::warn!("Grid configured without a sort allow-list; aliases are used as column names");
        self.sortable = None;
        self
    }

    #[must_use]
    pub const fn join_aware(mut self, join_aware: bool) -> Self {
        self.join_aware = join_aware;
        self
    }

    #[must_use]
    pub fn build(self) -> GridColumns {
        GridColumns {
            filterable: self.filterable,
            sortable: self.sortable,
            searchable: self.searchable,
            join_aware: self.join_aware,
        }
    }
}
