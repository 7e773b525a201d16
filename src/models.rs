use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use utoipa::ToSchema;

use crate::pagination::Paging;

/// A grid request as sent by a list endpoint client.
///
/// `filter` is a list of OR-groups: conditions inside one group are combined
/// with OR, the groups themselves with AND. An empty list applies no filtering.
///
/// ```json
/// {
///   "filter": [[{"column": "id", "operator": "EQ", "value": ["2"]},
///               {"column": "id", "operator": "EQ", "value": ["3"]}]],
///   "sorter": [{"column": "name", "direction": "DESC"}],
///   "search": "alpha",
///   "paging": {"page": 1, "itemsPerPage": 10}
/// }
/// ```
///
/// `additionalFilter` and `additionalSorter` are meant to be filled in by the
/// server before the request reaches the grid: they are appended after the
/// caller's entries and are not echoed back in the response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GridRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Vec<Vec<FilterCondition>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_filter: Option<Vec<Vec<FilterCondition>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorter: Option<Vec<Sorter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_sorter: Option<Vec<Sorter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
    /// Free-form data for the grid's base query; never interpreted here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub extras: Option<HashMap<String, serde_json::Value>>,
}

impl GridRequest {
    /// Caller groups followed by the server-supplied ones, as an owned copy.
    #[must_use]
    pub fn filters(&self) -> Vec<Vec<FilterCondition>> {
        self.filter
            .iter()
            .chain(self.additional_filter.iter())
            .flatten()
            .cloned()
            .collect()
    }

    /// Caller sorters followed by the server-supplied ones, as an owned copy.
    #[must_use]
    pub fn sorters(&self) -> Vec<Sorter> {
        self.sorter
            .iter()
            .chain(self.additional_sorter.iter())
            .flatten()
            .cloned()
            .collect()
    }

    /// Search text, if present and not blank.
    #[must_use]
    pub fn search_text(&self) -> Option<&str> {
        self.search.as_deref().filter(|text| !text.is_empty())
    }

    /// Paging clamped to valid values, `(1, 10)` when absent.
    #[must_use]
    pub fn paging(&self) -> Paging {
        self.paging.unwrap_or_default().normalized()
    }

    /// Append a mandatory OR-group the caller cannot override.
    #[must_use]
    pub fn with_additional_filter(mut self, group: Vec<FilterCondition>) -> Self {
        self.additional_filter.get_or_insert_with(Vec::new).push(group);
        self
    }

    /// Append a sorter applied after all caller-supplied ones.
    #[must_use]
    pub fn with_additional_sorter(mut self, sorter: Sorter) -> Self {
        self.additional_sorter.get_or_insert_with(Vec::new).push(sorter);
        self
    }
}

/// One `column <operator> values` condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FilterCondition {
    pub column: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: Vec<String>,
}

impl FilterCondition {
    pub fn new<I, V>(column: impl Into<String>, operator: Operator, value: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            column: column.into(),
            operator,
            value: value.into_iter().map(Into::into).collect(),
        }
    }
}

/// Comparison operators accepted in a [`FilterCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    /// Equality (=)
    Eq,
    /// Not equal (!=)
    Neq,
    /// IN (one or more values)
    In,
    /// NOT IN (one or more values)
    Nin,
    /// Greater than (>)
    Gt,
    /// Less than (<)
    Lt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than or equal (<=)
    Lte,
    /// Contains (`%value%`)
    Like,
    /// Prefix (`value%`)
    Starts,
    /// Suffix (`%value`)
    Ends,
    /// IS NOT NULL
    Nempty,
    /// IS NULL
    Empty,
    /// Inclusive range
    Between,
    /// Outside an inclusive range
    Nbetween,
}

impl Operator {
    /// Minimum number of values the operator needs.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Nempty | Self::Empty => 0,
            Self::Between | Self::Nbetween => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "EQ",
            Self::Neq => "NEQ",
            Self::In => "IN",
            Self::Nin => "NIN",
            Self::Gt => "GT",
            Self::Lt => "LT",
            Self::Gte => "GTE",
            Self::Lte => "LTE",
            Self::Like => "LIKE",
            Self::Starts => "STARTS",
            Self::Ends => "ENDS",
            Self::Nempty => "NEMPTY",
            Self::Empty => "EMPTY",
            Self::Between => "BETWEEN",
            Self::Nbetween => "NBETWEEN",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort entry: a column alias and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Sorter {
    pub column: String,
    pub direction: Direction,
}

impl Sorter {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Direction {
    #[serde(rename = "ASC", alias = "asc", alias = "Asc")]
    Asc,
    #[serde(rename = "DESC", alias = "desc", alias = "Desc")]
    Desc,
}

impl From<Direction> for sea_orm::Order {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => Self::Asc,
            Direction::Desc => Self::Desc,
        }
    }
}
