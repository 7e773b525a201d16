//! # Filtering, search & sorting
//!
//! Turns the filter groups, search text and sorters of a
//! [`GridRequest`](crate::models::GridRequest) into Sea-Query conditions and
//! orderings, and applies them to any [`Queryable`](crate::core::Queryable).
//!
//! ## Composition
//!
//! - Conditions inside one group are combined with `OR`
//! - Groups are combined with `AND`, including the search group
//! - Sorters apply in order, the first one being the primary key
//!
//! ```rust,ignore
//! // (status = 'open' OR status = 'pending') AND priority > 3
//! {
//!   "filter": [
//!     [
//!       { "column": "status", "operator": "EQ", "value": ["open"] },
//!       { "column": "status", "operator": "EQ", "value": ["pending"] }
//!     ],
//!     [{ "column": "priority", "operator": "GT", "value": ["3"] }]
//!   ]
//! }
//! ```
//!
//! ## Column safety
//!
//! Column aliases are looked up in a [`GridColumns`] allow-list; anything
//! unlisted fails with [`GridError::NotAllowed`](crate::errors::GridError)
//! before SQL is built. Values are always bound as parameters.

mod columns;
mod conditions;
mod expression;
pub mod joined;
mod search;
mod sort;

pub use columns::{
    FilterCallback, FilterColumn, GridColumns, GridColumnsBuilder, PhysicalColumn, SortCallback,
    SortColumn, parse_qualified,
};
pub use conditions::apply_filters;
pub use expression::{ValueType, build_expression, build_typed_expression, contains_ignore_case};
pub use search::build_search_group;
pub use sort::apply_sorters;
