//! # gridcrate
//!
//! Server side of data-grid list endpoints on top of Sea-ORM and Axum.
//!
//! A client posts a [`GridRequest`](models::GridRequest): OR-groups of
//! column filters, sort entries, an optional free-text search and a page.
//! A [`Grid`](crate::core::Grid) checks every column against its
//! [`GridColumns`](filtering::GridColumns) allow-list, composes the
//! conditions on a [`Queryable`](crate::core::Queryable) backend, counts the
//! matches, fetches the page and answers with a
//! [`GridResponse`](response::GridResponse).
//!
//! ```rust,ignore
//! use gridcrate::{EntityQuery, Grid, GridColumns, GridRequest};
//!
//! struct ItemGrid {
//!     columns: GridColumns,
//! }
//!
//! impl Grid for ItemGrid {
//!     type Query = EntityQuery<item::Entity>;
//!
//!     fn columns(&self) -> &GridColumns {
//!         &self.columns
//!     }
//!
//!     fn query(&self, _request: &GridRequest) -> Self::Query {
//!         EntityQuery::new(item::Entity::find())
//!     }
//! }
//!
//! let grid = ItemGrid {
//!     columns: GridColumns::builder()
//!         .column("id", "id")
//!         .column("name", "name")
//!         .search(["name"])
//!         .build(),
//! };
//! let app = Router::new().nest("/items/grid", gridcrate::grid_router(grid, db));
//! ```
//!
//! ## Backends
//!
//! - [`EntityQuery`](database::EntityQuery): an entity `Select`, rows are the entity models
//! - [`TableQuery`](database::TableQuery): table aliases and joins, rows are any
//!   `FromQueryResult` type; supports join-aware filtering

pub mod core;
pub mod database;
pub mod errors;
pub mod filtering;
pub mod models;
pub mod pagination;
pub mod response;
pub mod routes;

pub use crate::core::{Grid, GridRow, Queryable};
pub use database::{EntityQuery, TableQuery, columns_equal};
pub use errors::{ColumnUsage, GridError};
pub use filtering::{GridColumns, GridColumnsBuilder, ValueType, apply_filters, apply_sorters};
pub use models::{Direction, FilterCondition, GridRequest, Operator, Sorter};
pub use pagination::{Paging, PagingMetadata};
pub use response::GridResponse;
pub use routes::grid_router;
