use async_trait::async_trait;
use sea_orm::{Condition, DatabaseConnection, DbErr, Order, sea_query::SimpleExpr};

use crate::errors::GridError;
use crate::filtering::{GridColumns, apply_filters, apply_sorters};
use crate::models::GridRequest;
use crate::response::GridResponse;

/// What a storage backend has to offer for a grid to drive it.
///
/// Predicates and orderings arrive as Sea-Query expressions, which every
/// backend renders for its own dialect with bound parameters. The grid only
/// ever talks to this trait, never to a concrete backend type.
#[async_trait]
pub trait Queryable: Sized + Send + Sync {
    type Row: Send + 'static;

    /// AND `condition` into the root `WHERE`.
    fn filter(&mut self, condition: Condition);

    /// Whether `scope` names a joined table whose `ON` clause accepts predicates.
    fn has_scope(&self, _scope: &str) -> bool {
        false
    }

    /// AND `condition` into the `ON` clause of the join named `scope`.
    ///
    /// Backends without join scopes fall back to the root `WHERE`.
    fn filter_scope(&mut self, _scope: &str, condition: Condition) {
        self.filter(condition);
    }

    fn order_by(&mut self, expr: SimpleExpr, order: Order);

    fn paginate(&mut self, offset: u64, limit: u64);

    /// Number of rows matching the filters, ignoring order and paging.
    async fn count(&self, db: &DatabaseConnection) -> Result<u64, DbErr>;

    async fn fetch(self, db: &DatabaseConnection) -> Result<Vec<Self::Row>, DbErr>;
}

/// Rows produced by a grid.
pub type GridRow<G> = <<G as Grid>::Query as Queryable>::Row;

/// A list endpoint: an allow-list of columns plus the query it runs against.
///
/// ```rust,ignore
/// struct ItemGrid {
///     columns: GridColumns,
/// }
///
/// impl Grid for ItemGrid {
///     type Query = EntityQuery<item::Entity>;
///
///     fn columns(&self) -> &GridColumns {
///         &self.columns
///     }
///
///     fn query(&self, _request: &GridRequest) -> Self::Query {
///         EntityQuery::new(item::Entity::find())
///     }
/// }
///
/// let response = grid.filter(&db, &request).await?;
/// ```
#[async_trait]
pub trait Grid: Send + Sync {
    type Query: Queryable;

    fn columns(&self) -> &GridColumns;

    /// Base query the request's filters, sorters and paging are applied to.
    fn query(&self, request: &GridRequest) -> Self::Query;

    /// Base query with filters, search and sorters applied.
    ///
    /// Every column and value check happens here, so a rejected request
    /// never reaches the database.
    fn prepare(&self, request: &GridRequest) -> Result<Self::Query, GridError> {
        let mut query = self.query(request);
        apply_filters(
            &mut query,
            self.columns(),
            &request.filters(),
            request.search_text(),
        )?;
        apply_sorters(&mut query, self.columns(), &request.sorters())?;
        Ok(query)
    }

    /// Run the request: count the matching rows, then fetch the requested page.
    ///
    /// A page starting past `total` is answered without the second query.
    /// The two round trips are not wrapped in a transaction; concurrent writes
    /// in between can make `total` disagree with the returned page.
    async fn filter(
        &self,
        db: &DatabaseConnection,
        request: &GridRequest,
    ) -> Result<GridResponse<GridRow<Self>>, GridError> {
        let mut query = self.prepare(request)?;
        let total = query.count(db).await?;

        let paging = request.paging();
        let items = if paging.offset() >= total {
            Vec::new()
        } else {
            query.paginate(paging.offset(), paging.limit());
            query.fetch(db).await?
        };

        tracing::debug!(total, returned = items.len(), page = paging.page, "Grid query finished");

        Ok(GridResponse::new(items, total, request))
    }
}
