use axum::{Json, Router, extract::State, routing::post};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;

use crate::core::{Grid, GridRow};
use crate::errors::GridError;
use crate::models::GridRequest;
use crate::response::GridResponse;

/// Shared state of a grid endpoint.
pub struct GridState<G> {
    pub db: DatabaseConnection,
    pub grid: Arc<G>,
}

impl<G> Clone for GridState<G> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            grid: Arc::clone(&self.grid),
        }
    }
}

/// `POST` handler: run the posted [`GridRequest`] against the grid.
pub async fn grid_handler<G>(
    State(state): State<GridState<G>>,
    Json(request): Json<GridRequest>,
) -> Result<Json<GridResponse<GridRow<G>>>, GridError>
where
    G: Grid + 'static,
    GridRow<G>: Serialize,
{
    let response = state.grid.filter(&state.db, &request).await?;
    Ok(Json(response))
}

/// Router serving `grid` at `POST /`. Nest it wherever the list lives:
///
/// ```rust,ignore
/// let app = Router::new().nest("/api/items/grid", grid_router(ItemGrid::new(), db));
/// ```
pub fn grid_router<G>(grid: G, db: DatabaseConnection) -> Router
where
    G: Grid + 'static,
    GridRow<G>: Serialize,
{
    Router::new()
        .route("/", post(grid_handler::<G>))
        .with_state(GridState {
            db,
            grid: Arc::new(grid),
        })
}
