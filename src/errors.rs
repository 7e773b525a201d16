//! # Grid Errors
//!
//! Two kinds of failure can come out of a grid:
//!
//! - **Request errors** (`NotAllowed`, `MissingValue`, `InvalidValue`) are
//!   raised while the filters and sorters are translated, before any database round trip. They
//!   map to `400 Bad Request` and carry a message safe to show to the caller.
//! - **Database errors** are propagated from the backend unchanged and are
//!   never retried. They map to `500 Internal Server Error`; the details are
//!   logged through `tracing` and not sent to the caller.
//!
//! ```rust,ignore
//! async fn list(State(db): State<DatabaseConnection>, Json(request): Json<GridRequest>)
//!     -> Result<Json<GridResponse<item::Model>>, GridError>
//! {
//!     Ok(Json(ItemGrid::default().filter(&db, &request).await?))
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

use crate::filtering::ValueType;
use crate::models::Operator;

/// Which allow-list rejected a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnUsage {
    Filter,
    Sort,
}

impl ColumnUsage {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Filter => "filtering",
            Self::Sort => "sorting",
        }
    }
}

#[derive(Debug)]
pub enum GridError {
    /// 400 - the alias is absent from the configured allow-list
    NotAllowed {
        column: String,
        usage: ColumnUsage,
    },

    /// 400 - the operator got fewer values than it needs
    MissingValue {
        operator: Operator,
        /// Position of the first missing value (0-based)
        index: usize,
    },

    /// 400 - a value does not parse as the column's declared type
    InvalidValue {
        operator: Operator,
        value: String,
        expected: ValueType,
    },

    /// 500 - backend failure (details logged, not exposed)
    Database(DbErr),
}

impl GridError {
    pub fn not_allowed(column: impl Into<String>, usage: ColumnUsage) -> Self {
        Self::NotAllowed {
            column: column.into(),
            usage,
        }
    }

    #[must_use]
    pub const fn missing_value(operator: Operator, index: usize) -> Self {
        Self::MissingValue { operator, index }
    }

    pub fn invalid_value(operator: Operator, value: impl Into<String>, expected: ValueType) -> Self {
        Self::InvalidValue {
            operator,
            value: value.into(),
            expected,
        }
    }

    /// True for errors caused by the request rather than the backend.
    #[must_use]
    pub const fn is_request_error(&self) -> bool {
        !matches!(self, Self::Database(_))
    }

    fn status_code(&self) -> StatusCode {
        if self.is_request_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// Message sent to the client.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotAllowed { column, usage } => {
                format!("[{column}] is not allowed for {}", usage.as_str())
            }
            Self::MissingValue { operator, index } => {
                format!("Operator {operator}: missing value at position {}", index + 1)
            }
            Self::InvalidValue {
                operator,
                value,
                expected,
            } => format!("Operator {operator}: [{value}] is not a valid {expected}"),
            Self::Database(_) => "A database error occurred".to_string(),
        }
    }

    fn log(&self) {
        match self {
            Self::Database(internal) => {
                tracing::error!(error = ?internal, "Database error while running grid query");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "Grid request rejected"
                );
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for GridError {
    fn into_response(self) -> Response {
        self.log();

        let body = ErrorResponse {
            error: self.user_message(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Display is for server logs, so the backend detail is kept here
            Self::Database(err) => write!(f, "database error: {err}"),
            _ => f.write_str(&self.user_message()),
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbErr> for GridError {
    fn from(err: DbErr) -> Self {
        Self::Database(err)
    }
}
