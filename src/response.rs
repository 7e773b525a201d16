use serde::{Deserialize, Serialize};

use crate::models::{FilterCondition, GridRequest, Sorter};
use crate::pagination::PagingMetadata;

/// Rows of one page plus the request fields they were produced from.
///
/// `filter`, `sorter` and `search` are echoed from the caller unmodified;
/// server-supplied additional filters and sorters are not part of the echo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridResponse<T> {
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Vec<Vec<FilterCondition>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorter: Option<Vec<Sorter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub paging: PagingMetadata,
}

impl<T> GridResponse<T> {
    /// Paging is computed from the request's normalized values, not the raw input.
    pub fn new(items: Vec<T>, total: u64, request: &GridRequest) -> Self {
        Self {
            items,
            filter: request.filter.clone(),
            sorter: request.sorter.clone(),
            search: request.search.clone(),
            paging: PagingMetadata::calculate(request.paging(), total),
        }
    }

    /// Convert the rows, e.g. from entity models into API models.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> GridResponse<U> {
        GridResponse {
            items: self.items.into_iter().map(f).collect(),
            filter: self.filter,
            sorter: self.sorter,
            search: self.search,
            paging: self.paging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Operator;
    use crate::pagination::Paging;

    #[test]
    fn test_echoes_request_and_normalizes_paging() {
        let request = GridRequest {
            filter: Some(vec![vec![FilterCondition::new("id", Operator::Gt, ["1"])]]),
            sorter: Some(vec![Sorter::desc("id")]),
            search: Some("abc".to_string()),
            paging: Some(Paging::new(0, -3)),
            ..Default::default()
        }
        .with_additional_filter(vec![FilterCondition::new("tenant", Operator::Eq, ["1"])]);

        let response = GridResponse::new(vec![1, 2], 2, &request);

        assert_eq!(response.filter, request.filter);
        assert_eq!(response.sorter, request.sorter);
        assert_eq!(response.search.as_deref(), Some("abc"));
        assert_eq!(response.paging.page, 1);
        assert_eq!(response.paging.items_per_page, 1);
        assert_eq!(response.paging.last_page, 2);
    }

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let response = GridResponse::new(vec!["a"], 1, &GridRequest::default());
        let value = serde_json::to_value(&response).unwrap();

        assert!(value.get("filter").is_none());
        assert!(value.get("sorter").is_none());
        assert!(value.get("search").is_none());
        assert_eq!(value["items"][0], "a");
        assert_eq!(value["paging"]["total"], 1);
    }

    #[test]
    fn test_map_keeps_paging() {
        let response = GridResponse::new(vec![1, 2, 3], 13, &GridRequest::default());
        let mapped = response.map(|n| n * 10);
        assert_eq!(mapped.items, vec![10, 20, 30]);
        assert_eq!(mapped.paging.last_page, 2);
    }
}
