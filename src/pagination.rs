use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_ITEMS_PER_PAGE: i64 = 10;

/// Largest offset or limit a SQL driver accepts as a bound `BIGINT`.
const MAX_ROWS: u64 = i64::MAX.unsigned_abs();

/// Requested page (1-based) and page size.
///
/// Values are signed on the wire so that `0` or negative input can be clamped
/// by [`Paging::normalized`] instead of failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: i64,
}

const fn default_page() -> i64 {
    DEFAULT_PAGE
}

const fn default_items_per_page() -> i64 {
    DEFAULT_ITEMS_PER_PAGE
}

impl Default for Paging {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_ITEMS_PER_PAGE)
    }
}

impl Paging {
    #[must_use]
    pub const fn new(page: i64, items_per_page: i64) -> Self {
        Self {
            page,
            items_per_page,
        }
    }

    /// Clamp both values to at least 1. Never rejects.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self::new(self.page.max(1), self.items_per_page.max(1))
    }

    #[must_use]
    pub fn page_number(self) -> u64 {
        positive(self.page)
    }

    #[must_use]
    pub fn limit(self) -> u64 {
        positive(self.items_per_page)
    }

    /// Rows to skip: `(page - 1) * itemsPerPage`, capped at `i64::MAX`.
    #[must_use]
    pub fn offset(self) -> u64 {
        (self.page_number() - 1)
            .saturating_mul(self.limit())
            .min(MAX_ROWS)
    }
}

fn positive(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0).max(1)
}

/// Paging block returned next to the items of a grid response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagingMetadata {
    pub page: u64,
    pub items_per_page: u64,
    pub total: u64,
    pub next_page: u64,
    pub last_page: u64,
    pub previous_page: u64,
}

impl PagingMetadata {
    /// Compute the paging block for `total` matching rows.
    ///
    /// `last_page` is never below 1, so an empty result still reports
    /// page 1 of 1 and `next_page`/`previous_page` stay well-defined.
    #[must_use]
    pub fn new(page: u64, items_per_page: u64, total: u64) -> Self {
        let page = page.max(1);
        let items_per_page = items_per_page.max(1);
        let last_page = total.div_ceil(items_per_page).max(1);

        Self {
            page,
            items_per_page,
            total,
            next_page: page.saturating_add(1).min(last_page),
            last_page,
            previous_page: page.saturating_sub(1).max(1),
        }
    }

    #[must_use]
    pub fn calculate(paging: Paging, total: u64) -> Self {
        Self::new(paging.page_number(), paging.limit(), total)
    }
}
