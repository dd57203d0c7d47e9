//! Shared pagination types for API query parameters.

use serde::Deserialize;
use utoipa::IntoParams;

/// Default number of items to return per page.
pub const DEFAULT_LIMIT: usize = 10;

/// Maximum number of items that can be requested per page.
pub const MAX_LIMIT: usize = 100;

/// Offset-based pagination with `skip` and `limit` parameters.
///
/// The `limit` is clamped to ensure it's always between 1 and [`MAX_LIMIT`],
/// preventing both zero-result queries and excessive data fetching.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct Pagination {
    /// Number of items to skip (default: 0)
    #[param(default = 0, minimum = 0)]
    pub skip: Option<usize>,

    /// Maximum number of items to return (default: 10, max: 100)
    #[param(default = 10, minimum = 1, maximum = 100)]
    pub limit: Option<usize>,
}

impl Pagination {
    /// Get the skip value, defaulting to 0 if not specified.
    #[inline]
    pub fn skip(&self) -> usize {
        self.skip.unwrap_or(0)
    }

    /// Get the limit value, clamped between 1 and [`MAX_LIMIT`].
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped() {
        let wide_open = Pagination {
            skip: None,
            limit: Some(10_000),
        };
        assert_eq!(wide_open.limit(), MAX_LIMIT);

        let zero = Pagination {
            skip: None,
            limit: Some(0),
        };
        assert_eq!(zero.limit(), 1);

        let defaults = Pagination::default();
        assert_eq!(defaults.skip(), 0);
        assert_eq!(defaults.limit(), DEFAULT_LIMIT);
    }
}
