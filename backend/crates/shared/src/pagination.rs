//! Page/limit pagination
//!
//! `?page=N&limit=M` query parameters resolved into an offset window, and the
//! `{count, next, previous, results}` envelope returned by list endpoints.

use serde::{Deserialize, Serialize};

use crate::error::app_error::{AppError, AppResult};

/// Raw pagination parameters from the query string
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    /// Resolve into a concrete window
    ///
    /// `page` is 1-based; page 0 is rejected with 404. A missing or zero
    /// `limit` falls back to `default_limit`, larger values are capped at
    /// `max_limit`.
    pub fn resolve(&self, default_limit: u32, max_limit: u32) -> AppResult<PageRequest> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::not_found("Invalid page."));
        }

        let limit = match self.limit {
            Some(0) | None => default_limit,
            Some(limit) => limit.min(max_limit),
        };

        Ok(PageRequest { page, limit })
    }
}

/// A validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// SQL `LIMIT`
    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }

    /// SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }
}

/// Paginated response envelope
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Build the envelope for one window of `count` total rows
    ///
    /// `path` and `query` come from the request URI so that `next` and
    /// `previous` keep any filter parameters. A page past the end (other than
    /// the first) is a 404.
    pub fn new(
        results: Vec<T>,
        count: i64,
        request: &PageRequest,
        path: &str,
        query: Option<&str>,
    ) -> AppResult<Self> {
        if request.page > 1 && request.offset() >= count {
            return Err(AppError::not_found("Invalid page."));
        }

        let shown = request.offset() + results.len() as i64;
        let next = (shown < count).then(|| page_link(path, query, Some(request.page + 1)));
        let previous = match request.page {
            1 => None,
            2 => Some(page_link(path, query, None)),
            page => Some(page_link(path, query, Some(page - 1))),
        };

        Ok(Self {
            count,
            next,
            previous,
            results,
        })
    }
}

/// Rebuild `path?query` with the `page` parameter replaced
fn page_link(path: &str, query: Option<&str>, page: Option<u32>) -> String {
    let mut pairs: Vec<String> = query
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some("page"))
        .map(str::to_owned)
        .collect();

    if let Some(page) = page {
        pairs.push(format!("page={page}"));
    }

    if pairs.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{}", pairs.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults_and_caps() {
        let request = PageQuery::default().resolve(6, 100).unwrap();
        assert_eq!(request, PageRequest::new(1, 6));

        let query = PageQuery {
            page: Some(3),
            limit: Some(500),
        };
        let request = query.resolve(6, 100).unwrap();
        assert_eq!(request.limit(), 100);
        assert_eq!(request.offset(), 200);

        let zero_limit = PageQuery {
            page: None,
            limit: Some(0),
        };
        assert_eq!(zero_limit.resolve(6, 100).unwrap().limit(), 6);
    }

    #[test]
    fn test_page_zero_is_not_found() {
        let query = PageQuery {
            page: Some(0),
            limit: None,
        };
        assert_eq!(query.resolve(6, 100).unwrap_err().status_code(), 404);
    }

    #[test]
    fn test_links_keep_filters() {
        let request = PageRequest::new(2, 2);
        let page = Page::new(
            vec![3, 4],
            5,
            &request,
            "/api/recipes",
            Some("tags=lunch&page=2&limit=2"),
        )
        .unwrap();

        assert_eq!(
            page.next.as_deref(),
            Some("/api/recipes?tags=lunch&limit=2&page=3")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("/api/recipes?tags=lunch&limit=2")
        );
    }

    #[test]
    fn test_last_page_has_no_next() {
        let request = PageRequest::new(1, 10);
        let page = Page::new(vec!["a", "b"], 2, &request, "/api/users", None).unwrap();
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
        assert_eq!(page.count, 2);
    }

    #[test]
    fn test_page_past_end_is_not_found() {
        let request = PageRequest::new(4, 10);
        let result = Page::<i32>::new(vec![], 12, &request, "/api/users", None);
        assert_eq!(result.unwrap_err().status_code(), 404);

        let first = Page::<i32>::new(vec![], 0, &PageRequest::new(1, 10), "/api/users", None);
        assert!(first.is_ok());
    }
}
