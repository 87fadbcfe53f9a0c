// Cursor-based pagination
//
// The cursor is the id of the last item of the previous page. Items are
// ordered newest first (created_at DESC, id DESC). Storage fetches
// `limit + 1` rows so the presence of a next page is known without a count.

use serde::Deserialize;
use uuid::Uuid;

/// Default page size when the client does not ask for one
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Largest page a client can request
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Query parameters accepted by paginated list endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    /// Id of the last item of the previous page.
    #[serde(default)]
    pub cursor: Option<Uuid>,
    /// Page size (default 20, max 100).
    #[serde(default)]
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.cursor, self.limit)
    }
}

/// Normalized page request handed to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub cursor: Option<Uuid>,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(cursor: Option<Uuid>, limit: Option<u32>) -> Self {
        let limit = limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT);
        Self { cursor, limit }
    }

    /// Number of rows storage should fetch to detect a following page.
    pub fn fetch_limit(&self) -> i64 {
        i64::from(self.limit) + 1
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<Uuid>,
}

impl<T> Page<T> {
    /// Build a page from an over-fetched row set (at most `limit + 1` rows).
    pub fn from_overfetch(mut rows: Vec<T>, request: PageRequest, id_of: impl Fn(&T) -> Uuid) -> Self {
        let limit = request.limit as usize;
        let has_more = rows.len() > limit;
        rows.truncate(limit);
        let next_cursor = if has_more { rows.last().map(&id_of) } else { None };
        Self {
            items: rows,
            next_cursor,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(PageRequest::new(None, None).limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(PageRequest::new(None, Some(0)).limit, 1);
        assert_eq!(PageRequest::new(None, Some(5000)).limit, MAX_PAGE_LIMIT);
        assert_eq!(PageRequest::new(None, Some(7)).fetch_limit(), 8);
    }

    #[test]
    fn test_from_overfetch_sets_cursor_only_when_more() {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::now_v7()).collect();
        let request = PageRequest::new(None, Some(3));

        let page = Page::from_overfetch(ids.clone(), request, |id| *id);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.next_cursor, Some(ids[2]));

        let page = Page::from_overfetch(ids[..3].to_vec(), request, |id| *id);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn test_page_query_deserialize() {
        let query: PageQuery = serde_json::from_str(r#"{"limit": 10}"#).unwrap();
        assert_eq!(query.request().limit, 10);
        assert!(query.cursor.is_none());
    }
}
