// Query parameters shared by outbound requests and shareable UI URLs.
// Also holds the paging/search/filter state that feeds them.

use std::fmt;

use url::form_urlencoded;

pub const PARAM_PAGE_INDEX: &str = "pageIndex";
pub const PARAM_PAGE_SIZE: &str = "pageSize";
pub const PARAM_SORT_DIRECTION: &str = "sortDirection";
pub const PARAM_SEARCH: &str = "searchQuery";
pub const SORT_ASCENDING: &str = "asc";

/// Ordered key/value query parameters, serialized form-urlencoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, with or without a leading `?`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    /// Insert or replace a key. The first occurrence keeps its position and
    /// any duplicates are dropped.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(index) => {
                self.pairs[index].1 = value;
                let mut seen = 0;
                self.pairs.retain(|(k, _)| {
                    if k != key {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    /// Append a pair without replacing existing keys.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Remove every occurrence of a key. Missing keys are ignored.
    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl FromIterator<(String, String)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// Paging, search, and filter state for a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    /// Current page, 1-based.
    pub current_page: u32,
    /// Total pages reported by the server, at least 1.
    pub pages_count: u32,
    pub search_query: String,
    /// Column names usable as filters, derived from the first loaded row.
    pub available_filters: Vec<String>,
    /// Additional parameters (search, column filters, sort).
    pub params: QueryParams,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            current_page: 1,
            pages_count: 1,
            search_query: String::new(),
            available_filters: Vec::new(),
            params: QueryParams::new(),
        }
    }
}

impl QueryState {
    /// Clamp a requested page into `[1, pages_count]`.
    pub fn clamp_page(&self, page: i64) -> u32 {
        let last = i64::from(self.pages_count.max(1));
        page.clamp(1, last) as u32
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page <= 1
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page >= self.pages_count
    }

    /// Parameters for a list request. Paging and sort keys always override
    /// colliding additional parameters.
    pub fn request_params(&self, page_size: u32) -> QueryParams {
        let mut params = self.params.clone();
        params.set(PARAM_PAGE_INDEX, self.current_page.to_string());
        params.set(PARAM_PAGE_SIZE, page_size.to_string());
        params.set(PARAM_SORT_DIRECTION, SORT_ASCENDING);
        params
    }

    /// Record a new page count from the server and keep the current page in range.
    pub fn set_pages_count(&mut self, pages: u32) {
        self.pages_count = pages.max(1);
        self.current_page = self.current_page.clamp(1, self.pages_count);
    }
}
