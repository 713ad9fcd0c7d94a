//! # List Queries & Pages
//!
//! A [`ListQuery`] fully determines the next list fetch: page, page size,
//! ordering, free-text search and exact-match filters. A [`Page`] is what the
//! remote side answers with.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort order for a list: a field name, optionally descending.
///
/// Parses from and prints to the `"name"` / `"-name"` convention.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ordering {
    pub field: String,
    pub descending: bool,
}

impl Ordering {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('-') {
            Some(field) => Self::descending(field),
            None => Self::ascending(raw),
        }
    }

    /// Same field with the direction flipped.
    pub fn reversed(&self) -> Self {
        Self {
            field: self.field.clone(),
            descending: !self.descending,
        }
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "-{}", self.field)
        } else {
            f.write_str(&self.field)
        }
    }
}

/// Everything the next list fetch depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub ordering: Option<Ordering>,
    pub search: String,
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            ordering: None,
            search: String::new(),
            filters: Vec::new(),
        }
    }

    pub fn with_ordering(mut self, ordering: Ordering) -> Self {
        self.ordering = Some(ordering);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Index of the first item of this page in the full result set.
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.page_size as usize
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page_number: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn empty(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page_number: 1,
            page_size,
        }
    }

    /// Number of pages needed for `total_count` items, at least one.
    pub fn page_count(&self) -> u32 {
        let size = u64::from(self.page_size.max(1));
        (self.total_count.div_ceil(size)).max(1) as u32
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.page_count()
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }
}

/// A comparable projection of one entity field, used for ordering and filters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Number(i64),
    Text(String),
}

impl SortKey {
    pub fn text(value: impl AsRef<str>) -> Self {
        SortKey::Text(value.as_ref().to_lowercase())
    }

    /// Exact-match test against a raw filter value.
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            SortKey::Number(n) => raw.parse::<i64>().map(|v| v == *n).unwrap_or(false),
            SortKey::Text(s) => s.eq_ignore_ascii_case(raw),
        }
    }
}
