//! Page-number pagination for list endpoints.

use serde::{Deserialize, Serialize};

/// Largest page size a list endpoint will serve.
pub const MAX_PER_PAGE: u32 = 100;

/// `?page=N` query parameter. Pages are 1-based.
///
/// `u32` keeps `index * per_page` well inside the `i64` offset the database
/// accepts; larger values are rejected when the query is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
        }
    }
}

impl PageRequest {
    /// Clamp `page` to ≥ 1.
    pub fn clamped(self) -> Self {
        Self {
            page: self.page.max(1),
        }
    }

    /// Zero-based page index for the storage layer.
    pub fn index(self) -> u64 {
        u64::from(self.clamped().page - 1)
    }
}

/// Clamp a configured page size to 1–[`MAX_PER_PAGE`].
pub fn clamp_per_page(per_page: u32) -> u32 {
    per_page.clamp(1, MAX_PER_PAGE)
}

/// Requested page lies past the last page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("page {page} is past the last page {last}")]
pub struct PageOutOfRange {
    pub page: u32,
    pub last: u64,
}

/// One page of results with links to its neighbours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Build a page. `base` is the list URL without query string.
    ///
    /// The first page always exists, even when `count` is zero.
    pub fn new(
        base: &str,
        req: PageRequest,
        per_page: u32,
        count: u64,
        results: Vec<T>,
    ) -> Result<Self, PageOutOfRange> {
        let page = req.clamped().page;
        let per_page = u64::from(clamp_per_page(per_page));
        let last = count.div_ceil(per_page).max(1);
        if u64::from(page) > last {
            return Err(PageOutOfRange { page, last });
        }
        let next = (u64::from(page) < last).then(|| format!("{base}?page={}", page + 1));
        let previous = match page {
            1 => None,
            2 => Some(base.to_owned()),
            p => Some(format!("{base}?page={}", p - 1)),
        };
        Ok(Self {
            count,
            next,
            previous,
            results,
        })
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
