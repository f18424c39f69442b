//! Page-number pagination over newest-first listings.

use serde::Serialize;

/// The slice of a collection a page covers, resolved from a raw `?page=` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub per_page: u64,
}

impl PageWindow {
    /// Resolve a requested page against a collection of `count` items.
    ///
    /// Missing or non-numeric input selects the first page. Numbers past the
    /// end, and numbers below one, select the last page. An empty collection
    /// still has a single empty page.
    pub fn resolve(raw: Option<&str>, count: u64, per_page: u64) -> Self {
        let per_page = per_page.max(1);
        let num_pages = count.div_ceil(per_page).max(1);

        let number = match raw.map(str::trim).map(str::parse::<i64>) {
            Some(Ok(n)) if n >= 1 && (n as u64) <= num_pages => n as u64,
            Some(Ok(_)) => num_pages,
            Some(Err(_)) | None => 1,
        };

        Self {
            number,
            num_pages,
            count,
            per_page,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }

    /// Attach the loaded items.
    pub fn with_items<T>(self, object_list: Vec<T>) -> Page<T> {
        Page {
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            per_page: self.per_page,
            has_next: self.number < self.num_pages,
            has_previous: self.number > 1,
            object_list,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub per_page: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub object_list: Vec<T>,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            per_page: self.per_page,
            has_next: self.has_next,
            has_previous: self.has_previous,
            object_list: self.object_list.into_iter().map(f).collect(),
        }
    }
}
