//! Page/offset pagination shared by every resource listing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound applied when configuration does not say otherwise.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw listing parameters as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub keyword: Option<String>,
}

impl PageQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            keyword: None,
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Validate the query and turn it into a concrete window.
    ///
    /// Zero values are rejected, oversized pages are clamped to `max_page_size`
    /// and a blank keyword is dropped.
    pub fn resolve(
        &self,
        default_page_size: u32,
        max_page_size: u32,
    ) -> Result<PageWindow, PaginationError> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(PaginationError::ZeroPage);
        }

        let page_size = self.page_size.unwrap_or(default_page_size);
        if page_size == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        let page_size = page_size.min(max_page_size.max(1));

        let keyword = self
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Ok(PageWindow {
            page,
            page_size,
            keyword,
        })
    }
}

/// A validated page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub page_size: u32,
    pub keyword: Option<String>,
}

impl PageWindow {
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u32 {
        self.page_size
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

/// One page of results together with the position it was cut from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub list: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(list: Vec<T>, window: &PageWindow, total: u64) -> Self {
        Self {
            list,
            pagination: PaginationMeta {
                page: window.page,
                page_size: window.page_size,
                total,
            },
        }
    }

    pub fn empty(window: &PageWindow, total: u64) -> Self {
        Self::new(Vec::new(), window, total)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("page must be at least 1")]
    ZeroPage,
    #[error("pageSize must be at least 1")]
    ZeroPageSize,
}
