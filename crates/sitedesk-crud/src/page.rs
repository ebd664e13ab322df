// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Zero-based pagination with page-index clamping.

use sitedesk_config::model::ListingConfig;
use sitedesk_core::{SitedeskError, ValidationErrors};

/// The slice `[page * page_size, page * page_size + page_size)` of `records`.
///
/// Empty for a page past the end or a zero page size.
pub fn paginate<T>(records: &[T], page: usize, page_size: usize) -> &[T] {
    let Some(start) = page.checked_mul(page_size) else {
        return &[];
    };
    if start >= records.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(records.len());
    &records[start..end]
}

/// Index of the last non-empty page, `max(0, ceil(count / page_size) - 1)`.
pub fn last_page(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size).saturating_sub(1)
}

/// Page position of one list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page: usize,
    page_size: usize,
    options: Vec<usize>,
}

impl Pager {
    pub fn new(config: &ListingConfig) -> Self {
        Self {
            page: 0,
            page_size: config.page_size,
            options: config.page_size_options.clone(),
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn options(&self) -> &[usize] {
        &self.options
    }

    /// Jump to `page`, clamped to the last page holding any of `count` rows.
    pub fn set_page(&mut self, page: usize, count: usize) {
        self.page = page.min(last_page(count, self.page_size));
    }

    /// Switch page size and go back to the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), SitedeskError> {
        if !self.options.contains(&page_size) {
            let mut errors = ValidationErrors::new();
            errors.add(
                "pageSize",
                format!("Rows per page must be one of {:?}", self.options),
            );
            return Err(errors.into());
        }
        self.page_size = page_size;
        self.page = 0;
        Ok(())
    }

    /// Pull the page index back after the row count shrank.
    pub fn clamp(&mut self, count: usize) {
        self.page = self.page.min(last_page(count, self.page_size));
    }

    /// The current page of `records`.
    pub fn slice<'a, T>(&self, records: &'a [T]) -> &'a [T] {
        paginate(records, self.page, self.page_size)
    }
}
