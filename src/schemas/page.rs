//! Request-side pagination descriptor and response-side page wrapper.

use std::fmt;

use sea_orm::Order;
use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

impl From<SortOrder> for Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

/// Normalized descriptor of a listing request: page size, zero-based page
/// index and an optional sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pageable {
    pub size: u64,
    pub page: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
}

impl Pageable {
    pub fn new(size: u64, page: u64) -> Self {
        let size = if size == 0 { DEFAULT_PAGE_SIZE } else { size };
        Self {
            size,
            page,
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Parse a `field,order` sort expression; a bare `field` sorts ascending.
    pub fn with_sort_str(mut self, sort_str: &str) -> Self {
        if sort_str.is_empty() {
            return self;
        }
        match sort_str.split_once(',') {
            Some((field, order)) => {
                let order = match order {
                    "desc" => SortOrder::Desc,
                    _ => SortOrder::Asc,
                };
                self.sort = Some(Sort::new(field, order));
            }
            None => {
                self.sort = Some(Sort::new(sort_str, SortOrder::Asc));
            }
        }
        self
    }

    pub fn offset(&self) -> u64 {
        self.page * self.size
    }

    /// Cache-key identity of this listing request. The key is an explicit
    /// function of the normalized parameters, so two requests that denote
    /// the same listing always hit the same cache entry.
    pub fn fingerprint(&self) -> String {
        match &self.sort {
            Some(sort) => format!(
                "page={}&size={}&sort={},{}",
                self.page, self.size, sort.field, sort.order
            ),
            None => format!("page={}&size={}", self.page, self.size),
        }
    }
}

impl Default for Pageable {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, 0)
    }
}

/// A slice of content plus the pagination metadata it was produced under.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub pageable: Pageable,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, pageable: Pageable) -> Self {
        Self {
            content,
            pageable,
            total_elements: 0,
            total_pages: 0,
        }
    }

    /// Attach the independently-counted total. Total pages use the
    /// `total / size + 1` formula, so an exact multiple of the page size
    /// reports one trailing empty page.
    pub fn with_total(mut self, total: u64) -> Self {
        self.total_elements = total;
        self.total_pages = total / self.pageable.size.max(1) + 1;
        self
    }
}

/// Listing query parameters as they arrive on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub sort: Option<String>,
}

impl PageQuery {
    pub fn into_pageable(self) -> Pageable {
        let pageable = Pageable::new(self.size.unwrap_or(0), self.page.unwrap_or(0));
        match self.sort {
            Some(sort) => pageable.with_sort_str(&sort),
            None => pageable,
        }
    }
}
