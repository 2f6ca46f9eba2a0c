//! Pagination response metadata shared by listing endpoints.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use storefront_app::domain::pagination::Page;

#[derive(Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub(crate) struct PaginationResponse {
    /// Number of matching records across every page
    pub total: u64,

    /// 1-based page number
    pub page: u32,

    /// Page size
    pub limit: u32,

    /// Number of pages needed to show every record
    pub pages: u64,
}

impl<T> From<&Page<T>> for PaginationResponse {
    fn from(page: &Page<T>) -> Self {
        PaginationResponse {
            total: page.total,
            page: page.request.page(),
            limit: page.request.limit(),
            pages: page.pages(),
        }
    }
}
