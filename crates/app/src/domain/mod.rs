//! Storefront Domain Concerns

pub mod accounts;
pub mod orders;
pub mod pagination;
pub mod products;
