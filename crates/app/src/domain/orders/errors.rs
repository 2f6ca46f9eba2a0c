//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{orders::status::OrderStatus, products::records::ProductUuid};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order not found")]
    NotFound,

    #[error("order already exists")]
    AlreadyExists,

    #[error("account not found")]
    AccountNotFound,

    #[error("product {0} not found")]
    ProductNotFound(ProductUuid),

    #[error("Not enough stock for {name}. Requested: {requested}, available: {available}")]
    InsufficientStock {
        product: ProductUuid,
        name: String,
        requested: u32,
        available: u32,
    },

    #[error("order must contain at least one item")]
    EmptyOrder,

    #[error("quantity for product {0} must be at least 1")]
    InvalidQuantity(ProductUuid),

    #[error("shipping address is missing {0}")]
    IncompleteShippingAddress(&'static str),

    #[error("order total {declared} does not match computed total {computed}")]
    TotalMismatch { declared: u64, computed: u64 },

    #[error("cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("order belongs to another account")]
    Forbidden,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data: {0}")]
    InvalidData(&'static str),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData("constraint violated"),
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
