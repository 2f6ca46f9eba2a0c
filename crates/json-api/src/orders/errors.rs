//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::AccountNotFound | OrdersServiceError::ProductNotFound(_) => {
            StatusError::not_found().brief(error.to_string())
        }
        OrdersServiceError::InsufficientStock { .. }
        | OrdersServiceError::EmptyOrder
        | OrdersServiceError::InvalidQuantity(_)
        | OrdersServiceError::IncompleteShippingAddress(_)
        | OrdersServiceError::TotalMismatch { .. }
        | OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData(_) => StatusError::bad_request().brief(error.to_string()),
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::InvalidTransition { .. } => {
            StatusError::conflict().brief(error.to_string())
        }
        OrdersServiceError::Forbidden => {
            StatusError::forbidden().brief("Order belongs to another account")
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}
