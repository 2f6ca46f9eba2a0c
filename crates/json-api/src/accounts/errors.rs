//! Account Errors

use salvo::http::StatusError;
use tracing::error;

use storefront_app::domain::accounts::AccountsServiceError;

pub(crate) fn into_status_error(error: AccountsServiceError) -> StatusError {
    match error {
        AccountsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Username or email already registered")
        }
        AccountsServiceError::NotFound => StatusError::not_found().brief("Account not found"),
        AccountsServiceError::Forbidden => {
            StatusError::forbidden().brief("Account belongs to someone else")
        }
        AccountsServiceError::HasOrders => {
            StatusError::conflict().brief("Account has placed orders and cannot be deleted")
        }
        AccountsServiceError::InvalidReference | AccountsServiceError::MissingRequiredData => {
            StatusError::bad_request().brief("Invalid account payload")
        }
        AccountsServiceError::InvalidData(reason) => StatusError::bad_request().brief(reason),
        AccountsServiceError::Sql(source) => {
            error!("account storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn service_errors_map_to_http_statuses() {
        let cases = [
            (AccountsServiceError::AlreadyExists, StatusCode::CONFLICT),
            (AccountsServiceError::NotFound, StatusCode::NOT_FOUND),
            (AccountsServiceError::Forbidden, StatusCode::FORBIDDEN),
            (AccountsServiceError::HasOrders, StatusCode::CONFLICT),
            (AccountsServiceError::MissingRequiredData, StatusCode::BAD_REQUEST),
            (
                AccountsServiceError::InvalidData("email must not be empty"),
                StatusCode::BAD_REQUEST,
            ),
            (
                AccountsServiceError::Sql(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(into_status_error(error).code, expected);
        }
    }

    #[test]
    fn invalid_data_carries_the_reason() {
        let error = into_status_error(AccountsServiceError::InvalidData("email must not be empty"));

        assert_eq!(error.brief, "email must not be empty");
    }
}
