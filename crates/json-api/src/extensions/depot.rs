//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use storefront_app::auth::Principal;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Stores the authenticated caller for downstream handlers.
    fn insert_principal(&mut self, principal: Principal);

    /// The authenticated caller, or 401 when the request never passed auth.
    fn principal_or_401(&self) -> Result<Principal, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_principal(&mut self, principal: Principal) {
        self.inject(principal);
    }

    fn principal_or_401(&self) -> Result<Principal, StatusError> {
        self.obtain::<Principal>()
            .copied()
            .map_err(|_ignored| StatusError::unauthorized().brief("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use storefront_app::domain::accounts::records::AccountUuid;

    use super::*;

    #[test]
    fn principal_round_trips_through_depot() {
        let principal = Principal {
            account: AccountUuid::new(),
            is_admin: false,
        };

        let mut depot = Depot::new();

        depot.insert_principal(principal);

        assert_eq!(depot.principal_or_401().ok(), Some(principal));
    }

    #[test]
    fn missing_principal_is_unauthorized() {
        let depot = Depot::new();

        let error = depot.principal_or_401().err();

        assert_eq!(
            error.map(|error| error.code),
            Some(salvo::http::StatusCode::UNAUTHORIZED)
        );
    }
}
