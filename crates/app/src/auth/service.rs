//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;

use crate::auth::{
    AuthServiceError, Principal, credential_hash, parse_api_token, repository::PgAuthRepository,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError> {
        let Ok(secret) = parse_api_token(bearer_token) else {
            return Err(AuthServiceError::NotFound);
        };

        self.repository
            .find_principal_by_credential_hash(&credential_hash(&secret))
            .await?
            .ok_or(AuthServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a raw bearer token to the account it was issued for.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::register};

    use super::*;

    #[tokio::test]
    async fn issued_token_resolves_to_its_account() -> TestResult {
        let ctx = TestContext::new().await;
        let registered = register(&ctx, "ada", false).await?;

        let principal = ctx.auth.authenticate_bearer(&registered.token).await?;

        assert_eq!(principal.account, registered.account.uuid);
        assert!(!principal.is_admin);

        Ok(())
    }

    #[tokio::test]
    async fn admin_flag_is_carried_on_the_principal() -> TestResult {
        let ctx = TestContext::new().await;
        let registered = register(&ctx, "root", true).await?;

        let principal = ctx.auth.authenticate_bearer(&registered.token).await?;

        assert!(principal.is_admin);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_token_is_not_found() {
        let ctx = TestContext::new().await;
        let token = crate::auth::issue_api_token().token;

        let result = ctx.auth.authenticate_bearer(&token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn malformed_token_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.auth.authenticate_bearer("not-a-token").await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
