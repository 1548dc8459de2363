//! Integration tests for the refresh token lifecycle through the public API

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rk_core::errors::{DomainError, StoreError};
    use rk_core::repositories::InMemoryClientRepository;
    use rk_core::services::{
        AccessTokenConfig, AccessTokenService, RefreshTokenStore, RefreshTokenStoreConfig,
    };

    struct Harness {
        store: RefreshTokenStore<InMemoryClientRepository>,
        access: AccessTokenService,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                store: RefreshTokenStore::new(
                    Arc::new(InMemoryClientRepository::new()),
                    RefreshTokenStoreConfig::default(),
                ),
                access: AccessTokenService::new(AccessTokenConfig::default()).unwrap(),
            }
        }

        /// Exchanges a refresh token for an access token the way the API does
        async fn exchange(&self, user_id: &str, refresh: &str) -> Result<String, DomainError> {
            self.store.validate(user_id, refresh).await?;
            Ok(self.access.mint(user_id)?.token)
        }
    }

    #[tokio::test]
    async fn test_login_refresh_logout() {
        let harness = Harness::new();

        // Login on two devices
        let laptop = harness.store.issue("alice").await.unwrap();
        let phone = harness.store.issue("alice").await.unwrap();

        let access = harness.exchange("alice", &laptop).await.unwrap();
        let claims = harness.access.verify(&access).unwrap();
        assert_eq!(claims.user_id(), "alice");

        // Logout on the laptop only
        harness.store.revoke("alice", &laptop).await.unwrap();

        assert_eq!(
            harness.exchange("alice", &laptop).await.unwrap_err(),
            DomainError::Store(StoreError::TokenNotFound)
        );
        assert!(harness.exchange("alice", &phone).await.is_ok());

        // Logout everywhere
        assert_eq!(harness.store.revoke_all("alice").await.unwrap(), 1);
        assert!(harness.exchange("alice", &phone).await.is_err());
    }

    #[tokio::test]
    async fn test_refresh_for_unknown_user() {
        let harness = Harness::new();
        let token = harness.store.issue("alice").await.unwrap();

        assert_eq!(
            harness.exchange("mallory", &token).await.unwrap_err(),
            DomainError::Store(StoreError::NoSuchClient {
                user_id: "mallory".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_account_deletion() {
        let harness = Harness::new();
        let token = harness.store.issue("alice").await.unwrap();

        assert!(harness.store.purge("alice").await.unwrap());

        assert!(matches!(
            harness.exchange("alice", &token).await,
            Err(DomainError::Store(StoreError::NoSuchClient { .. }))
        ));
    }
}
