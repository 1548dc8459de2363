//! Refresh token store implementation

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::entities::client::ClientRecord;
use crate::domain::entities::token::RefreshToken;
use crate::errors::{DomainError, StoreError};
use crate::repositories::ClientRepository;

use super::config::RefreshTokenStoreConfig;
use super::locks::UserLocks;

/// Issues, validates and revokes refresh tokens against per-user client records
///
/// Every mutation runs under the caller's per-user lock and as a conditional
/// read-modify-write against the repository, retried when a concurrent writer
/// (for instance another process sharing the database) wins the race.
pub struct RefreshTokenStore<R: ClientRepository> {
    repository: Arc<R>,
    config: RefreshTokenStoreConfig,
    locks: UserLocks,
}

impl<R: ClientRepository> RefreshTokenStore<R> {
    /// Creates a new store over the given repository
    pub fn new(repository: Arc<R>, config: RefreshTokenStoreConfig) -> Self {
        Self {
            repository,
            config,
            locks: UserLocks::new(),
        }
    }

    /// The underlying repository
    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Per-user lock registry used by mutations
    pub fn locks(&self) -> &UserLocks {
        &self.locks
    }

    /// Issues a new refresh token for an already authenticated user
    ///
    /// Creates the client record on first use. The token is returned only
    /// once the record holding it has been persisted.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The new token, `<issue_count>.<80 hex chars>`
    /// * `Err(DomainError)` - `PersistenceFailure` or `TokenGenerationFailed`
    pub async fn issue(&self, user_id: &str) -> Result<String, DomainError> {
        let _guard = self.locks.lock(user_id).await;

        let token = self
            .mutate(user_id, "issue", |current| {
                let mut record = current.unwrap_or_else(|| ClientRecord::new(user_id));
                let token = record.issue_token()?;
                Ok((record, token))
            })
            .await?;

        info!(user_id, token = %token.redacted(), "Issued refresh token");
        Ok(token.to_string())
    }

    /// Checks that `token` is currently valid for `user_id`
    ///
    /// Does not consume or rotate the token.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Token is active
    /// * `Err(DomainError)` - `NoSuchClient`, `TokenNotFound` or `PersistenceFailure`
    pub async fn validate(&self, user_id: &str, token: &str) -> Result<(), DomainError> {
        let record = self.find_existing(user_id).await?;

        if record.has_token(token) {
            debug!(user_id, token = %RefreshToken::log_label(token), "Refresh token validated");
            Ok(())
        } else {
            debug!(user_id, token = %RefreshToken::log_label(token), "Refresh token not active");
            Err(StoreError::TokenNotFound.into())
        }
    }

    /// Revokes a single refresh token (logout)
    ///
    /// On success the token fails every later `validate` for this user. On
    /// error nothing was changed and the token must be treated as still valid.
    pub async fn revoke(&self, user_id: &str, token: &str) -> Result<(), DomainError> {
        let _guard = self.locks.lock(user_id).await;

        self.mutate(user_id, "revoke", |current| {
            let mut record = current.ok_or_else(|| no_such_client(user_id))?;
            if !record.remove_token(token) {
                return Err(StoreError::TokenNotFound.into());
            }
            Ok((record, ()))
        })
        .await?;

        info!(user_id, token = %RefreshToken::log_label(token), "Revoked refresh token");
        Ok(())
    }

    /// Revokes every active refresh token of a user (logout everywhere)
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of tokens revoked
    pub async fn revoke_all(&self, user_id: &str) -> Result<usize, DomainError> {
        let _guard = self.locks.lock(user_id).await;

        let revoked = self
            .mutate(user_id, "revoke_all", |current| {
                let mut record = current.ok_or_else(|| no_such_client(user_id))?;
                let revoked = record.clear_tokens();
                Ok((record, revoked))
            })
            .await?;

        info!(user_id, revoked, "Revoked all refresh tokens");
        Ok(revoked)
    }

    /// Deletes the user's client record, e.g. on account deletion
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - A record existed and was removed
    /// * `Ok(false)` - There was nothing to remove
    pub async fn purge(&self, user_id: &str) -> Result<bool, DomainError> {
        let _guard = self.locks.lock(user_id).await;

        let removed = self.repository.delete(user_id).await?;
        if removed {
            info!(user_id, "Purged client record");
        }
        Ok(removed)
    }

    /// Snapshot of the user's active tokens, oldest first
    pub async fn active_tokens(&self, user_id: &str) -> Result<Vec<String>, DomainError> {
        Ok(self.find_existing(user_id).await?.active_tokens)
    }

    async fn find_existing(&self, user_id: &str) -> Result<ClientRecord, DomainError> {
        self.repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| no_such_client(user_id))
    }

    /// Read-modify-write loop shared by all mutations.
    ///
    /// `apply` receives the freshly read record (or `None`) and returns the
    /// record to save plus the operation's result. Errors from `apply` abort
    /// without writing. Write conflicts restart from a fresh read until the
    /// attempt budget runs out, which surfaces as `PersistenceFailure`.
    async fn mutate<T, F>(
        &self,
        user_id: &str,
        operation: &'static str,
        mut apply: F,
    ) -> Result<T, DomainError>
    where
        F: FnMut(Option<ClientRecord>) -> Result<(ClientRecord, T), DomainError> + Send,
        T: Send,
    {
        let attempts = self.config.effective_write_attempts();

        for attempt in 1..=attempts {
            let current = self.repository.find_by_id(user_id).await?;
            let (record, outcome) = apply(current)?;

            match self.repository.save(record).await {
                Ok(_) => return Ok(outcome),
                Err(e) if e.is_write_conflict() => {
                    warn!(user_id, operation, attempt, error = %e, "Client record write conflict, retrying");
                }
                Err(e) => {
                    error!(user_id, operation, error = %e, "Failed to persist client record");
                    return Err(e);
                }
            }
        }

        error!(user_id, operation, attempts, "Giving up after repeated write conflicts");
        Err(StoreError::persistence(format!(
            "{} for user {} lost {} consecutive write conflicts",
            operation, user_id, attempts
        ))
        .into())
    }
}

fn no_such_client(user_id: &str) -> DomainError {
    StoreError::NoSuchClient {
        user_id: user_id.to_string(),
    }
    .into()
}
