//! Client repository trait defining the interface for client record persistence.

use async_trait::async_trait;

use crate::domain::entities::client::ClientRecord;
use crate::errors::DomainError;

/// Repository trait for ClientRecord persistence operations
///
/// Writes are conditional so that concurrent read-modify-write cycles on the
/// same user cannot silently overwrite each other.
///
/// # Write contract
/// - `save` of a record with `revision == 0` is an insert. If a record with
///   the same id already exists the call fails with
///   `StoreError::ConcurrentCreateConflict` and nothing is written.
/// - `save` of a record with `revision > 0` updates the stored record only if
///   its revision still equals `record.revision`; otherwise it fails with
///   `StoreError::ConcurrentUpdateConflict` and nothing is written.
/// - A successful save bumps `revision` by one, stamps `updated_at` (and
///   `created_at` on insert) and returns the record as stored.
/// - Each save is atomic: `active_tokens` is never partially written.
/// - Backend failures surface as `StoreError::PersistenceFailure`.
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Find a client record by user identifier
    ///
    /// # Returns
    /// * `Ok(Some(ClientRecord))` - Record found
    /// * `Ok(None)` - No record for this user
    /// * `Err(DomainError)` - Storage unavailable
    async fn find_by_id(&self, id: &str) -> Result<Option<ClientRecord>, DomainError>;

    /// Create or update a client record, conditional on its revision
    ///
    /// # Example
    /// ```no_run
    /// # use rk_core::repositories::ClientRepository;
    /// # use rk_core::domain::entities::client::ClientRecord;
    /// # async fn example(repo: &impl ClientRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let mut record = ClientRecord::new("user-42");
    /// record.issue_token()?;
    ///
    /// let saved = repo.save(record).await?;
    /// assert_eq!(saved.revision, 1);
    /// # Ok(())
    /// # }
    /// ```
    async fn save(&self, record: ClientRecord) -> Result<ClientRecord, DomainError>;

    /// Delete a client record
    ///
    /// # Returns
    /// * `Ok(true)` - Record existed and was deleted
    /// * `Ok(false)` - No record for this user
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;
}
