//! MySQL implementation of the ClientRepository trait.
//!
//! One row per user in `clients`. The active token list is stored as a JSON
//! array so that every save replaces it in a single statement. Inserts rely
//! on the primary key to detect concurrent creation; updates are guarded by
//! `revision` so a stale writer matches zero rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

use rk_core::domain::entities::client::ClientRecord;
use rk_core::errors::{DomainError, StoreError};
use rk_core::repositories::ClientRepository;

/// MySQL implementation of ClientRepository
#[derive(Clone)]
pub struct MySqlClientRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlClientRepository {
    /// Create a new MySQL client repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Serialize the active token list for the `active_tokens` column
    pub(crate) fn encode_tokens(tokens: &[String]) -> Result<String, DomainError> {
        serde_json::to_string(tokens).map_err(|e| {
            StoreError::persistence(format!("Failed to encode active tokens: {}", e)).into()
        })
    }

    /// Parse the `active_tokens` column
    pub(crate) fn decode_tokens(raw: &str) -> Result<Vec<String>, DomainError> {
        serde_json::from_str(raw).map_err(|e| {
            StoreError::persistence(format!("Corrupt active token list: {}", e)).into()
        })
    }

    /// Convert database row to ClientRecord entity
    fn row_to_record(row: &MySqlRow) -> Result<ClientRecord, DomainError> {
        let active_tokens: String = row.try_get("active_tokens").map_err(column_error)?;

        Ok(ClientRecord {
            id: row.try_get("id").map_err(column_error)?,
            issue_count: row.try_get("issue_count").map_err(column_error)?,
            active_tokens: Self::decode_tokens(&active_tokens)?,
            revision: row.try_get("revision").map_err(column_error)?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(column_error)?,
            updated_at: row
                .try_get::<DateTime<Utc>, _>("updated_at")
                .map_err(column_error)?,
        })
    }

    async fn insert(&self, mut record: ClientRecord) -> Result<ClientRecord, DomainError> {
        let query = r#"
            INSERT INTO clients (
                id, issue_count, active_tokens, revision, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?)
        "#;

        let now = Utc::now();
        let tokens = Self::encode_tokens(&record.active_tokens)?;

        let result = sqlx::query(query)
            .bind(&record.id)
            .bind(record.issue_count)
            .bind(tokens)
            .bind(1u64)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(StoreError::ConcurrentCreateConflict { user_id: record.id }.into());
            }
            Err(e) => return Err(query_error("insert client record", e)),
        }

        record.revision = 1;
        record.created_at = now;
        record.updated_at = now;
        Ok(record)
    }

    async fn update(&self, mut record: ClientRecord) -> Result<ClientRecord, DomainError> {
        let query = r#"
            UPDATE clients
            SET issue_count = ?, active_tokens = ?, revision = revision + 1, updated_at = ?
            WHERE id = ? AND revision = ?
        "#;

        let now = Utc::now();
        let tokens = Self::encode_tokens(&record.active_tokens)?;

        let result = sqlx::query(query)
            .bind(record.issue_count)
            .bind(tokens)
            .bind(now)
            .bind(&record.id)
            .bind(record.revision)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("update client record", e))?;

        // Someone else bumped the revision, or the row is gone
        if result.rows_affected() == 0 {
            return Err(StoreError::ConcurrentUpdateConflict { user_id: record.id }.into());
        }

        record.revision += 1;
        record.updated_at = now;
        Ok(record)
    }
}

#[async_trait]
impl ClientRepository for MySqlClientRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<ClientRecord>, DomainError> {
        let query = r#"
            SELECT id, issue_count, active_tokens, revision, created_at, updated_at
            FROM clients
            WHERE id = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_error("find client record", e))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, record: ClientRecord) -> Result<ClientRecord, DomainError> {
        if record.is_persisted() {
            self.update(record).await
        } else {
            self.insert(record).await
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_error("delete client record", e))?;

        Ok(result.rows_affected() > 0)
    }
}

fn query_error(action: &str, err: sqlx::Error) -> DomainError {
    tracing::error!(error = %err, "Failed to {}", action);
    StoreError::persistence(format!("Failed to {}: {}", action, err)).into()
}

fn column_error(err: sqlx::Error) -> DomainError {
    StoreError::persistence(format!("Failed to read client column: {}", err)).into()
}
