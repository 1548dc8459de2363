//! In-memory implementation of ClientRepository
//!
//! Backs the `memory` store backend and serves as the fake in tests. It
//! enforces the same conditional-write contract as the MySQL repository.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::client::ClientRecord;
use crate::errors::{DomainError, StoreError};

use super::r#trait::ClientRepository;

/// Process-local client repository
#[derive(Clone, Default)]
pub struct InMemoryClientRepository {
    records: Arc<RwLock<HashMap<String, ClientRecord>>>,
}

impl InMemoryClientRepository {
    /// Create a new, empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<ClientRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(id).cloned())
    }

    async fn save(&self, mut record: ClientRecord) -> Result<ClientRecord, DomainError> {
        let mut records = self.records.write().await;
        let now = Utc::now();

        match records.get(&record.id) {
            None if record.revision == 0 => {
                record.created_at = now;
            }
            Some(_) if record.revision == 0 => {
                return Err(StoreError::ConcurrentCreateConflict {
                    user_id: record.id,
                }
                .into());
            }
            Some(stored) if stored.revision == record.revision => {
                record.created_at = stored.created_at;
            }
            // Updated under our feet, or deleted since it was read
            _ => {
                return Err(StoreError::ConcurrentUpdateConflict {
                    user_id: record.id,
                }
                .into());
            }
        }

        record.revision += 1;
        record.updated_at = now;
        records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        Ok(records.remove(id).is_some())
    }
}
