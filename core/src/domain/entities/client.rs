//! Client record entity: one per user, holding the active refresh tokens.

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};

use crate::errors::TokenError;

use super::token::RefreshToken;

/// Persisted per-user record of issued and still-valid refresh tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Opaque user identifier (primary key)
    pub id: String,

    /// Number of refresh tokens ever issued to this user
    pub issue_count: u64,

    /// Currently valid refresh tokens, oldest first
    pub active_tokens: Vec<String>,

    /// Write version maintained by the repository; 0 means never persisted
    pub revision: u64,

    /// Set by the repository on first insert
    pub created_at: DateTime<Utc>,

    /// Set by the repository on every write
    pub updated_at: DateTime<Utc>,
}

impl ClientRecord {
    /// A fresh, unsaved record with no issued tokens
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            issue_count: 0,
            active_tokens: Vec::new(),
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the record has been written by a repository
    pub fn is_persisted(&self) -> bool {
        self.revision > 0
    }

    /// Bumps the issuance counter and appends a newly generated token.
    ///
    /// The record is left untouched if generation fails.
    pub fn issue_token(&mut self) -> Result<RefreshToken, TokenError> {
        let next = self
            .issue_count
            .checked_add(1)
            .ok_or(TokenError::TokenGenerationFailed)?;
        let token = RefreshToken::generate(next)?;

        self.issue_count = next;
        self.active_tokens.push(token.to_string());
        Ok(token)
    }

    /// Exact-match lookup. Every stored token is compared in constant time.
    pub fn has_token(&self, token: &str) -> bool {
        self.position_of(token).is_some()
    }

    /// Removes the first exact match. Returns whether anything was removed.
    pub fn remove_token(&mut self, token: &str) -> bool {
        match self.position_of(token) {
            Some(index) => {
                self.active_tokens.remove(index);
                true
            }
            None => false,
        }
    }

    fn position_of(&self, token: &str) -> Option<usize> {
        // No early exit, so the scan time does not depend on where a match is
        self.active_tokens
            .iter()
            .enumerate()
            .fold(None, |found, (index, stored)| {
                let matches = constant_time_eq(stored.as_bytes(), token.as_bytes());
                found.or(matches.then_some(index))
            })
    }

    /// Drops every active token, returning how many there were
    pub fn clear_tokens(&mut self) -> usize {
        let count = self.active_tokens.len();
        self.active_tokens.clear();
        count
    }
}
