//! Concurrency tests for the refresh token store

use futures_util::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;

use crate::repositories::{ClientRepository, InMemoryClientRepository};
use crate::services::refresh_token::{RefreshTokenStore, RefreshTokenStoreConfig, UserLocks};

const TASKS: usize = 32;

fn shared_store() -> Arc<RefreshTokenStore<InMemoryClientRepository>> {
    Arc::new(RefreshTokenStore::new(
        Arc::new(InMemoryClientRepository::new()),
        RefreshTokenStoreConfig::default(),
    ))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_issue_creates_one_record() {
    let store = shared_store();

    let handles = (0..TASKS).map(|_| {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.issue("brand-new").await })
    });
    let tokens: Vec<String> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert_eq!(store.repository().len().await, 1);
    let record = store.repository().find_by_id("brand-new").await.unwrap().unwrap();
    assert_eq!(record.issue_count, TASKS as u64);
    assert_eq!(record.active_tokens.len(), TASKS);
    for token in &tokens {
        assert!(record.has_token(token));
    }

    let counters: HashSet<&str> = tokens
        .iter()
        .filter_map(|t| t.split_once('.').map(|(prefix, _)| prefix))
        .collect();
    assert_eq!(counters.len(), TASKS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_issue_and_revoke_lose_nothing() {
    let store = shared_store();
    let mut to_revoke = Vec::new();
    for _ in 0..TASKS {
        to_revoke.push(store.issue("alice").await.unwrap());
    }

    let revokes = to_revoke.clone().into_iter().map(|token| {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.revoke("alice", &token).await })
    });
    let issues = (0..TASKS).map(|_| {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.issue("alice").await })
    });
    let (revoked, issued) = tokio::join!(join_all(revokes), join_all(issues));

    for result in revoked {
        result.unwrap().unwrap();
    }
    let issued: Vec<String> = issued
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let active = store.active_tokens("alice").await.unwrap();
    assert_eq!(active.len(), TASKS);
    for token in &issued {
        assert!(active.contains(token));
    }
    for token in &to_revoke {
        assert!(!active.contains(token));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_users_are_independent() {
    let store = shared_store();

    let handles = (0..TASKS).map(|i| {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            let user = format!("user-{}", i % 4);
            store.issue(&user).await
        })
    });
    for joined in join_all(handles).await {
        joined.unwrap().unwrap();
    }

    assert_eq!(store.repository().len().await, 4);
    for i in 0..4 {
        let tokens = store.active_tokens(&format!("user-{}", i)).await.unwrap();
        assert_eq!(tokens.len(), TASKS / 4);
    }
    assert!(store.locks().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_separate_stores_sharing_a_repository() {
    // Two stores with their own lock registries behave like two processes
    // sharing one database: only the conditional writes keep them honest.
    let repo = Arc::new(InMemoryClientRepository::new());
    let config = RefreshTokenStoreConfig {
        max_write_attempts: 16,
    };
    let first = Arc::new(RefreshTokenStore::new(Arc::clone(&repo), config.clone()));
    let second = Arc::new(RefreshTokenStore::new(Arc::clone(&repo), config));

    let handles = (0..16).map(|i| {
        let store = if i % 2 == 0 {
            Arc::clone(&first)
        } else {
            Arc::clone(&second)
        };
        tokio::spawn(async move { store.issue("shared").await })
    });
    let tokens: Vec<String> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let record = repo.find_by_id("shared").await.unwrap().unwrap();
    assert_eq!(record.issue_count, 16);
    assert_eq!(record.active_tokens.len(), 16);
    for token in &tokens {
        assert!(record.has_token(token));
    }
}

#[tokio::test]
async fn test_user_lock_is_exclusive() {
    let locks = UserLocks::new();
    let guard = locks.lock("alice").await;

    let waiter = {
        let locks = locks.clone();
        tokio::spawn(async move {
            let _guard = locks.lock("alice").await;
        })
    };
    tokio::task::yield_now().await;
    assert!(!waiter.is_finished());

    // Another user is not blocked
    drop(locks.lock("bob").await);

    drop(guard);
    waiter.await.unwrap();
    assert!(locks.is_empty());
}

#[tokio::test]
async fn test_lock_entry_removed_when_idle() {
    let locks = UserLocks::new();

    let guard = locks.lock("alice").await;
    assert_eq!(locks.len(), 1);

    drop(guard);
    assert!(locks.is_empty());
}

#[tokio::test]
async fn test_cancelled_lock_waiter_leaves_no_entry() {
    let locks = UserLocks::new();
    let guard = locks.lock("alice").await;

    let waiter = {
        let locks = locks.clone();
        tokio::spawn(async move {
            let _guard = locks.lock("alice").await;
        })
    };
    tokio::task::yield_now().await;
    assert!(!waiter.is_finished());

    waiter.abort();
    assert!(waiter.await.unwrap_err().is_cancelled());
    assert_eq!(locks.len(), 1);

    drop(guard);
    assert!(locks.is_empty());
}

#[tokio::test]
async fn test_aborted_issues_do_not_grow_lock_registry() {
    let store = shared_store();

    for _ in 0..100 {
        let guard = store.locks().lock("alice").await;
        let pending = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.issue("alice").await })
        };
        tokio::task::yield_now().await;

        // Released and cancelled back to back, so the waiter may be woken
        // but never polled again
        drop(guard);
        pending.abort();
        let _ = pending.await;
    }

    assert!(store.locks().is_empty());
}
