//! Durable history: a restarted runtime resumes exactly where it stopped.

use crate::prelude::*;
use std::time::Duration;
use ts_core::{Coordinator, RequesterId, ResourceId, Token, WaiterState};
use ts_engine::{AcquireOptions, SystemClock};
use ts_storage::rebuild;

#[tokio::test(start_paused = true)]
async fn restart_preserves_holders_and_queue() {
    let dir = tempfile::tempdir().unwrap();
    let db = ResourceId::new("db");
    let clock = SystemClock::new();

    let first = file_runtime(dir.path(), 1, clock.clone());
    let a = client(&first, "a");
    let lease = a.acquire(&db, AcquireOptions::default()).await.unwrap();
    first
        .signal_named(
            &db,
            "RequestAcquire",
            serde_json::json!({"requester": "b", "token": "b-1"}),
        )
        .await
        .unwrap();
    let before = wait_for_queue(&first, &db, 1).await;
    first.shutdown().await;

    let second = file_runtime(dir.path(), 1, clock);
    let after = second.status(&db).await.unwrap();
    assert_eq!(before, after);

    let a = client(&second, "a");
    a.release(lease).await.unwrap();
    assert_eq!(
        second.waiter_state(&db, &Token::new("b-1")).await.unwrap(),
        WaiterState::Leased {
            holder: RequesterId::new("b")
        }
    );
}

#[tokio::test(start_paused = true)]
async fn replaying_history_reproduces_live_state() {
    let dir = tempfile::tempdir().unwrap();
    let pool = ResourceId::new("pool");
    let rt = file_runtime(dir.path(), 2, SystemClock::new());

    let mut leases = Vec::new();
    for name in ["a", "b"] {
        leases.push(
            client(&rt, name)
                .acquire(&pool, AcquireOptions::default().with_lease_timeout(Duration::from_secs(60)))
                .await
                .unwrap(),
        );
    }
    for name in ["c", "d"] {
        rt.signal_named(
            &pool,
            "RequestAcquire",
            serde_json::json!({"requester": name, "token": format!("{}-1", name)}),
        )
        .await
        .unwrap();
    }
    client(&rt, "a").release(leases.remove(0)).await.unwrap();

    let live = rt.inspect(&pool, Coordinator::clone).await.unwrap();
    let records = rt.history(&pool).unwrap();
    let replayed = rebuild(&pool, &records).unwrap().coordinator;

    assert_eq!(replayed, live);
    assert_eq!(replayed.ledger().available(), 0);
    assert_eq!(replayed.queue().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn reclamation_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db = ResourceId::new("db");
    let clock = SystemClock::new();

    let first = file_runtime(dir.path(), 1, clock.clone());
    let _abandoned = client(&first, "a")
        .acquire(
            &db,
            AcquireOptions::default().with_lease_timeout(Duration::from_secs(10)),
        )
        .await
        .unwrap();
    first.shutdown().await;

    tokio::time::sleep(Duration::from_secs(30)).await;

    // Recovery fires the overdue reclaim timer before serving queries
    let second = file_runtime(dir.path(), 1, clock);
    let status = second.status(&db).await.unwrap();
    assert_eq!(status.available, 1);
    assert!(status.holders.is_empty());
}

#[tokio::test(start_paused = true)]
async fn reused_token_after_restart_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let db = ResourceId::new("db");
    let clock = SystemClock::new();

    let first = file_runtime(dir.path(), 1, clock.clone());
    let w = client(&first, "worker-1");
    let lease = w.acquire(&db, AcquireOptions::default()).await.unwrap();
    w.release(lease).await.unwrap();
    first.shutdown().await;

    // Same sequential tokens as the first run
    let second = file_runtime(dir.path(), 1, clock);
    let w = client(&second, "worker-1");
    let err = w.acquire(&db, AcquireOptions::default()).await.unwrap_err();
    assert!(matches!(
        err,
        ts_engine::RuntimeError::TokenRetired { ref token, .. } if token == &Token::new("worker-1-1")
    ));
    assert_eq!(second.router().pending(), 0);

    // The next token is fresh and granted
    let lease = w.acquire(&db, AcquireOptions::default()).await.unwrap();
    assert_eq!(lease.token(), &Token::new("worker-1-2"));
    assert_eq!(second.status(&db).await.unwrap().available, 0);
}
