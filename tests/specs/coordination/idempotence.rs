//! Redelivered signals are absorbed without changing state.

use crate::prelude::*;
use serde_json::json;
use ts_core::{RequesterId, ResourceId, Signal, Token, WaiterState};

fn acquire(requester: &str, token: &str) -> Signal {
    Signal::RequestAcquire {
        requester: RequesterId::new(requester),
        token: Token::new(token),
        lease_timeout: None,
    }
}

#[tokio::test(start_paused = true)]
async fn redelivered_acquire_creates_one_entry() {
    let rt = runtime(1);
    let db = ResourceId::new("db");

    rt.signal_with_start(&db, acquire("a", "t1")).await.unwrap();
    rt.signal_with_start(&db, acquire("b", "t2")).await.unwrap();
    rt.signal_with_start(&db, acquire("b", "t2")).await.unwrap();
    rt.signal_with_start(&db, acquire("a", "t1")).await.unwrap();

    let status = rt.status(&db).await.unwrap();
    assert_eq!(status.queue_length, 1);
    assert_eq!(status.holders.get(&RequesterId::new("a")), Some(&1));
}

#[tokio::test(start_paused = true)]
async fn repeated_and_unknown_releases_are_no_ops() {
    let rt = runtime(2);
    let pool = ResourceId::new("pool");
    rt.signal_with_start(&pool, acquire("a", "t1")).await.unwrap();

    for payload in [
        json!({"holder": "a", "token": "t1"}),
        json!({"holder": "a", "token": "t1"}),
        json!({"holder": "a", "token": "never-granted"}),
        json!({"holder": "x", "token": "t1"}),
    ] {
        rt.signal_named(&pool, "RequestRelease", payload)
            .await
            .unwrap();
    }

    let status = rt.status(&pool).await.unwrap();
    assert_eq!(status.available, 2);
    assert!(status.holders.is_empty());

    // The coordinator keeps serving after absorbing bad input
    rt.signal_with_start(&pool, acquire("b", "t3")).await.unwrap();
    assert_eq!(
        rt.waiter_state(&pool, &Token::new("t3")).await.unwrap(),
        WaiterState::Leased {
            holder: RequesterId::new("b")
        }
    );
}

#[tokio::test(start_paused = true)]
async fn acquire_redelivered_after_release_is_not_regranted() {
    let rt = runtime(1);
    let db = ResourceId::new("db");
    rt.signal_with_start(&db, acquire("a", "t1")).await.unwrap();
    rt.signal_named(&db, "RequestRelease", json!({"holder": "a", "token": "t1"}))
        .await
        .unwrap();

    rt.signal_with_start(&db, acquire("a", "t1")).await.unwrap();

    let status = rt.status(&db).await.unwrap();
    assert_eq!(status.available, 1);
    assert_eq!(status.queue_length, 0);
}
