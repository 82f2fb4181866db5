//! Lease reclamation: an abandoned lease is freed after its deadline.

use crate::prelude::*;
use std::time::Duration;
use ts_core::{RequesterId, ResourceId, Token, WaiterState};
use ts_engine::AcquireOptions;
use ts_storage::HistoryEntry;

#[tokio::test(start_paused = true)]
async fn abandoned_lease_is_reclaimed_and_waiter_granted() {
    let rt = runtime(1);
    let db = ResourceId::new("db");
    let crashed = client(&rt, "crashed");
    let _never_released = crashed
        .acquire(
            &db,
            AcquireOptions::default().with_lease_timeout(Duration::from_secs(30)),
        )
        .await
        .unwrap();

    let waiter = client(&rt, "waiter");
    let db_w = db.clone();
    let waiter_task =
        tokio::spawn(async move { waiter.acquire(&db_w, AcquireOptions::default()).await });
    wait_for_queue(&rt, &db, 1).await;

    // No further signals: only the lease deadline can free the permit
    let lease = waiter_task.await.unwrap().unwrap();
    assert_eq!(lease.holder(), &RequesterId::new("waiter"));
    assert_eq!(
        rt.waiter_state(&db, &Token::new("crashed-1")).await.unwrap(),
        WaiterState::Unknown
    );

    let records = rt.history(&db).unwrap();
    let signals = records
        .iter()
        .filter(|r| matches!(r.entry, HistoryEntry::Signal(_)))
        .count();
    assert_eq!(signals, 2);
    assert!(records
        .iter()
        .any(|r| matches!(r.entry, HistoryEntry::TimerFired { .. })));
}

#[tokio::test(start_paused = true)]
async fn late_release_after_reclamation_is_a_no_op() {
    let rt = runtime(1);
    let db = ResourceId::new("db");
    let slow = client(&rt, "slow");
    let lease = slow
        .acquire(
            &db,
            AcquireOptions::default().with_lease_timeout(Duration::from_secs(1)),
        )
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_secs(2)).await;
    let next = client(&rt, "next")
        .acquire(&db, AcquireOptions::default())
        .await
        .unwrap();

    slow.release(lease).await.unwrap();
    let status = rt.status(&db).await.unwrap();
    assert_eq!(status.available, 0);
    assert_eq!(status.holders.get(next.holder()), Some(&1));
}
