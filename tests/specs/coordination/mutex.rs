//! Capacity-1 resource: one holder at a time, waiters handed off in order.

use crate::prelude::*;
use ts_core::{Phase, RequesterId, ResourceId};
use ts_engine::AcquireOptions;

#[tokio::test(start_paused = true)]
async fn mutex_hands_off_between_two_workflows() {
    let rt = runtime(1);
    let db = ResourceId::new("db");
    let a = client(&rt, "a");
    let b = client(&rt, "b");

    let a_lease = a.acquire(&db, AcquireOptions::default()).await.unwrap();
    let status = rt.status(&db).await.unwrap();
    assert_eq!(status.available, 0);
    assert_eq!(status.queue_length, 0);

    let db_b = db.clone();
    let b_task = tokio::spawn(async move {
        let lease = b.acquire(&db_b, AcquireOptions::default()).await.unwrap();
        (b, lease)
    });
    let status = wait_for_queue(&rt, &db, 1).await;
    assert_eq!(status.available, 0);

    a.release(a_lease).await.unwrap();
    let (b, b_lease) = b_task.await.unwrap();
    assert_eq!(b_lease.holder(), &RequesterId::new("b"));
    let status = rt.status(&db).await.unwrap();
    assert_eq!(status.available, 0);
    assert_eq!(status.queue_length, 0);

    b.release(b_lease).await.unwrap();
    let status = rt.status(&db).await.unwrap();
    assert_eq!(status.available, 1);
    assert_eq!(status.queue_length, 0);
    assert_eq!(status.phase, Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn waiters_are_served_first_come_first_served() {
    let rt = runtime(1);
    let db = ResourceId::new("db");
    let holder = client(&rt, "holder");
    let mut lease = holder.acquire(&db, AcquireOptions::default()).await.unwrap();

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    for (n, name) in ["w1", "w2", "w3", "w4"].into_iter().enumerate() {
        let c = client(&rt, name);
        let res = db.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let lease = c.acquire(&res, AcquireOptions::default()).await.unwrap();
            tx.send(lease).unwrap();
        });
        wait_for_queue(&rt, &db, n + 1).await;
    }

    let mut order = Vec::new();
    for _ in 0..4 {
        holder.release(lease).await.unwrap();
        lease = rx.recv().await.unwrap();
        order.push(lease.holder().to_string());
    }
    assert_eq!(order, ["w1", "w2", "w3", "w4"]);
}
