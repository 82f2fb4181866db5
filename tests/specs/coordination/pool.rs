//! Capacity-N resource: up to N concurrent holders.

use crate::prelude::*;
use ts_core::{RequesterId, ResourceId};
use ts_engine::AcquireOptions;

#[tokio::test(start_paused = true)]
async fn pool_of_two_queues_the_third_acquire() {
    let rt = runtime(2);
    let pool = ResourceId::new("pool");
    let a = client(&rt, "a");
    let b = client(&rt, "b");
    let c = client(&rt, "c");

    let a_lease = a.acquire(&pool, AcquireOptions::default()).await.unwrap();
    let _b_lease = b.acquire(&pool, AcquireOptions::default()).await.unwrap();
    assert_eq!(rt.status(&pool).await.unwrap().available, 0);

    let pool_c = pool.clone();
    let c_task = tokio::spawn(async move { c.acquire(&pool_c, AcquireOptions::default()).await });
    wait_for_queue(&rt, &pool, 1).await;

    a.release(a_lease).await.unwrap();
    let c_lease = c_task.await.unwrap().unwrap();
    assert_eq!(c_lease.holder(), &RequesterId::new("c"));

    let status = rt.status(&pool).await.unwrap();
    assert_eq!(status.available, 0);
    assert_eq!(status.queue_length, 0);
    assert_eq!(status.holders.len(), 2);
    assert!(!status.holders.contains_key(&RequesterId::new("a")));
}

#[tokio::test(start_paused = true)]
async fn active_leases_never_exceed_capacity() {
    let rt = runtime(3);
    let pool = ResourceId::new("pool");

    let mut workers = Vec::new();
    for n in 0..12 {
        let c = client(&rt, &format!("w{}", n));
        let pool = pool.clone();
        let rt = rt.clone();
        workers.push(tokio::spawn(async move {
            c.with_lease(&pool, Default::default(), |_lease| async {
                let status = rt.status(&pool).await.unwrap();
                assert!(status.holders.values().sum::<usize>() <= 3);
                tokio::time::sleep(std::time::Duration::from_millis(5 * (n % 4 + 1))).await;
            })
            .await
            .unwrap();
        }));
    }
    for worker in workers {
        worker.await.unwrap();
    }

    let status = rt.status(&pool).await.unwrap();
    assert_eq!(status.available, 3);
    assert_eq!(status.queue_length, 0);
}
