//! Acquire deadlines: a timed-out waiter is cleanly dequeued.

use crate::prelude::*;
use std::time::Duration;
use ts_core::{ResourceId, Token, WaiterState};
use ts_engine::{AcquireOptions, RuntimeError};

#[tokio::test(start_paused = true)]
async fn timed_out_waiter_is_unknown_afterwards() {
    let rt = runtime(1);
    let db = ResourceId::new("db");
    let _forever = client(&rt, "holder")
        .acquire(&db, AcquireOptions::default())
        .await
        .unwrap();

    let d = client(&rt, "d");
    let err = d
        .acquire(
            &db,
            AcquireOptions::default().with_deadline(Duration::from_millis(500)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::AcquireTimeout { .. }));

    let state = rt
        .query_named(&db, "waiter", Some("d-1"))
        .await
        .unwrap();
    assert_eq!(state, ts_core::QueryResponse::Waiter(WaiterState::Unknown));
    assert_eq!(rt.status(&db).await.unwrap().queue_length, 0);
    assert_eq!(
        rt.waiter_state(&db, &Token::new("d-1")).await.unwrap(),
        WaiterState::Unknown
    );
}

#[tokio::test(start_paused = true)]
async fn timeout_does_not_disturb_other_waiters() {
    let rt = runtime(1);
    let db = ResourceId::new("db");
    let holder = client(&rt, "holder");
    let lease = holder.acquire(&db, AcquireOptions::default()).await.unwrap();

    let patient = client(&rt, "patient");
    let db_p = db.clone();
    let patient_task =
        tokio::spawn(async move { patient.acquire(&db_p, AcquireOptions::default()).await });
    wait_for_queue(&rt, &db, 1).await;

    let err = client(&rt, "hasty")
        .acquire(
            &db,
            AcquireOptions::default().with_deadline(Duration::from_secs(1)),
        )
        .await
        .unwrap_err();
    assert!(err.is_acquire_timeout());
    assert_eq!(
        rt.waiter_state(&db, &Token::new("patient-1")).await.unwrap(),
        WaiterState::Queued { position: 0 }
    );

    holder.release(lease).await.unwrap();
    assert!(patient_task.await.unwrap().is_ok());
}
