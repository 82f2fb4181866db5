//! Failures surfaced to the calling workflow.

use crate::prelude::*;
use ts_core::{CoordinationError, ResourceId};
use ts_engine::{AcquireOptions, RuntimeError};

#[tokio::test(start_paused = true)]
async fn non_positive_capacity_fails_the_first_acquire() {
    for capacity in [0, -1] {
        let rt = runtime(capacity);
        let db = ResourceId::new("db");

        let err = client(&rt, "a")
            .acquire(&db, AcquireOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Coordination(CoordinationError::CapacityMisconfigured { capacity: c, .. })
                if c == capacity
        ));
        assert!(rt.resources().unwrap().is_empty());
    }
}

#[tokio::test(start_paused = true)]
async fn malformed_signal_is_rejected_at_the_boundary() {
    let rt = runtime(1);
    let db = ResourceId::new("db");

    let err = rt
        .signal_named(&db, "RequestAcquire", serde_json::json!({"token": 7}))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Coordination(CoordinationError::MalformedSignal { .. })
    ));
    // Nothing was created for the rejected signal
    assert!(rt.history(&db).unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn release_for_unknown_resource_reports_not_running() {
    let rt = runtime(1);
    let err = rt
        .signal_named(
            &ResourceId::new("ghost"),
            "RequestRelease",
            serde_json::json!({"holder": "a", "token": "t1"}),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::NotRunning(_)));
}
