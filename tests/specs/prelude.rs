//! Shared helpers for coordination specs.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use ts_core::{ResourceId, SequentialTokenGen, StatusReport};
use ts_engine::{
    FixedCapacity, RequesterClient, Runtime, RuntimeConfig, RuntimeDeps, SystemClock,
};
use ts_storage::{FileHistory, HistoryStore, MemoryHistory};

pub type Client = RequesterClient<SystemClock, SequentialTokenGen>;

/// Runtime with in-memory history and a fixed capacity for every resource
pub fn runtime(capacity: i64) -> Runtime {
    runtime_over(Arc::new(MemoryHistory::new()), capacity, SystemClock::new())
}

/// Runtime persisting history under `dir`
pub fn file_runtime(dir: &Path, capacity: i64, clock: SystemClock) -> Runtime {
    runtime_over(Arc::new(FileHistory::new(dir)), capacity, clock)
}

fn runtime_over(history: Arc<dyn HistoryStore>, capacity: i64, clock: SystemClock) -> Runtime {
    Runtime::new(
        RuntimeDeps {
            history,
            initializer: Arc::new(FixedCapacity(capacity)),
        },
        clock,
        RuntimeConfig::default(),
    )
}

/// Client whose tokens are `<name>-1`, `<name>-2`, ...
pub fn client(rt: &Runtime, name: &str) -> Client {
    RequesterClient::with_token_gen(rt.clone(), name, SequentialTokenGen::new(name))
}

/// Poll until the resource's queue reaches `len`
pub async fn wait_for_queue(rt: &Runtime, resource: &ResourceId, len: usize) -> StatusReport {
    loop {
        let status = rt.status(resource).await.unwrap();
        if status.queue_length == len {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
}
