// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_advances_and_sets() {
    let clock = FakeClock::new(1_000);
    assert_eq!(clock.now_ms(), 1_000);

    clock.advance(Duration::from_millis(250));
    assert_eq!(clock.now_ms(), 1_250);

    clock.set(42);
    assert_eq!(clock.now_ms(), 42);
}

#[test]
fn fake_clock_clones_share_time() {
    let clock = FakeClock::default();
    let other = clock.clone();
    clock.advance(Duration::from_secs(1));
    assert_eq!(other.now_ms(), 1_000);
}

#[tokio::test(start_paused = true)]
async fn system_clock_follows_paused_tokio_time() {
    let clock = SystemClock::new();
    let before = clock.now_ms();

    tokio::time::advance(Duration::from_secs(5)).await;

    assert_eq!(clock.now_ms() - before, 5_000);
}
